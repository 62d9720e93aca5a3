//! Per-node simulation log sinks.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Line-oriented log owned by a single actor
pub trait NodeLog: Send {
    fn log(&mut self, line: &str);
}

/// Factory for per-node logs
pub trait LogSink: Send + Sync {
    fn open(&self, node: &str) -> io::Result<Box<dyn NodeLog>>;
}

/// Writes `<base_dir>/<node>/log.txt`, one timestamped line per entry
#[derive(Debug, Clone)]
pub struct FileLogSink {
    base_dir: PathBuf,
}

impl FileLogSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the log file for `node`
    pub fn log_path(&self, node: &str) -> PathBuf {
        self.base_dir.join(node).join("log.txt")
    }
}

struct FileNodeLog {
    path: PathBuf,
    file: File,
}

impl NodeLog for FileNodeLog {
    fn log(&mut self, line: &str) {
        let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Err(e) = writeln!(self.file, "[{}] {}", ts, line) {
            log::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

impl LogSink for FileLogSink {
    fn open(&self, node: &str) -> io::Result<Box<dyn NodeLog>> {
        let path = self.log_path(node);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Box::new(FileNodeLog { path, file }))
    }
}

/// One captured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub node: String,
    pub message: String,
}

/// Collects every node's lines in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSink {
    lines: Arc<Mutex<Vec<LogLine>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines captured so far, in arrival order
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().clone()
    }

    /// Messages logged by `node`
    pub fn lines_for(&self, node: &str) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.node == node)
            .map(|l| l.message.clone())
            .collect()
    }

    /// Number of `node`'s messages containing `needle`
    pub fn count_matching(&self, node: &str, needle: &str) -> usize {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.node == node && l.message.contains(needle))
            .count()
    }
}

struct MemoryNodeLog {
    node: String,
    lines: Arc<Mutex<Vec<LogLine>>>,
}

impl NodeLog for MemoryNodeLog {
    fn log(&mut self, line: &str) {
        self.lines.lock().push(LogLine {
            node: self.node.clone(),
            message: line.to_string(),
        });
    }
}

impl LogSink for MemoryLogSink {
    fn open(&self, node: &str) -> io::Result<Box<dyn NodeLog>> {
        Ok(Box::new(MemoryNodeLog {
            node: node.to_string(),
            lines: Arc::clone(&self.lines),
        }))
    }
}

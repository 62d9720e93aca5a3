//! Loading device dumps from a configuration directory.
//!
//! The expected layout is one subdirectory per device, each holding a
//! `config.dump` file:
//!
//! ```text
//! Conf/
//!   R1/config.dump
//!   R2/config.dump
//!   S1/config.dump
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use rayon::prelude::*;

use super::parser::parse_config_file;
use super::types::{DeviceMap, DeviceRecord};

/// File name looked up inside each device directory
pub const DUMP_FILE_NAME: &str = "config.dump";

/// Collect `(directory name, dump path)` for every device directory under `conf_root`
fn discover_dumps(conf_root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(conf_root)
        .with_context(|| format!("Failed to read config directory {}", conf_root.display()))?;

    let mut dumps = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", conf_root.display()))?;
        let dump_path = entry.path().join(DUMP_FILE_NAME);
        if dump_path.is_file() {
            dumps.push((entry.file_name().to_string_lossy().into_owned(), dump_path));
        }
    }
    dumps.sort();
    Ok(dumps)
}

/// Load and parse every device dump under `conf_root` in parallel.
///
/// Records are keyed by their declared hostname, falling back to the
/// directory name. Dumps that fail to parse are logged and skipped; any
/// reference to them will later surface as a missing component.
pub fn load_configs(conf_root: &Path) -> Result<DeviceMap> {
    let dumps = discover_dumps(conf_root)?;
    log::info!("Parsing {} device dumps from {}", dumps.len(), conf_root.display());

    let records: Vec<DeviceRecord> = dumps
        .par_iter()
        .filter_map(|(dir_name, path)| match parse_config_file(path, dir_name) {
            Ok(record) => {
                log::debug!(
                    "Parsed {}: {} interfaces, {} endpoints",
                    record.hostname,
                    record.interfaces.len(),
                    record.endpoints.len()
                );
                Some(record)
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    let mut devices = DeviceMap::new();
    for record in records {
        if let Some(previous) = devices.insert(record.hostname.clone(), record) {
            log::warn!(
                "Hostname {} declared by more than one dump; keeping the last one parsed",
                previous.hostname
            );
        }
    }

    log::info!("Loaded {} devices", devices.len());
    Ok(devices)
}

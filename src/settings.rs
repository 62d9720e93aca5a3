//! Simulation settings loaded from an optional YAML file.
//!
//! ```yaml
//! simulation:
//!   cycle_interval: 500ms
//!   run_duration: 6s
//!   pause_window: 500ms
//!   failures:
//!     - R1-R2
//! ```
//!
//! Every field is optional; omitted fields take the defaults below.

use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::{Deserialize, Serialize};

/// Top-level settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimulationSettings,
}

/// Tuning for the scripted simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Delay between two discovery cycles of one actor
    #[serde(with = "humantime_serde")]
    pub cycle_interval: Duration,
    /// Total running time, split evenly around the pause window
    #[serde(with = "humantime_serde")]
    pub run_duration: Duration,
    /// How long the engine stays paused mid-run
    #[serde(with = "humantime_serde")]
    pub pause_window: Duration,
    /// Links to fail before the first discovery cycle, written `A-B`
    pub failures: Vec<String>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_millis(500),
            run_duration: Duration::from_secs(6),
            pause_window: Duration::from_millis(500),
            failures: Vec::new(),
        }
    }
}

/// Settings validation errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cycle_interval must be greater than zero")]
    ZeroInterval,
    #[error("Invalid link '{0}', expected <node>-<node>")]
    InvalidLink(String),
}

/// Split an `A-B` link spec into its two node names.
///
/// Splits on the first `-`; both sides must be non-empty.
pub fn parse_link_spec(spec: &str) -> Result<(String, String), SettingsError> {
    match spec.trim().split_once('-') {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            Ok((a.trim().to_string(), b.trim().to_string()))
        }
        _ => Err(SettingsError::InvalidLink(spec.to_string())),
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cycle_interval.is_zero() {
            return Err(SettingsError::ZeroInterval);
        }
        for spec in &self.failures {
            parse_link_spec(spec)?;
        }
        Ok(())
    }

    /// Configured failures as node-name pairs. Call after [`validate`](Self::validate).
    pub fn failure_pairs(&self) -> Vec<(String, String)> {
        self.failures
            .iter()
            .filter_map(|spec| parse_link_spec(spec).ok())
            .collect()
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.simulation.validate()
    }
}

/// Load and validate settings from a YAML file
pub fn load_settings(path: &Path) -> Result<Settings> {
    info!("Loading settings from: {:?}", path);

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read settings file '{}'", path.display()))?;
    let settings: Settings = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse settings file '{}'", path.display()))?;

    settings.validate()?;
    Ok(settings)
}

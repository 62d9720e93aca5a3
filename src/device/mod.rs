//! Device configuration records.
//!
//! This module contains the structured per-device records consumed by the
//! topology, validation and capacity stages, along with the parser for the
//! line-oriented `config.dump` format and the directory loader.

pub mod types;
pub mod parser;
pub mod loader;

// Re-export key types and functions for easier access
pub use types::{DeviceMap, DeviceRecord, EndpointRecord, InterfaceRecord, PeerRef};
pub use parser::{parse_config_dump, parse_config_file, ParseError};
pub use loader::load_configs;

//! # Topocheck - Configuration consistency checker for small enterprise networks
//!
//! This library loads per-device configuration dumps, builds the physical
//! topology they describe, and reports addressing, link and capacity
//! problems. It also runs a concurrent neighbor-discovery simulation over the
//! same topology.
//!
//! ## Overview
//!
//! Each device directory under the configuration root holds one
//! `config.dump`. The dumps are parsed into device records, linked into an
//! undirected topology graph, and checked:
//!
//! - **Addressing**: duplicate IPs within a VLAN, gateways outside every
//!   local subnet
//! - **Links**: VLAN and MTU mismatches between the two sides of a link
//! - **Structure**: devices referenced as peers but never configured, loops
//! - **Capacity**: links whose bandwidth is below the peak demand of their VLAN
//!
//! ## Architecture
//!
//! - `device`: device records, the `config.dump` parser and directory loader
//! - `topology`: the topology graph and its construction from device records
//! - `validation`: consistency detectors and the [`validation::Issue`] type
//! - `analysis`: endpoint load aggregation, capacity advice, JSON report
//! - `simulation`: discovery actors, the simulation engine, scripted runs
//! - `settings`: YAML simulation settings
//! - `utils`: IP/subnet helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use topocheck::{analysis, device, topology, validation};
//!
//! let devices = device::load_configs(Path::new("Conf"))?;
//! let graph = topology::build_graph(&devices);
//!
//! for issue in validation::run_all(&devices, &graph) {
//!     println!("{}", issue);
//! }
//!
//! let loads = analysis::summarize_endpoint_load(&devices);
//! let advice = analysis::recommend_link_capacity(&graph, &loads);
//! # let _ = advice;
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Module-level failures are typed (`ParseError`, `SettingsError`,
//! `SimulationError`). Functions that touch the filesystem return
//! `color_eyre::Result` with context attached.

pub mod device;
pub mod topology;
pub mod validation;
pub mod analysis;
pub mod simulation;
pub mod settings;
pub mod utils;

//! Capacity analysis and report generation.
//!
//! This module aggregates endpoint demand per VLAN, flags links whose
//! bandwidth falls short of that demand, and assembles the JSON report.

pub mod capacity;
pub mod report;

pub use capacity::{recommend_link_capacity, summarize_endpoint_load, VlanLoad};
pub use report::{generate_json_report, CapacitySection, Report, ReportSummary};

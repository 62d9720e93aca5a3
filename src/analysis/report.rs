//! Report assembly and JSON output.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use super::capacity::VlanLoad;
use crate::simulation::SimulationSummary;
use crate::topology::TopologyGraph;
use crate::validation::Issue;

/// Node names and edge identities (`A-B`) of the checked topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

impl ReportSummary {
    /// List nodes and edges in name order
    pub fn from_graph(graph: &TopologyGraph) -> Self {
        Self {
            nodes: graph.nodes().map(|node| node.name.clone()).collect(),
            edges: graph.edges().map(|edge| edge.key.to_string()).collect(),
        }
    }
}

/// Per-VLAN demand and the links that cannot carry it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacitySection {
    pub vlan_loads: BTreeMap<u16, VlanLoad>,
    pub recommendations: Vec<Issue>,
}

/// Complete check report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub issues: Vec<Issue>,
    pub capacity: CapacitySection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationSummary>,
}

impl Report {
    /// Total findings across validation and capacity
    pub fn finding_count(&self) -> usize {
        self.issues.len() + self.capacity.recommendations.len()
    }
}

/// Generate JSON report, creating parent directories as needed
pub fn generate_json_report(report: &Report, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

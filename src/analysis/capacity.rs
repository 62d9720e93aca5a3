//! Per-VLAN load aggregation and link capacity recommendations.
//!
//! Endpoints are modeled as attached to a VLAN rather than to a physical
//! link, so each link is compared against the global peak of the VLAN it
//! carries. This over-estimates per-link demand; the output is a list of
//! likely bottlenecks, not a routed-traffic computation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::device::DeviceMap;
use crate::topology::TopologyGraph;
use crate::validation::issues::{CapacityRecommendation, CAPACITY_ADVICE};

/// Aggregate endpoint demand on one VLAN
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanLoad {
    pub peak: u64,
    pub avg: u64,
}

/// Sum peak and average demand of every VLAN-assigned endpoint, across all devices
pub fn summarize_endpoint_load(devices: &DeviceMap) -> BTreeMap<u16, VlanLoad> {
    let mut loads: BTreeMap<u16, VlanLoad> = BTreeMap::new();

    for record in devices.values() {
        for ep in &record.endpoints {
            let Some(vlan) = ep.vlan else {
                continue;
            };
            let load = loads.entry(vlan).or_default();
            load.peak = load.peak.saturating_add(ep.peak_mbps);
            load.avg = load.avg.saturating_add(ep.avg_mbps);
        }
    }

    loads
}

/// Flag every edge whose associated VLAN's peak demand exceeds its bandwidth.
///
/// The associated VLAN is the declaring side's, else the peer side's. Edges
/// with no VLAN on either side cannot be evaluated and are skipped.
pub fn recommend_link_capacity(
    graph: &TopologyGraph,
    vlan_loads: &BTreeMap<u16, VlanLoad>,
) -> Vec<CapacityRecommendation> {
    let mut recs = Vec::new();

    for edge in graph.edges() {
        let Some(vlan) = edge.primary_vlan() else {
            log::trace!("{}: no VLAN on either side, skipping capacity check", edge.key);
            continue;
        };
        let peak = vlan_loads.get(&vlan).map_or(0, |load| load.peak);
        if peak > edge.bandwidth_mbps {
            log::debug!(
                "{}: VLAN {} peak {} Mbps exceeds {} Mbps",
                edge.key,
                vlan,
                peak,
                edge.bandwidth_mbps
            );
            recs.push(CapacityRecommendation {
                link: edge.key.to_string(),
                vlan,
                peak_demand_mbps: peak,
                link_bw_mbps: edge.bandwidth_mbps,
                recommendation: CAPACITY_ADVICE.to_string(),
            });
        }
    }

    recs
}

//! Topology and addressing consistency checks.
//!
//! Every detector is a pure function over the device records and/or the
//! topology graph returning a list of [`Issue`]s. None of them mutate their
//! input and none fail: malformed individual values are skipped or surface
//! indirectly through the check that consumes them.

pub mod issues;
pub mod addressing;
pub mod links;
pub mod components;

pub use issues::{CapacityRecommendation, InterfaceOwner, Issue};
pub use addressing::{duplicate_ips, gateway_sanity};
pub use links::{mtu_mismatch, vlan_mismatch};
pub use components::{loop_detection, missing_components};

use crate::device::DeviceMap;
use crate::topology::TopologyGraph;

/// Run every detector and concatenate the results.
///
/// Order: duplicate IPs, VLAN mismatches, MTU mismatches, gateway sanity,
/// missing components, loop detection.
pub fn run_all(devices: &DeviceMap, graph: &TopologyGraph) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(duplicate_ips(devices));
    issues.extend(vlan_mismatch(graph));
    issues.extend(mtu_mismatch(graph));
    issues.extend(gateway_sanity(devices));
    issues.extend(missing_components(devices));
    issues.extend(loop_detection(graph));

    if issues.is_empty() {
        log::info!("Validation found no issues");
    } else {
        log::warn!("Validation found {} issue(s)", issues.len());
    }
    issues
}

//! Whole-topology checks: unresolved peer devices and loops.

use std::collections::BTreeSet;

use super::issues::Issue;
use crate::device::DeviceMap;
use crate::topology::TopologyGraph;

/// Report each peer device that is referenced but has no record.
///
/// A name referenced from several interfaces is reported once.
pub fn missing_components(devices: &DeviceMap) -> Vec<Issue> {
    let referenced: BTreeSet<&str> = devices
        .values()
        .flat_map(|record| record.linked_interfaces())
        .map(|(_, peer)| peer.device.as_str())
        .collect();

    referenced
        .into_iter()
        .filter(|name| !devices.contains_key(*name))
        .map(|name| Issue::MissingComponent {
            device: name.to_string(),
        })
        .collect()
}

/// A single `loop_detected` issue when the topology has a cycle
pub fn loop_detection(graph: &TopologyGraph) -> Vec<Issue> {
    if graph.has_cycle() {
        vec![Issue::LoopDetected]
    } else {
        Vec::new()
    }
}

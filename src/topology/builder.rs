//! Graph construction from device records.

use std::collections::HashMap;
use std::sync::Arc;

use super::graph::TopologyGraph;
use super::types::{EdgeKey, NodeKind};
use crate::device::DeviceMap;

/// Canonical identity of a physical link: both `(device, interface)` ends, sorted
type PhysicalLink<'a> = [(&'a str, &'a str); 2];

fn physical_link<'a>(a: (&'a str, &'a str), b: (&'a str, &'a str)) -> PhysicalLink<'a> {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}

/// Build the topology graph from device records.
///
/// Every record becomes a node. Every interface with a peer reference adds an
/// edge, whether or not the peer device is known. When the peer interface can
/// be resolved its MTU and VLAN fill the second slot of the pairs and the
/// bandwidth is the lower of the two sides.
///
/// Links are declared from both ends, so most edges are written twice; the
/// later write wins. Physically distinct links between the same two devices
/// collapse into one edge, which is logged as a warning.
pub fn build_graph(devices: &DeviceMap) -> TopologyGraph {
    let mut graph = TopologyGraph::new();

    for (name, record) in devices {
        graph.add_node(name, NodeKind::infer(name), Arc::new(record.clone()));
    }

    let mut seen_links: HashMap<EdgeKey, PhysicalLink<'_>> = HashMap::new();

    for (name, record) in devices {
        for (it, peer) in record.linked_interfaces() {
            let peer_it = devices
                .get(&peer.device)
                .and_then(|peer_record| peer_record.interface(&peer.interface));

            let (bandwidth, mtu_b, vlan_b) = match peer_it {
                Some(p) => (it.bandwidth_mbps.min(p.bandwidth_mbps), Some(p.mtu), p.vlan),
                None => {
                    if devices.contains_key(&peer.device) {
                        log::debug!(
                            "{}:{} references unknown interface {}",
                            name,
                            it.name,
                            peer
                        );
                    }
                    (it.bandwidth_mbps, None, None)
                }
            };

            let key = EdgeKey::new(name, &peer.device);
            let this_link = physical_link(
                (name.as_str(), it.name.as_str()),
                (peer.device.as_str(), peer.interface.as_str()),
            );
            match seen_links.get(&key) {
                Some(existing) if *existing != this_link => {
                    log::warn!(
                        "Parallel links between {} collapsed into one edge ({}:{} <-> {})",
                        key,
                        name,
                        it.name,
                        peer
                    );
                }
                Some(_) => {}
                None => {
                    seen_links.insert(key, this_link);
                }
            }

            graph.add_edge(name, &peer.device, bandwidth, (it.mtu, mtu_b), (it.vlan, vlan_b));
        }
    }

    log::info!(
        "Built topology with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

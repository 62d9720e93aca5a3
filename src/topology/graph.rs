//! Undirected device graph.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use super::types::{EdgeKey, NodeKind, TopologyEdge, TopologyNode};
use crate::device::DeviceRecord;

/// Devices and the links between them.
///
/// Edges are keyed by [`EdgeKey`], so at most one edge is stored per
/// unordered pair of names. An edge may reference a name that has no node
/// (a dangling peer reference).
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    nodes: BTreeMap<String, TopologyNode>,
    edges: BTreeMap<EdgeKey, TopologyEdge>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str, kind: NodeKind, record: Arc<DeviceRecord>) {
        self.nodes.insert(
            name.to_string(),
            TopologyNode {
                name: name.to_string(),
                kind,
                record,
            },
        );
    }

    /// Store an edge under the canonical pair key.
    ///
    /// Any edge already stored for the same pair is replaced and returned.
    pub fn add_edge(
        &mut self,
        a: &str,
        b: &str,
        bandwidth_mbps: u64,
        mtu_pair: (u32, Option<u32>),
        vlan_pair: (Option<u16>, Option<u16>),
    ) -> Option<TopologyEdge> {
        let key = EdgeKey::new(a, b);
        let edge = TopologyEdge {
            key: key.clone(),
            bandwidth_mbps,
            mtu_pair,
            vlan_pair,
        };
        self.edges.insert(key, edge)
    }

    pub fn node(&self, name: &str) -> Option<&TopologyNode> {
        self.nodes.get(name)
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Nodes in name order
    pub fn nodes(&self) -> impl Iterator<Item = &TopologyNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up the edge between `a` and `b` in either order
    pub fn edge(&self, a: &str, b: &str) -> Option<&TopologyEdge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    /// Edges in key order
    pub fn edges(&self) -> impl Iterator<Item = &TopologyEdge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Names adjacent to `name`, including dangling peers, in name order
    pub fn neighbors(&self, name: &str) -> Vec<String> {
        self.edges
            .keys()
            .filter_map(|key| key.other(name))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn adjacency(&self) -> HashMap<&str, Vec<&str>> {
        let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
        for key in self.edges.keys() {
            // Self-loops are a cycle on their own; keep them in the adjacency
            adj.entry(key.first()).or_default().push(key.second());
            if key.first() != key.second() {
                adj.entry(key.second()).or_default().push(key.first());
            }
        }
        adj
    }

    /// Whether the undirected graph contains a cycle.
    ///
    /// Depth-first traversal from every unvisited node with a single shared
    /// visited set. The edge back to the traversal parent is not a cycle;
    /// reaching any other already-visited node is.
    pub fn has_cycle(&self) -> bool {
        let adj = self.adjacency();
        let mut visited: HashSet<&str> = HashSet::new();

        for root in self.nodes.keys() {
            if visited.contains(root.as_str()) {
                continue;
            }

            let mut stack: Vec<(&str, Option<&str>)> = vec![(root.as_str(), None)];
            while let Some((v, parent)) = stack.pop() {
                // A node queued twice was reached through two distinct parents
                if !visited.insert(v) {
                    return true;
                }
                for &nb in adj.get(v).map(Vec::as_slice).unwrap_or_default() {
                    if Some(nb) == parent {
                        continue;
                    }
                    if nb == v || visited.contains(nb) {
                        return true;
                    }
                    stack.push((nb, Some(v)));
                }
            }
        }

        false
    }
}

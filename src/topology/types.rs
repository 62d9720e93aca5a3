//! Topology type definitions.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::device::DeviceRecord;

/// Role of a device in the topology, inferred from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Router,
    Switch,
    Host,
}

impl NodeKind {
    /// Infer the kind from the device name prefix.
    ///
    /// `R*` is a router, `S*` a switch, `H*` or `PC*` a host. Anything else
    /// is treated as a router.
    pub fn infer(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        if upper.starts_with('R') {
            Self::Router
        } else if upper.starts_with('S') {
            Self::Switch
        } else if upper.starts_with('H') || upper.starts_with("PC") {
            Self::Host
        } else {
            Self::Router
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Router => write!(f, "router"),
            NodeKind::Switch => write!(f, "switch"),
            NodeKind::Host => write!(f, "host"),
        }
    }
}

/// A device present in the topology
#[derive(Debug, Clone)]
pub struct TopologyNode {
    pub name: String,
    pub kind: NodeKind,
    pub record: Arc<DeviceRecord>,
}

/// Order-independent identity of an undirected edge.
///
/// The two names are stored sorted, so `EdgeKey::new("b", "a")` and
/// `EdgeKey::new("a", "b")` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(String, String);

impl EdgeKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }

    /// Lexicographically smaller endpoint
    pub fn first(&self) -> &str {
        &self.0
    }

    /// Lexicographically larger endpoint
    pub fn second(&self) -> &str {
        &self.1
    }

    /// Whether `name` is one of the two endpoints
    pub fn touches(&self, name: &str) -> bool {
        self.0 == name || self.1 == name
    }

    /// The endpoint opposite `name`, if `name` is an endpoint
    pub fn other(&self, name: &str) -> Option<&str> {
        if self.0 == name {
            Some(&self.1)
        } else if self.1 == name {
            Some(&self.0)
        } else {
            None
        }
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// An undirected link between two devices.
///
/// The `*_pair` fields are ordered (declaring side, peer side), not by key
/// order. The peer side is `None` when it could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyEdge {
    pub key: EdgeKey,
    pub bandwidth_mbps: u64,
    pub mtu_pair: (u32, Option<u32>),
    pub vlan_pair: (Option<u16>, Option<u16>),
}

impl TopologyEdge {
    /// VLAN the link is associated with: the declaring side's, else the peer's
    pub fn primary_vlan(&self) -> Option<u16> {
        self.vlan_pair.0.or(self.vlan_pair.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_inference() {
        assert_eq!(NodeKind::infer("R1"), NodeKind::Router);
        assert_eq!(NodeKind::infer("r-core"), NodeKind::Router);
        assert_eq!(NodeKind::infer("S1"), NodeKind::Switch);
        assert_eq!(NodeKind::infer("H3"), NodeKind::Host);
        assert_eq!(NodeKind::infer("pc12"), NodeKind::Host);
        assert_eq!(NodeKind::infer("edge1"), NodeKind::Router);
    }

    #[test]
    fn test_edge_key_is_order_independent() {
        let ab = EdgeKey::new("A", "B");
        let ba = EdgeKey::new("B", "A");
        assert_eq!(ab, ba);
        assert_eq!(ab.to_string(), "A-B");
        assert_eq!(ab.other("A"), Some("B"));
        assert_eq!(ab.other("C"), None);
        assert!(ba.touches("A"));
    }

    #[test]
    fn test_primary_vlan_prefers_declaring_side() {
        let mut edge = TopologyEdge {
            key: EdgeKey::new("A", "B"),
            bandwidth_mbps: 1000,
            mtu_pair: (1500, None),
            vlan_pair: (Some(10), Some(20)),
        };
        assert_eq!(edge.primary_vlan(), Some(10));
        edge.vlan_pair = (None, Some(20));
        assert_eq!(edge.primary_vlan(), Some(20));
        edge.vlan_pair = (None, None);
        assert_eq!(edge.primary_vlan(), None);
    }
}

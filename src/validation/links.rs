//! Per-link checks comparing the two ends of each edge.
//!
//! An edge whose peer side is unknown (dangling reference or unresolved peer
//! interface) is not checked.

use super::issues::Issue;
use crate::topology::TopologyGraph;

/// Report edges whose two ends carry different VLAN ids
pub fn vlan_mismatch(graph: &TopologyGraph) -> Vec<Issue> {
    graph
        .edges()
        .filter_map(|edge| match edge.vlan_pair {
            (Some(a), Some(b)) if a != b => Some(Issue::VlanMismatch {
                link: edge.key.to_string(),
                vlan_a: a,
                vlan_b: b,
            }),
            _ => None,
        })
        .collect()
}

/// Report edges whose two ends carry different MTUs
pub fn mtu_mismatch(graph: &TopologyGraph) -> Vec<Issue> {
    graph
        .edges()
        .filter_map(|edge| match edge.mtu_pair {
            (a, Some(b)) if a != b => Some(Issue::MtuMismatch {
                link: edge.key.to_string(),
                mtu_a: a,
                mtu_b: b,
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> TopologyGraph {
        let mut g = TopologyGraph::new();
        g.add_edge("R1", "R2", 1000, (1500, Some(9000)), (Some(10), Some(20)));
        g.add_edge("R2", "R3", 1000, (1500, Some(1500)), (Some(10), Some(10)));
        g.add_edge("R3", "GHOST", 1000, (9000, None), (Some(30), None));
        g.add_edge("R1", "R3", 1000, (1500, Some(1500)), (None, Some(10)));
        g
    }

    #[test]
    fn test_vlan_mismatch_only_when_both_known() {
        let issues = vlan_mismatch(&graph());
        assert_eq!(
            issues,
            vec![Issue::VlanMismatch {
                link: "R1-R2".to_string(),
                vlan_a: 10,
                vlan_b: 20,
            }]
        );
    }

    #[test]
    fn test_mtu_mismatch_only_when_both_known() {
        let issues = mtu_mismatch(&graph());
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            Issue::MtuMismatch { link, mtu_a: 1500, mtu_b: 9000 } if link == "R1-R2"
        ));
    }
}

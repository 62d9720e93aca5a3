//! Issue taxonomy shared by the validators and the capacity analyzer.

use serde::{Deserialize, Serialize};

/// Advisory text attached to every capacity recommendation
pub const CAPACITY_ADVICE: &str =
    "Activate secondary path for low-priority traffic or increase link capacity.";

/// A `(device, interface)` that owns an address
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InterfaceOwner {
    pub device: String,
    pub interface: String,
}

/// A link whose carried VLAN demand exceeds its bandwidth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRecommendation {
    pub link: String,
    pub vlan: u16,
    pub peak_demand_mbps: u64,
    pub link_bw_mbps: u64,
    pub recommendation: String,
}

/// A single finding.
///
/// Serialized with a `type` tag so reports read e.g.
/// `{"type": "missing_component", "device": "Y"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Issue {
    DuplicateIp {
        vlan: u16,
        ip: String,
        interfaces: Vec<InterfaceOwner>,
    },
    VlanMismatch {
        link: String,
        vlan_a: u16,
        vlan_b: u16,
    },
    MtuMismatch {
        link: String,
        mtu_a: u32,
        mtu_b: u32,
    },
    GatewayOutOfSubnet {
        node: String,
        vlan: u16,
        gateway: String,
    },
    MissingComponent {
        device: String,
    },
    LoopDetected,
    InsufficientLinkCapacity(CapacityRecommendation),
}

impl Issue {
    /// Snake-case tag of this issue, as it appears in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Issue::DuplicateIp { .. } => "duplicate_ip",
            Issue::VlanMismatch { .. } => "vlan_mismatch",
            Issue::MtuMismatch { .. } => "mtu_mismatch",
            Issue::GatewayOutOfSubnet { .. } => "gateway_out_of_subnet",
            Issue::MissingComponent { .. } => "missing_component",
            Issue::LoopDetected => "loop_detected",
            Issue::InsufficientLinkCapacity(_) => "insufficient_link_capacity",
        }
    }
}

impl From<CapacityRecommendation> for Issue {
    fn from(rec: CapacityRecommendation) -> Self {
        Issue::InsufficientLinkCapacity(rec)
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::DuplicateIp { vlan, ip, interfaces } => {
                let owners: Vec<String> = interfaces
                    .iter()
                    .map(|o| format!("{}:{}", o.device, o.interface))
                    .collect();
                write!(f, "duplicate IP {} in VLAN {} on {}", ip, vlan, owners.join(", "))
            }
            Issue::VlanMismatch { link, vlan_a, vlan_b } => {
                write!(f, "VLAN mismatch on {}: {} vs {}", link, vlan_a, vlan_b)
            }
            Issue::MtuMismatch { link, mtu_a, mtu_b } => {
                write!(f, "MTU mismatch on {}: {} vs {}", link, mtu_a, mtu_b)
            }
            Issue::GatewayOutOfSubnet { node, vlan, gateway } => {
                write!(f, "gateway {} for VLAN {} on {} is outside every local subnet", gateway, vlan, node)
            }
            Issue::MissingComponent { device } => {
                write!(f, "referenced device {} has no configuration", device)
            }
            Issue::LoopDetected => write!(f, "topology contains a loop"),
            Issue::InsufficientLinkCapacity(rec) => write!(
                f,
                "link {} carries VLAN {} peak {} Mbps over {} Mbps",
                rec.link, rec.vlan, rec.peak_demand_mbps, rec.link_bw_mbps
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_serializes_with_type_tag() {
        let issue = Issue::MissingComponent { device: "Y".to_string() };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "missing_component");
        assert_eq!(json["device"], "Y");

        let json = serde_json::to_value(Issue::LoopDetected).unwrap();
        assert_eq!(json, serde_json::json!({"type": "loop_detected"}));
    }

    #[test]
    fn test_capacity_issue_flattens_recommendation() {
        let issue: Issue = CapacityRecommendation {
            link: "R1-R2".to_string(),
            vlan: 20,
            peak_demand_mbps: 350,
            link_bw_mbps: 300,
            recommendation: CAPACITY_ADVICE.to_string(),
        }
        .into();

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "insufficient_link_capacity");
        assert_eq!(json["peak_demand_mbps"], 350);
        assert_eq!(issue.kind(), "insufficient_link_capacity");
    }
}

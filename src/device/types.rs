//! Device record type definitions.
//!
//! Records are built once per run (by the parser or directly by callers)
//! and treated as read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default interface MTU when the dump does not declare one
pub const DEFAULT_MTU: u32 = 1500;

/// Default interface bandwidth in Mbps when the dump does not declare one
pub const DEFAULT_BANDWIDTH_MBPS: u64 = 1000;

/// All known devices keyed by hostname
pub type DeviceMap = BTreeMap<String, DeviceRecord>;

/// Reference from an interface to the interface at the other end of its link
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerRef {
    pub device: String,
    pub interface: String,
}

impl PeerRef {
    /// Parse a `DEVICE:INTERFACE` reference.
    ///
    /// Returns `None` when the separator is missing. Only the first `:` splits,
    /// so interface names may themselves contain colons.
    pub fn parse(value: &str) -> Option<Self> {
        let (device, interface) = value.split_once(':')?;
        Some(Self {
            device: device.to_string(),
            interface: interface.to_string(),
        })
    }
}

impl std::fmt::Display for PeerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.device, self.interface)
    }
}

/// A single interface declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    /// Address literal as declared, optionally with a `/prefix`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    pub mtu: u32,
    pub bandwidth_mbps: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<PeerRef>,
}

impl InterfaceRecord {
    /// Create an interface with default MTU and bandwidth and nothing else set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            vlan: None,
            mtu: DEFAULT_MTU,
            bandwidth_mbps: DEFAULT_BANDWIDTH_MBPS,
            peer: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_vlan(mut self, vlan: u16) -> Self {
        self.vlan = Some(vlan);
        self
    }

    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = mtu;
        self
    }

    pub fn with_bandwidth(mut self, bandwidth_mbps: u64) -> Self {
        self.bandwidth_mbps = bandwidth_mbps;
        self
    }

    pub fn with_peer(mut self, device: impl Into<String>, interface: impl Into<String>) -> Self {
        self.peer = Some(PeerRef {
            device: device.into(),
            interface: interface.into(),
        });
        self
    }
}

/// An end host or application attached to a VLAN behind a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    pub peak_mbps: u64,
    pub avg_mbps: u64,
}

impl EndpointRecord {
    pub fn new(name: impl Into<String>, vlan: Option<u16>, peak_mbps: u64, avg_mbps: u64) -> Self {
        Self {
            name: name.into(),
            vlan,
            app: None,
            peak_mbps,
            avg_mbps,
        }
    }
}

/// Structured configuration of one device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub hostname: String,
    pub interfaces: Vec<InterfaceRecord>,
    /// VLAN id -> gateway address literal
    pub gateways: BTreeMap<u16, String>,
    pub endpoints: Vec<EndpointRecord>,
    /// Dump file this record was parsed from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
}

impl DeviceRecord {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    /// Look up an interface by name
    pub fn interface(&self, name: &str) -> Option<&InterfaceRecord> {
        self.interfaces.iter().find(|it| it.name == name)
    }

    /// Iterate over interfaces that reference a peer
    pub fn linked_interfaces(&self) -> impl Iterator<Item = (&InterfaceRecord, &PeerRef)> {
        self.interfaces
            .iter()
            .filter_map(|it| it.peer.as_ref().map(|peer| (it, peer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_ref_parse() {
        let peer = PeerRef::parse("R2:Gig0/1").unwrap();
        assert_eq!(peer.device, "R2");
        assert_eq!(peer.interface, "Gig0/1");
        assert_eq!(peer.to_string(), "R2:Gig0/1");

        assert!(PeerRef::parse("R2").is_none());
    }

    #[test]
    fn test_interface_defaults() {
        let it = InterfaceRecord::new("Gig0/0");
        assert_eq!(it.mtu, 1500);
        assert_eq!(it.bandwidth_mbps, 1000);
        assert!(it.vlan.is_none());
        assert!(it.peer.is_none());
    }

    #[test]
    fn test_linked_interfaces() {
        let mut device = DeviceRecord::new("R1");
        device.interfaces.push(InterfaceRecord::new("Gig0/0").with_peer("R2", "Gig0/1"));
        device.interfaces.push(InterfaceRecord::new("Gig0/1"));

        let linked: Vec<_> = device.linked_interfaces().collect();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].0.name, "Gig0/0");
        assert!(device.interface("Gig0/1").is_some());
        assert!(device.interface("Gig0/9").is_none());
    }
}

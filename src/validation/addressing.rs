//! Address-level checks: duplicate addresses and gateway placement.

use std::collections::BTreeMap;

use ipnetwork::IpNetwork;

use super::issues::{InterfaceOwner, Issue};
use crate::device::DeviceMap;
use crate::utils::ip_utils::{gateway_in_any, parse_interface_network};

/// Index `(vlan, address literal)` -> owning interfaces.
///
/// Only interfaces declaring both a VLAN and an address are indexed.
fn build_ip_index(devices: &DeviceMap) -> BTreeMap<(u16, &str), Vec<InterfaceOwner>> {
    let mut index: BTreeMap<(u16, &str), Vec<InterfaceOwner>> = BTreeMap::new();
    for (name, record) in devices {
        for it in &record.interfaces {
            if let (Some(vlan), Some(address)) = (it.vlan, it.address.as_deref()) {
                index.entry((vlan, address)).or_default().push(InterfaceOwner {
                    device: name.clone(),
                    interface: it.name.clone(),
                });
            }
        }
    }
    index
}

/// Report every `(vlan, address)` declared by more than one interface.
///
/// Addresses are compared as written: `10.0.0.1/24` and `10.0.0.1/25` are
/// different literals and do not collide.
pub fn duplicate_ips(devices: &DeviceMap) -> Vec<Issue> {
    build_ip_index(devices)
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|((vlan, ip), interfaces)| Issue::DuplicateIp {
            vlan,
            ip: ip.to_string(),
            interfaces,
        })
        .collect()
}

/// Check each declared gateway against the device's own subnets for that VLAN.
///
/// A gateway passes if any interface on the same device tagged with the same
/// VLAN has a network containing it. Interface addresses that do not parse
/// are skipped; a gateway that does not parse is contained by nothing.
pub fn gateway_sanity(devices: &DeviceMap) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (name, record) in devices {
        let mut vlan_subnets: BTreeMap<u16, Vec<IpNetwork>> = BTreeMap::new();
        for it in &record.interfaces {
            let (Some(vlan), Some(address)) = (it.vlan, it.address.as_deref()) else {
                continue;
            };
            match parse_interface_network(address) {
                Some(net) => vlan_subnets.entry(vlan).or_default().push(net),
                None => log::debug!("{}:{}: skipping unparsable address '{}'", name, it.name, address),
            }
        }

        for (vlan, gateway) in &record.gateways {
            let subnets = vlan_subnets.get(vlan).map(Vec::as_slice).unwrap_or_default();
            if !gateway_in_any(gateway, subnets) {
                issues.push(Issue::GatewayOutOfSubnet {
                    node: name.clone(),
                    vlan: *vlan,
                    gateway: gateway.clone(),
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceRecord, InterfaceRecord};

    fn devices(records: Vec<DeviceRecord>) -> DeviceMap {
        records.into_iter().map(|r| (r.hostname.clone(), r)).collect()
    }

    fn with_interface(name: &str, it: InterfaceRecord) -> DeviceRecord {
        let mut record = DeviceRecord::new(name);
        record.interfaces.push(it);
        record
    }

    #[test]
    fn test_duplicate_ip_same_vlan() {
        let map = devices(vec![
            with_interface("R1", InterfaceRecord::new("g0").with_vlan(10).with_address("10.0.0.1/24")),
            with_interface("R2", InterfaceRecord::new("g1").with_vlan(10).with_address("10.0.0.1/24")),
        ]);

        let issues = duplicate_ips(&map);
        assert_eq!(issues.len(), 1);
        match &issues[0] {
            Issue::DuplicateIp { vlan, ip, interfaces } => {
                assert_eq!(*vlan, 10);
                assert_eq!(ip, "10.0.0.1/24");
                assert_eq!(interfaces.len(), 2);
                assert_eq!(interfaces[0].device, "R1");
                assert_eq!(interfaces[1].interface, "g1");
            }
            other => panic!("unexpected issue {other:?}"),
        }
    }

    #[test]
    fn test_different_vlan_is_not_duplicate() {
        let map = devices(vec![
            with_interface("R1", InterfaceRecord::new("g0").with_vlan(10).with_address("10.0.0.1/24")),
            with_interface("R2", InterfaceRecord::new("g1").with_vlan(11).with_address("10.0.0.1/24")),
        ]);
        assert!(duplicate_ips(&map).is_empty());
    }

    #[test]
    fn test_differing_prefix_notation_is_not_duplicate() {
        let map = devices(vec![
            with_interface("R1", InterfaceRecord::new("g0").with_vlan(10).with_address("10.0.0.1/24")),
            with_interface("R2", InterfaceRecord::new("g1").with_vlan(10).with_address("10.0.0.1/25")),
        ]);
        assert!(duplicate_ips(&map).is_empty());
    }

    #[test]
    fn test_interfaces_without_vlan_are_not_indexed() {
        let map = devices(vec![
            with_interface("R1", InterfaceRecord::new("g0").with_address("10.0.0.1/24")),
            with_interface("R2", InterfaceRecord::new("g1").with_address("10.0.0.1/24")),
        ]);
        assert!(duplicate_ips(&map).is_empty());
    }

    fn gateway_device(gateway: &str) -> DeviceMap {
        let mut record = with_interface(
            "R1",
            InterfaceRecord::new("g0").with_vlan(10).with_address("10.0.0.1/24"),
        );
        record.gateways.insert(10, gateway.to_string());
        devices(vec![record])
    }

    #[test]
    fn test_gateway_inside_subnet() {
        assert!(gateway_sanity(&gateway_device("10.0.0.254")).is_empty());
    }

    #[test]
    fn test_gateway_outside_subnet() {
        let issues = gateway_sanity(&gateway_device("11.0.0.1"));
        assert_eq!(
            issues,
            vec![Issue::GatewayOutOfSubnet {
                node: "R1".to_string(),
                vlan: 10,
                gateway: "11.0.0.1".to_string(),
            }]
        );
    }

    #[test]
    fn test_unparsable_gateway_surfaces_as_out_of_subnet() {
        assert_eq!(gateway_sanity(&gateway_device("10.0.0.x")).len(), 1);
    }

    #[test]
    fn test_gateway_for_vlan_without_local_subnet() {
        let mut record = with_interface(
            "S1",
            InterfaceRecord::new("g0").with_vlan(10).with_address("10.0.0.1/24"),
        );
        record.gateways.insert(20, "10.0.0.254".to_string());
        let issues = gateway_sanity(&devices(vec![record]));
        assert_eq!(issues.len(), 1);
        assert!(matches!(&issues[0], Issue::GatewayOutOfSubnet { vlan: 20, .. }));
    }

    #[test]
    fn test_bare_interface_address_is_host_route() {
        let mut record = with_interface(
            "R1",
            InterfaceRecord::new("g0").with_vlan(10).with_address("10.0.0.1"),
        );
        record.gateways.insert(10, "10.0.0.1".to_string());
        assert!(gateway_sanity(&devices(vec![record.clone()])).is_empty());

        record.gateways.insert(10, "10.0.0.2".to_string());
        assert_eq!(gateway_sanity(&devices(vec![record])).len(), 1);
    }

    #[test]
    fn test_bad_interface_address_is_skipped() {
        let mut record = DeviceRecord::new("R1");
        record.interfaces.push(InterfaceRecord::new("g0").with_vlan(10).with_address("bogus"));
        record.interfaces.push(InterfaceRecord::new("g1").with_vlan(10).with_address("10.0.0.1/24"));
        record.gateways.insert(10, "10.0.0.254".to_string());
        assert!(gateway_sanity(&devices(vec![record])).is_empty());
    }
}

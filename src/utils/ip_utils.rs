use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// IP utility functions for address literals found in device dumps

/// Parse a bare IP address literal (IPv4 or IPv6)
pub fn parse_ip(ip: &str) -> Option<IpAddr> {
    ip.trim().parse::<IpAddr>().ok()
}

/// Parse an interface address into the network it belongs to.
///
/// Accepts `addr/prefix` or a bare address, which is treated as a host route
/// (/32 for IPv4, /128 for IPv6). Host bits are kept in the returned value;
/// containment checks mask them out.
pub fn parse_interface_network(address: &str) -> Option<IpNetwork> {
    let address = address.trim();
    match address.parse::<IpNetwork>() {
        Ok(net) => Some(net),
        Err(_) => parse_ip(address).map(IpNetwork::from),
    }
}

/// Check whether `gateway` lies inside any of `networks`.
///
/// An unparsable gateway is never contained.
pub fn gateway_in_any(gateway: &str, networks: &[IpNetwork]) -> bool {
    match parse_ip(gateway) {
        Some(ip) => networks.iter().any(|net| net.contains(ip)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip() {
        assert!(parse_ip("10.0.0.1").is_some());
        assert!(parse_ip("2001:db8::1").is_some());
        assert!(parse_ip("10.0.0.256").is_none());
        assert!(parse_ip("10.0.0.1/24").is_none());
    }

    #[test]
    fn test_parse_interface_network_with_prefix() {
        let net = parse_interface_network("10.0.0.1/24").unwrap();
        assert_eq!(net.prefix(), 24);
        assert!(net.contains("10.0.0.254".parse().unwrap()));
        assert!(!net.contains("10.0.1.1".parse().unwrap()));
    }

    #[test]
    fn test_bare_address_defaults_to_host_prefix() {
        let v4 = parse_interface_network("192.168.1.5").unwrap();
        assert_eq!(v4.prefix(), 32);
        let v6 = parse_interface_network("2001:db8::5").unwrap();
        assert_eq!(v6.prefix(), 128);
        assert!(parse_interface_network("garbage").is_none());
    }

    #[test]
    fn test_gateway_in_any() {
        let nets = vec![
            parse_interface_network("10.0.0.1/24").unwrap(),
            parse_interface_network("172.16.0.1/30").unwrap(),
        ];
        assert!(gateway_in_any("10.0.0.254", &nets));
        assert!(gateway_in_any("172.16.0.2", &nets));
        assert!(!gateway_in_any("11.0.0.1", &nets));
        assert!(!gateway_in_any("not-an-ip", &nets));
        assert!(!gateway_in_any("10.0.0.254", &[]));
    }
}

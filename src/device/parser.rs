//! Parser for the line-oriented `config.dump` device format.
//!
//! Recognized statements (one per line, `#` starts a comment line):
//!
//! ```text
//! hostname R1
//! interface Gig0/0 ip 10.0.0.1/24 vlan 10 mtu 1500 bw_mbps 1000 connected R2:Gig0/1
//! gateway vlan10 10.0.0.254
//! endpoint PC1 vlan 10 app video peak_mbps 200 avg_mbps 50
//! ```
//!
//! Interface keywords may appear in any order. Unknown statements are ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{DeviceRecord, EndpointRecord, InterfaceRecord, PeerRef};

/// Errors that can occur while parsing a device dump
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: invalid {field} value '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Compiled regex patterns for dump statements
struct DumpPatterns {
    interface_name: Regex,
    ip: Regex,
    vlan: Regex,
    mtu: Regex,
    bandwidth: Regex,
    connected: Regex,
    gateway: Regex,
}

impl DumpPatterns {
    fn new() -> Self {
        Self {
            interface_name: Regex::new(r"^interface\s+(\S+)").expect("Invalid interface regex"),
            ip: Regex::new(r"\bip\s+(\S+)").expect("Invalid ip regex"),
            vlan: Regex::new(r"\bvlan\s+(\d+)").expect("Invalid vlan regex"),
            mtu: Regex::new(r"\bmtu\s+(\d+)").expect("Invalid mtu regex"),
            bandwidth: Regex::new(r"\bbw_mbps\s+(\d+)").expect("Invalid bw_mbps regex"),
            connected: Regex::new(r"\bconnected\s+(\S+)").expect("Invalid connected regex"),
            gateway: Regex::new(r"^gateway\s+vlan(\d+)\s+(\S+)$").expect("Invalid gateway regex"),
        }
    }
}

static PATTERNS: LazyLock<DumpPatterns> = LazyLock::new(DumpPatterns::new);

fn parse_number<T: FromStr>(line: usize, field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse::<T>().map_err(|_| ParseError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

/// First capture group of `re` in `text`, if it matched
fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn parse_interface(line_no: usize, line: &str) -> Result<Option<InterfaceRecord>, ParseError> {
    let p = &*PATTERNS;
    let Some(name) = p.interface_name.captures(line).and_then(|c| c.get(1)) else {
        return Ok(None);
    };

    let mut it = InterfaceRecord::new(name.as_str());
    // Keywords are searched after the name so an interface called "ip" is not misread
    let rest = &line[name.end()..];

    it.address = capture(&p.ip, rest).map(str::to_string);
    if let Some(v) = capture(&p.vlan, rest) {
        it.vlan = Some(parse_number(line_no, "vlan", v)?);
    }
    if let Some(v) = capture(&p.mtu, rest) {
        it.mtu = parse_number(line_no, "mtu", v)?;
    }
    if let Some(v) = capture(&p.bandwidth, rest) {
        it.bandwidth_mbps = parse_number(line_no, "bw_mbps", v)?;
    }
    if let Some(conn) = capture(&p.connected, rest) {
        it.peer = PeerRef::parse(conn);
        if it.peer.is_none() {
            log::debug!("line {}: ignoring peer reference '{}' without ':'", line_no, conn);
        }
    }

    Ok(Some(it))
}

fn parse_endpoint(line_no: usize, line: &str) -> Result<EndpointRecord, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let name = parts.get(1).copied().unwrap_or_default();
    let value_of = |key: &str| {
        parts
            .iter()
            .position(|p| *p == key)
            .map(|idx| parts.get(idx + 1).copied().unwrap_or_default())
    };

    let mut ep = EndpointRecord::new(name, None, 0, 0);
    if let Some(v) = value_of("vlan") {
        ep.vlan = Some(parse_number(line_no, "vlan", v)?);
    }
    ep.app = value_of("app").filter(|v| !v.is_empty()).map(str::to_string);
    if let Some(v) = value_of("peak_mbps") {
        ep.peak_mbps = parse_number(line_no, "peak_mbps", v)?;
    }
    if let Some(v) = value_of("avg_mbps") {
        ep.avg_mbps = parse_number(line_no, "avg_mbps", v)?;
    }
    Ok(ep)
}

/// Parse the contents of a device dump.
///
/// `fallback_hostname` is used when the dump carries no `hostname` line.
pub fn parse_config_dump(content: &str, fallback_hostname: &str) -> Result<DeviceRecord, ParseError> {
    let mut hostname: Option<String> = None;
    let mut record = DeviceRecord::default();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("hostname ") {
            hostname = rest.split_whitespace().next().map(str::to_string);
        } else if line.starts_with("interface ") {
            if let Some(it) = parse_interface(line_no, line)? {
                record.interfaces.push(it);
            }
        } else if line.starts_with("gateway ") {
            match PATTERNS.gateway.captures(line) {
                Some(caps) => match caps[1].parse::<u16>() {
                    Ok(vlan) => {
                        record.gateways.insert(vlan, caps[2].to_string());
                    }
                    Err(_) => log::debug!("line {}: ignoring gateway with bad VLAN id", line_no),
                },
                None => log::debug!("line {}: ignoring malformed gateway statement", line_no),
            }
        } else if line.starts_with("endpoint ") {
            record.endpoints.push(parse_endpoint(line_no, line)?);
        } else {
            log::trace!("line {}: unrecognized statement", line_no);
        }
    }

    record.hostname = hostname.unwrap_or_else(|| fallback_hostname.to_string());
    Ok(record)
}

/// Read and parse a device dump file
pub fn parse_config_file(path: &Path, fallback_hostname: &str) -> Result<DeviceRecord, ParseError> {
    let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut record = parse_config_dump(&content, fallback_hostname)?;
    record.source_file = Some(path.to_path_buf());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# core router
hostname R1
interface Gig0/0 ip 10.0.0.1/24 vlan 10 mtu 1500 bw_mbps 1000 connected R2:Gig0/1
interface Gig0/1 connected S1:Fa0/1 ip 10.0.1.1/24 mtu 9000
interface Loop0
gateway vlan10 10.0.0.254
gateway vlanX 10.0.0.253
endpoint PC1 vlan 10 app video peak_mbps 200 avg_mbps 50
endpoint Printer
"#;

    #[test]
    fn test_parse_sample_dump() {
        let record = parse_config_dump(SAMPLE, "fallback").unwrap();
        assert_eq!(record.hostname, "R1");
        assert_eq!(record.interfaces.len(), 3);

        let gig0 = &record.interfaces[0];
        assert_eq!(gig0.address.as_deref(), Some("10.0.0.1/24"));
        assert_eq!(gig0.vlan, Some(10));
        assert_eq!(gig0.peer, PeerRef::parse("R2:Gig0/1"));

        // Keyword order does not matter
        let gig1 = &record.interfaces[1];
        assert_eq!(gig1.mtu, 9000);
        assert_eq!(gig1.bandwidth_mbps, 1000);
        assert_eq!(gig1.peer.as_ref().map(|p| p.device.as_str()), Some("S1"));

        let loop0 = &record.interfaces[2];
        assert!(loop0.address.is_none());
        assert_eq!(loop0.mtu, 1500);

        assert_eq!(record.gateways.len(), 1);
        assert_eq!(record.gateways.get(&10).map(String::as_str), Some("10.0.0.254"));

        assert_eq!(record.endpoints.len(), 2);
        assert_eq!(record.endpoints[0].peak_mbps, 200);
        assert_eq!(record.endpoints[0].avg_mbps, 50);
        assert_eq!(record.endpoints[0].app.as_deref(), Some("video"));
        assert_eq!(record.endpoints[1].vlan, None);
        assert_eq!(record.endpoints[1].peak_mbps, 0);
    }

    #[test]
    fn test_fallback_hostname() {
        let record = parse_config_dump("interface Gig0/0", "S7").unwrap();
        assert_eq!(record.hostname, "S7");
    }

    #[test]
    fn test_peer_without_separator_ignored() {
        let record = parse_config_dump("interface Gig0/0 connected R2", "R1").unwrap();
        assert!(record.interfaces[0].peer.is_none());
    }

    #[test]
    fn test_out_of_range_vlan_is_error() {
        let err = parse_config_dump("interface Gig0/0 vlan 70000", "R1").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 1, field: "vlan", .. }));
    }

    #[test]
    fn test_bad_endpoint_number_is_error() {
        let err = parse_config_dump("hostname R1\nendpoint PC1 peak_mbps lots", "R1").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 2, field: "peak_mbps", .. }));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/config.dump"), "R1").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}

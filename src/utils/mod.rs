//! Shared utilities: address parsing and CIDR helpers.

pub mod ip_utils;

pub use ip_utils::{gateway_in_any, parse_interface_network, parse_ip};

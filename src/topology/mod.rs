//! Network topology module.
//!
//! This module builds the undirected device graph from interface peer
//! references and provides the traversal queries the validators and the
//! simulation engine rely on.

pub mod types;
pub mod graph;
pub mod builder;

// Re-export key types and functions for easier access
pub use types::{EdgeKey, NodeKind, TopologyEdge, TopologyNode};
pub use graph::TopologyGraph;
pub use builder::build_graph;

//! Concurrent neighbor-discovery simulation.
//!
//! One actor thread per topology node periodically sends a discovery beacon
//! to each neighbor and records the beacons it receives. The engine owns the
//! shared run state and hands it to actors as capability handles:
//!
//! - [`RunGate`]: engine-wide pause/resume and cooperative stop
//! - [`LinkFailures`]: administratively failed links, applied symmetrically
//! - [`BeaconCounters`]: per-node sent/received counts
//!
//! Delivery is best-effort. Sends never fail the sender, nothing is retried
//! or acknowledged, and nothing is buffered across a pause.

pub mod control;
pub mod message;
pub mod transport;
pub mod node_log;
pub mod actor;
pub mod engine;
pub mod scenario;

pub use control::{BeaconCounters, BeaconStats, LinkFailures, RunGate};
pub use message::DiscoveryMessage;
pub use transport::{ChannelNetwork, ChannelTransport, Frame, Transport, TransportError};
pub use node_log::{FileLogSink, LogLine, LogSink, MemoryLogSink, NodeLog};
pub use actor::{Actor, ActorContext};
pub use engine::{RunState, SimulationEngine, SimulationSummary};
pub use scenario::run_scenario;

/// Errors raised by the simulation engine
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("inbound endpoint for {node} is already bound")]
    EndpointUnavailable { node: String },

    #[error("failed to open log for {node}: {source}")]
    LogSink {
        node: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn actor for {node}: {source}")]
    Spawn {
        node: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        state: RunState,
        action: &'static str,
    },

    #[error("unknown node {0}")]
    UnknownNode(String),
}

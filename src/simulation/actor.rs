//! Per-node discovery actor.

use std::sync::Arc;
use std::time::Duration;

use super::control::{BeaconCounters, LinkFailures, RunGate};
use super::message::DiscoveryMessage;
use super::node_log::NodeLog;
use super::transport::Transport;
use crate::topology::NodeKind;

/// Engine-owned handles an actor runs against
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub gate: Arc<RunGate>,
    pub failures: Arc<LinkFailures>,
    pub counters: Arc<BeaconCounters>,
    pub interval: Duration,
}

/// One simulated device.
///
/// Each cycle: wait for the gate, send a beacon to every neighbor whose link
/// is not failed, drain and record inbound beacons, sleep one interval.
pub struct Actor<T: Transport> {
    name: String,
    kind: NodeKind,
    neighbors: Vec<String>,
    transport: T,
    ctx: ActorContext,
    log: Box<dyn NodeLog>,
}

impl<T: Transport> Actor<T> {
    pub fn new(
        name: &str,
        kind: NodeKind,
        neighbors: Vec<String>,
        transport: T,
        ctx: ActorContext,
        log: Box<dyn NodeLog>,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            neighbors,
            transport,
            ctx,
            log,
        }
    }

    /// Run until the gate signals stop. Dropping `self` closes the inbound endpoint.
    pub fn run(mut self) {
        self.log.log(&format!(
            "Node {} ({}) started with neighbors [{}]",
            self.name,
            self.kind,
            self.neighbors.join(", ")
        ));
        log::debug!("Actor {} started", self.name);

        while self.ctx.gate.wait_runnable() {
            self.run_cycle();
            if !self.ctx.gate.sleep(self.ctx.interval) {
                break;
            }
        }

        self.log.log(&format!("Node {} stopped", self.name));
        log::debug!("Actor {} stopped", self.name);
    }

    fn run_cycle(&mut self) {
        self.send_beacons();
        self.drain_inbox();
    }

    fn send_beacons(&mut self) -> usize {
        let mut sent = 0;
        for nb in &self.neighbors {
            if self.ctx.failures.is_failed(&self.name, nb) {
                continue;
            }
            let frame = DiscoveryMessage::new(&self.name, nb).encode();
            match self.transport.send(nb, frame) {
                Ok(()) => {
                    self.ctx.counters.record_sent();
                    sent += 1;
                }
                Err(e) => log::debug!("{}: beacon to {} dropped: {}", self.name, nb, e),
            }
        }
        sent
    }

    fn drain_inbox(&mut self) -> usize {
        let mut received = 0;
        for frame in self.transport.drain_inbound() {
            match DiscoveryMessage::decode(&frame) {
                Some(msg) => {
                    self.log.log(&format!("{} recv: {}", self.name, msg));
                    self.ctx.counters.record_received();
                    received += 1;
                }
                None => log::trace!("{}: ignoring frame {:?}", self.name, frame),
            }
        }
        received
    }
}

//! Simulation engine: actor lifecycle and run-state machine.
//!
//! ```text
//! NotStarted --start--> Running --pause--> Paused --resume--> Running
//!                       Running/Paused --stop--> Stopped (terminal)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorContext};
use super::control::{BeaconCounters, BeaconStats, LinkFailures, RunGate};
use super::node_log::LogSink;
use super::transport::ChannelNetwork;
use super::SimulationError;
use crate::topology::{EdgeKey, TopologyGraph};

/// Lifecycle state of a [`SimulationEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    NotStarted,
    Running,
    Paused,
    Stopped,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Beacon counts per node
    pub nodes: BTreeMap<String, BeaconStats>,
    /// Links failed at the time the summary was taken
    pub failed_links: Vec<String>,
}

/// Runs one discovery actor per topology node.
///
/// The topology is shared read-only. Pause, stop and link-failure state is
/// owned here and handed to actors as `Arc` handles.
pub struct SimulationEngine {
    graph: Arc<TopologyGraph>,
    interval: Duration,
    sink: Arc<dyn LogSink>,
    state: RunState,
    gate: Arc<RunGate>,
    failures: Arc<LinkFailures>,
    network: Arc<ChannelNetwork>,
    counters: BTreeMap<String, Arc<BeaconCounters>>,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl SimulationEngine {
    pub fn new(graph: Arc<TopologyGraph>, interval: Duration, sink: Arc<dyn LogSink>) -> Self {
        let counters = graph
            .nodes()
            .map(|node| (node.name.clone(), Arc::new(BeaconCounters::default())))
            .collect();
        Self {
            graph,
            interval,
            sink,
            state: RunState::NotStarted,
            gate: Arc::new(RunGate::new()),
            failures: Arc::new(LinkFailures::new()),
            network: Arc::new(ChannelNetwork::new()),
            counters,
            handles: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition_error(&self, action: &'static str) -> SimulationError {
        SimulationError::InvalidTransition {
            state: self.state,
            action,
        }
    }

    /// Bind every endpoint and spawn every actor.
    ///
    /// Actors are held at the gate until all of them exist. If any endpoint,
    /// log or thread cannot be acquired the actors spawned so far are stopped
    /// and the error is returned; the engine ends up `Stopped`.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        if self.state != RunState::NotStarted {
            return Err(self.transition_error("start"));
        }

        self.gate.pause();
        if let Err(e) = self.spawn_actors() {
            log::error!("Simulation start failed: {}", e);
            self.shutdown();
            return Err(e);
        }
        self.gate.resume();

        self.state = RunState::Running;
        log::info!(
            "Simulation started with {} actors (cycle interval {:?})",
            self.handles.len(),
            self.interval
        );
        Ok(())
    }

    fn spawn_actors(&mut self) -> Result<(), SimulationError> {
        let mut inboxes = BTreeMap::new();
        for node in self.graph.nodes() {
            inboxes.insert(node.name.clone(), self.network.bind(&node.name)?);
        }

        for node in self.graph.nodes() {
            let Some(inbox) = inboxes.remove(&node.name) else {
                continue;
            };
            // Only neighbors with a device record take part
            let neighbors: Vec<String> = self
                .graph
                .neighbors(&node.name)
                .into_iter()
                .filter(|nb| self.graph.contains_node(nb))
                .collect();

            let transport = self.network.connect(&node.name, inbox, &neighbors);
            let log = self.sink.open(&node.name).map_err(|source| SimulationError::LogSink {
                node: node.name.clone(),
                source,
            })?;
            let counters = self
                .counters
                .entry(node.name.clone())
                .or_default()
                .clone();
            let ctx = ActorContext {
                gate: Arc::clone(&self.gate),
                failures: Arc::clone(&self.failures),
                counters,
                interval: self.interval,
            };

            let actor = Actor::new(&node.name, node.kind, neighbors, transport, ctx, log);
            let handle = thread::Builder::new()
                .name(format!("actor-{}", node.name))
                .spawn(move || actor.run())
                .map_err(|source| SimulationError::Spawn {
                    node: node.name.clone(),
                    source,
                })?;
            self.handles.push((node.name.clone(), handle));
        }

        Ok(())
    }

    /// Hold every actor at the gate from its next cycle on
    pub fn pause(&mut self) -> Result<(), SimulationError> {
        if self.state != RunState::Running {
            return Err(self.transition_error("pause"));
        }
        self.gate.pause();
        self.state = RunState::Paused;
        log::info!("Simulation paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SimulationError> {
        if self.state != RunState::Paused {
            return Err(self.transition_error("resume"));
        }
        self.gate.resume();
        self.state = RunState::Running;
        log::info!("Simulation resumed");
        Ok(())
    }

    fn check_link(&self, a: &str, b: &str) -> Result<(), SimulationError> {
        for name in [a, b] {
            if !self.graph.contains_node(name) {
                return Err(SimulationError::UnknownNode(name.to_string()));
            }
        }
        Ok(())
    }

    /// Administratively fail the link `a-b` in both directions.
    ///
    /// Allowed in any state before `Stopped`; takes effect from each
    /// endpoint's next cycle.
    pub fn inject_failure(&self, a: &str, b: &str) -> Result<(), SimulationError> {
        if self.state == RunState::Stopped {
            return Err(self.transition_error("inject_failure"));
        }
        self.check_link(a, b)?;
        self.failures.mark(a, b);
        log::info!("Injected failure on link {}", EdgeKey::new(a, b));
        Ok(())
    }

    /// Un-mark a failed link. Returns whether it was marked.
    pub fn clear_failure(&self, a: &str, b: &str) -> Result<bool, SimulationError> {
        if self.state == RunState::Stopped {
            return Err(self.transition_error("clear_failure"));
        }
        self.check_link(a, b)?;
        let cleared = self.failures.clear(a, b);
        if cleared {
            log::info!("Cleared failure on link {}", EdgeKey::new(a, b));
        }
        Ok(cleared)
    }

    pub fn failed_links(&self) -> Vec<EdgeKey> {
        self.failures.failed_links()
    }

    /// Current beacon counts per node
    pub fn stats(&self) -> BTreeMap<String, BeaconStats> {
        self.counters
            .iter()
            .map(|(name, counters)| (name.clone(), counters.snapshot()))
            .collect()
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            nodes: self.stats(),
            failed_links: self.failed_links().iter().map(ToString::to_string).collect(),
        }
    }

    /// Signal every actor to exit, close the endpoints and join the threads
    pub fn stop(&mut self) -> Result<(), SimulationError> {
        if !matches!(self.state, RunState::Running | RunState::Paused) {
            return Err(self.transition_error("stop"));
        }
        self.shutdown();
        log::info!("Simulation stopped");
        Ok(())
    }

    fn shutdown(&mut self) {
        self.gate.stop();
        self.network.close();
        for (name, handle) in self.handles.drain(..) {
            if handle.join().is_err() {
                log::warn!("Actor {} panicked", name);
            }
        }
        self.state = RunState::Stopped;
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        if matches!(self.state, RunState::Running | RunState::Paused) {
            self.shutdown();
        }
    }
}

//! Shared run state handed from the engine to every actor.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::topology::EdgeKey;

#[derive(Debug, Default)]
struct GateState {
    paused: bool,
    stopped: bool,
}

/// Engine-wide run gate.
///
/// Actors block on it at the start of every cycle while paused, and sleep on
/// it between cycles so that a stop wakes them immediately. Once stopped the
/// gate never reopens.
#[derive(Debug, Default)]
pub struct RunGate {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl RunGate {
    /// A gate that starts open
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.state.lock().paused = true;
    }

    pub fn resume(&self) {
        let mut state = self.state.lock();
        state.paused = false;
        self.changed.notify_all();
    }

    /// Signal stop to every waiter. Irreversible.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        state.stopped = true;
        self.changed.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }

    /// Block while paused. Returns `false` once stop has been signalled.
    pub fn wait_runnable(&self) -> bool {
        let mut state = self.state.lock();
        while state.paused && !state.stopped {
            self.changed.wait(&mut state);
        }
        !state.stopped
    }

    /// Sleep for `interval` or until stop, whichever comes first.
    ///
    /// Returns `false` if stop was signalled.
    pub fn sleep(&self, interval: Duration) -> bool {
        let deadline = Instant::now() + interval;
        let mut state = self.state.lock();
        while !state.stopped {
            if self.changed.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        !state.stopped
    }
}

/// Administratively failed links, stored per node.
///
/// Marking is symmetric: failing `a-b` puts `b` in `a`'s set and `a` in
/// `b`'s. Nothing heals automatically.
#[derive(Debug, Default)]
pub struct LinkFailures {
    failed: RwLock<HashMap<String, HashSet<String>>>,
}

impl LinkFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, a: &str, b: &str) {
        let mut failed = self.failed.write();
        failed.entry(a.to_string()).or_default().insert(b.to_string());
        failed.entry(b.to_string()).or_default().insert(a.to_string());
    }

    /// Un-mark a link. Returns whether it was marked.
    pub fn clear(&self, a: &str, b: &str) -> bool {
        let mut failed = self.failed.write();
        let mut removed = false;
        for (node, peer) in [(a, b), (b, a)] {
            if let Some(set) = failed.get_mut(node) {
                removed |= set.remove(peer);
                if set.is_empty() {
                    failed.remove(node);
                }
            }
        }
        removed
    }

    pub fn is_failed(&self, node: &str, neighbor: &str) -> bool {
        self.failed
            .read()
            .get(node)
            .is_some_and(|set| set.contains(neighbor))
    }

    /// Every failed link once, in key order
    pub fn failed_links(&self) -> Vec<EdgeKey> {
        self.failed
            .read()
            .iter()
            .flat_map(|(node, peers)| peers.iter().map(move |peer| EdgeKey::new(node, peer)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Beacon counts of one node at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconStats {
    pub sent: u64,
    pub received: u64,
}

/// Live beacon counters of one node
#[derive(Debug, Default)]
pub struct BeaconCounters {
    sent: AtomicU64,
    received: AtomicU64,
}

impl BeaconCounters {
    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> BeaconStats {
        BeaconStats {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_gate_blocks_while_paused() {
        let gate = Arc::new(RunGate::new());
        gate.pause();

        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait_runnable())
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        gate.resume();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_stop_releases_paused_waiters() {
        let gate = Arc::new(RunGate::new());
        gate.pause();
        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait_runnable())
        };
        gate.stop();
        assert!(!waiter.join().unwrap());
        assert!(gate.is_stopped());
    }

    #[test]
    fn test_stop_interrupts_sleep() {
        let gate = Arc::new(RunGate::new());
        let sleeper = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                let start = Instant::now();
                let keep_going = gate.sleep(Duration::from_secs(30));
                (keep_going, start.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(20));
        gate.stop();
        let (keep_going, elapsed) = sleeper.join().unwrap();
        assert!(!keep_going);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_sleep_runs_full_interval_when_not_stopped() {
        let gate = RunGate::new();
        let start = Instant::now();
        assert!(gate.sleep(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_link_failures_are_symmetric() {
        let failures = LinkFailures::new();
        failures.mark("A", "B");
        assert!(failures.is_failed("A", "B"));
        assert!(failures.is_failed("B", "A"));
        assert!(!failures.is_failed("A", "C"));
        assert_eq!(failures.failed_links(), vec![EdgeKey::new("A", "B")]);

        assert!(failures.clear("B", "A"));
        assert!(!failures.is_failed("A", "B"));
        assert!(!failures.clear("A", "B"));
        assert!(failures.failed_links().is_empty());
    }

    #[test]
    fn test_counters_snapshot() {
        let counters = BeaconCounters::default();
        counters.record_sent();
        counters.record_sent();
        counters.record_received();
        assert_eq!(counters.snapshot(), BeaconStats { sent: 2, received: 1 });
    }
}

//! Scripted simulation run: inject failures, start, run, pause, resume, stop.

use std::sync::Arc;
use std::thread;

use super::engine::{SimulationEngine, SimulationSummary};
use super::node_log::LogSink;
use super::SimulationError;
use crate::settings::SimulationSettings;
use crate::topology::TopologyGraph;

/// Drive one full simulation run and return its summary.
///
/// `run_duration` is split in two halves around a `pause_window`. Configured
/// failures that name unknown nodes or do not parse are logged and skipped.
pub fn run_scenario(
    graph: Arc<TopologyGraph>,
    settings: &SimulationSettings,
    sink: Arc<dyn LogSink>,
) -> Result<SimulationSummary, SimulationError> {
    let mut engine = SimulationEngine::new(graph, settings.cycle_interval, sink);

    // Failures are in place before the first cycle
    for spec in &settings.failures {
        match crate::settings::parse_link_spec(spec) {
            Ok((a, b)) => {
                if let Err(e) = engine.inject_failure(&a, &b) {
                    log::warn!("Skipping link failure {}: {}", spec, e);
                }
            }
            Err(e) => log::warn!("Skipping link failure: {}", e),
        }
    }
    engine.start()?;

    let half = settings.run_duration / 2;
    thread::sleep(half);

    engine.pause()?;
    thread::sleep(settings.pause_window);
    engine.resume()?;

    thread::sleep(settings.run_duration - half);
    engine.stop()?;

    let summary = engine.summary();
    log::info!(
        "Simulation finished: {} nodes, {} failed link(s)",
        summary.nodes.len(),
        summary.failed_links.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceMap, DeviceRecord, InterfaceRecord};
    use crate::simulation::MemoryLogSink;
    use std::time::Duration;

    #[test]
    fn test_scenario_runs_and_skips_unknown_failures() {
        let mut devices = DeviceMap::new();
        let mut r1 = DeviceRecord::new("R1");
        r1.interfaces.push(InterfaceRecord::new("g0").with_peer("S1", "g0"));
        devices.insert("R1".to_string(), r1);
        devices.insert("S1".to_string(), DeviceRecord::new("S1"));
        let graph = Arc::new(crate::topology::build_graph(&devices));

        let settings = SimulationSettings {
            cycle_interval: Duration::from_millis(10),
            run_duration: Duration::from_millis(100),
            pause_window: Duration::from_millis(20),
            failures: vec!["R1-X9".to_string(), "bogus".to_string()],
        };
        let sink = MemoryLogSink::new();
        let summary = run_scenario(graph, &settings, Arc::new(sink.clone())).unwrap();

        assert!(summary.failed_links.is_empty());
        assert!(summary.nodes["R1"].sent > 0);
        assert!(summary.nodes["S1"].received > 0);
        assert_eq!(sink.lines_for("S1").last().map(String::as_str), Some("Node S1 stopped"));
    }

    #[test]
    fn test_configured_failure_blocks_first_cycle() {
        let mut devices = DeviceMap::new();
        let mut r1 = DeviceRecord::new("R1");
        r1.interfaces.push(InterfaceRecord::new("g0").with_peer("S1", "g0"));
        devices.insert("R1".to_string(), r1);
        devices.insert("S1".to_string(), DeviceRecord::new("S1"));
        let graph = Arc::new(crate::topology::build_graph(&devices));

        let settings = SimulationSettings {
            cycle_interval: Duration::from_millis(10),
            run_duration: Duration::from_millis(60),
            pause_window: Duration::from_millis(10),
            failures: vec!["S1-R1".to_string()],
        };
        let sink = MemoryLogSink::new();
        let summary = run_scenario(graph, &settings, Arc::new(sink.clone())).unwrap();

        assert_eq!(summary.failed_links, vec!["R1-S1"]);
        assert_eq!(summary.nodes["R1"].sent, 0);
        assert_eq!(summary.nodes["S1"].sent, 0);
        assert_eq!(sink.count_matching("S1", "HELLO"), 0);
        assert_eq!(sink.count_matching("R1", "HELLO"), 0);
    }
}

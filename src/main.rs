use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use topocheck::analysis::{self, CapacitySection, Report, ReportSummary};
use topocheck::settings::{self, Settings};
use topocheck::simulation::{run_scenario, FileLogSink};
use topocheck::{device, topology, validation};

/// Configuration consistency checker and discovery simulator for device dumps
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding one sub-directory with a config.dump per device
    #[arg(short, long)]
    conf: PathBuf,

    /// Output path for the JSON report
    #[arg(short, long, default_value = "output/report.json")]
    report: PathBuf,

    /// Optional YAML settings file for the simulation
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Run the neighbor-discovery simulation after the checks
    #[arg(long)]
    run_sim: bool,

    /// Fail a link during the simulation, written A-B (repeatable)
    #[arg(long = "inject-failure", value_name = "A-B", requires = "run_sim")]
    inject_failures: Vec<String>,

    /// Override the simulation run duration in seconds
    #[arg(long, requires = "run_sim")]
    run_seconds: Option<u64>,

    /// Log filter, e.g. info or topocheck=debug
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.init();
}

/// Merge the settings file with command-line overrides
fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => settings::load_settings(path)?,
        None => Settings::default(),
    };

    if let Some(secs) = args.run_seconds {
        settings.simulation.run_duration = Duration::from_secs(secs);
    }
    settings
        .simulation
        .failures
        .extend(args.inject_failures.iter().cloned());
    settings
        .validate()
        .wrap_err("Invalid simulation settings")?;

    Ok(settings)
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    info!("Starting topocheck");
    info!("Configuration directory: {:?}", args.conf);
    info!("Report path: {:?}", args.report);

    let settings = resolve_settings(&args)?;

    let devices = device::load_configs(&args.conf)?;
    if devices.is_empty() {
        warn!("No device configurations found under {:?}", args.conf);
    }

    let graph = topology::build_graph(&devices);
    info!(
        "Topology has {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let issues = validation::run_all(&devices, &graph);
    for issue in &issues {
        warn!("{}", issue);
    }

    let vlan_loads = analysis::summarize_endpoint_load(&devices);
    let recommendations: Vec<_> = analysis::recommend_link_capacity(&graph, &vlan_loads)
        .into_iter()
        .map(validation::Issue::from)
        .collect();
    for rec in &recommendations {
        warn!("{}", rec);
    }

    let mut report = Report {
        summary: ReportSummary::from_graph(&graph),
        issues,
        capacity: CapacitySection {
            vlan_loads,
            recommendations,
        },
        simulation: None,
    };

    if args.run_sim {
        let log_dir = args
            .report
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("sim")
            .join("logs");
        info!("Running simulation, node logs in {:?}", log_dir);

        let summary = run_scenario(
            Arc::new(graph),
            &settings.simulation,
            Arc::new(FileLogSink::new(log_dir)),
        )
        .wrap_err("Simulation failed")?;
        report.simulation = Some(summary);
    }

    analysis::generate_json_report(&report, &args.report)?;

    info!(
        "Check completed with {} finding(s)",
        report.finding_count()
    );
    Ok(())
}

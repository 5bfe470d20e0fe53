//! Run every allocation mechanism on the same fleet and batch, then compare fleet costs

use chrono::Local;
use clap::Parser;
use fleetalloc::auction::logging as alloc_log;
use fleetalloc::fleet::data::{GridParams, Instance, load_instance, save_instance};
use fleetalloc::fleet::report::{ComparisonReport, build_run, write_report_json};
use fleetalloc::logger::{self, LogConfig};
use fleetalloc::{AllocConfig, Heuristic, Mechanism, RouteStrategy, allocate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OutputConfig {
    dir: String,
    use_timestamp: bool,
    timestamp_fmt: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "results".to_string(),
            use_timestamp: true,
            timestamp_fmt: "%Y-%m-%d_%H-%M-%S".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunConfig {
    grid: GridParams,
    /// Load agents and tasks from here instead of generating them
    instance: Option<PathBuf>,
    mechanisms: Vec<Mechanism>,
    heuristic: Heuristic,
    route_strategy: Option<RouteStrategy>,
    seed: u64,
    output_config: OutputConfig,
    log: LogConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            grid: GridParams::default(),
            instance: None,
            mechanisms: Mechanism::ALL.to_vec(),
            heuristic: Heuristic::default(),
            route_strategy: None,
            seed: 0,
            output_config: OutputConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (.json or .pkl)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory (overrides config)
    #[arg(long)]
    output: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config: RunConfig = match &cli.config {
        Some(path) => match fleetalloc::config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return Err(e.into());
            }
        },
        None => RunConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(output) = cli.output {
        config.output_config.dir = output;
    }

    let output = &config.output_config;
    let result_dir = if output.use_timestamp {
        let date_str = Local::now().format(&output.timestamp_fmt).to_string();
        Path::new(&output.dir).join(date_str)
    } else {
        PathBuf::from(&output.dir)
    };
    std::fs::create_dir_all(&result_dir)?;

    let log_guard = logger::init(&config.log, &result_dir)?;
    info!("Results directory: {}", result_dir.display());
    if let Some(path) = &log_guard.path {
        info!("Logging to {}", path.display());
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let instance = match &config.instance {
        Some(path) => {
            info!("Loading instance from {}", path.display());
            load_instance(path)?
        }
        None => {
            let instance = Instance::generate(&config.grid, &mut rng);
            info!(
                "Generated {} agents and {} tasks on a {}x{} grid (seed {})",
                instance.agents.len(),
                instance.tasks.len(),
                config.grid.size,
                config.grid.size,
                config.seed
            );
            instance
        }
    };
    save_instance(&instance, &result_dir.join("instance.json"))?;

    let mut runs = Vec::with_capacity(config.mechanisms.len());
    for &mechanism in &config.mechanisms {
        let mut agents = instance.agents.clone();
        let mut pending = instance.tasks.clone();
        let mut alloc_config = AllocConfig::new(mechanism).with_heuristic(config.heuristic);
        if let Some(strategy) = config.route_strategy {
            alloc_config = alloc_config.with_route_strategy(strategy);
        }

        info!("=== {} ({}) ===", mechanism, config.heuristic);
        let started = Instant::now();
        let assignment = match allocate(&mut pending, &mut agents, &alloc_config, &mut rng) {
            Ok(a) => a,
            Err(e) => {
                error!("{} failed: {}", mechanism, e);
                continue;
            }
        };
        if !pending.is_empty() {
            warn!("{} left {} tasks pending", mechanism, pending.len());
        }

        alloc_log::log_assignment_table(&assignment);
        alloc_log::log_fleet_status(&agents);
        runs.push(build_run(mechanism, config.heuristic, &agents, started));
    }

    let report = ComparisonReport {
        runs,
        agent_count: instance.agents.len(),
        task_count: instance.tasks.len(),
    };
    if let Some(best) = report.best() {
        info!("Lowest fleet cost: {} at {:.2}", best.mechanism, best.total_cost);
    }
    let summary_path = write_report_json(&report, &result_dir)?;
    info!("Summary written to {}", summary_path.display());

    Ok(())
}

//! Headless engine binary for the Formica colony simulation.
//!
//! Loads configuration, seeds a demo scenario around the colony, runs a
//! bounded number of fixed-duration ticks, and prints the final world
//! snapshot as JSON on stdout. All logging goes to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `formica-config.yaml` (or `$FORMICA_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the simulation from config
//! 4. Seed the scenario (trails, food, ants, eggs, hostiles)
//! 5. Run until the tick bound or extinction
//! 6. Log the result and print the final snapshot

mod error;
mod progress;
mod scenario;

use std::path::{Path, PathBuf};

use formica_core::config::LoggingConfig;
use formica_core::runner;
use formica_core::{Simulation, SimulationConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;

/// Environment variable overriding the config file location.
const CONFIG_ENV: &str = "FORMICA_CONFIG";

/// Config file looked up in the working directory by default.
const DEFAULT_CONFIG_PATH: &str = "formica-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the run itself fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path();
    let (config, from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        path = %config_path.display(),
        from_file,
        world_name = %config.world.name,
        seed = config.world.seed,
        max_ticks = config.simulation.max_ticks,
        "formica-engine starting"
    );

    // 3. Build the simulation.
    let mut sim = Simulation::from_config(&config)?;

    // 4. Seed the scenario.
    let scenario_config = scenario::load_scenario_config(&config_path)?;
    scenario::seed_scenario(&mut sim, &scenario_config, config.world.seed)?;

    // 5. Run.
    let mut progress = ProgressCallback::new(config.simulation.progress_interval);
    let result = runner::run_bounded(&mut sim, config.simulation.max_ticks, &mut progress)
        .map_err(EngineError::from)?;

    // 6. Log and print.
    runner::log_run_end(&result);
    let json = serde_json::to_string_pretty(&sim.snapshot()).map_err(EngineError::from)?;
    println!("{json}");

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "formica-engine shutdown complete"
    );
    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load the simulation configuration, falling back to defaults when the
/// file does not exist. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

/// Install the global `tracing` subscriber on stderr.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

//! Headless launcher for the Creatures simulation.
//!
//! Loads configuration, seeds the arena with a random population, and runs
//! the simulation loop until the tick limit is reached or the process
//! receives Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `creatures-config.yaml` (or the path given
//!    as the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Validate configuration and build the arena
//! 4. Spawn the initial population
//! 5. Share the world through a simulation handle
//! 6. Run the driver task until it ends or Ctrl-C requests a stop
//! 7. Log the result

mod error;
mod observer_callback;
mod spawner;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use creatures_core::config::{LogFormat, LoggingConfig, SimulationConfig};
use creatures_core::operator::SimulationHandle;
use creatures_core::population::PopulationFactory;
use creatures_core::runner;
use creatures_core::world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_callback::LoggingCallback;
use crate::spawner::{ColorCubePopulation, SpawnerConfig};

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "creatures-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, arena, or population setup fails, or
/// if the simulation task dies.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("creatures-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }

    // 3. Validate and build the arena.
    config.validate().map_err(EngineError::from)?;
    let bounds = config.bounds().map_err(EngineError::from)?;
    info!(
        width = bounds.width(),
        height = bounds.height(),
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.simulation.max_ticks,
        "Arena configured"
    );

    // 4. Spawn the initial population.
    let spawner_config = SpawnerConfig::from_config(&config).map_err(EngineError::from)?;
    let mut factory = ColorCubePopulation::new(spawner_config, config.population.seed);
    let agents = factory
        .populate(config.population.count, &bounds)
        .map_err(EngineError::from)?;
    info!(
        count = agents.len(),
        policy = %config.population.policy,
        seed = ?config.population.seed,
        "Initial population spawned"
    );

    // 5. Share the world.
    let world = World::with_bounds(bounds, agents);
    let handle = Arc::new(SimulationHandle::new(
        world,
        config.world.tick_interval_ms,
        &config.simulation,
    ));

    // 6. Run the driver until it finishes or an operator stops it.
    let driver_handle = Arc::clone(&handle);
    let report_interval = config.simulation.report_interval_ticks;
    let mut driver = tokio::spawn(async move {
        let mut callback = LoggingCallback::new(report_interval);
        runner::run_simulation(&driver_handle, &mut callback).await
    });

    let joined = tokio::select! {
        joined = &mut driver => joined,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                tracing::warn!(error = %e, "failed to listen for Ctrl-C, stopping");
            }
            info!("Stop requested from terminal");
            handle.request_stop();
            driver.await
        }
    };
    let result = joined.map_err(|e| EngineError::Task {
        message: format!("{e}"),
    })?;

    // 7. Log results.
    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "creatures-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        let mut config = SimulationConfig::default();
        config.population.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

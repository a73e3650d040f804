//! Configuration loading and typed config structures for the Creatures
//! simulation.
//!
//! The canonical configuration lives in `creatures-config.yaml` at the
//! project root. Every key is optional; a missing key takes the value the
//! simulator has always used.

use std::path::Path;

use creatures_agents::config::{
    DEFAULT_FIELD_OF_VIEW, DEFAULT_SIZE, DEFAULT_VISION_RADIUS, MIN_SEPARATION, MIN_SPEED,
};
use creatures_agents::{AgentError, FlockingParams};
use creatures_types::{HeadingMean, PolicyKind};
use serde::Deserialize;

use crate::world::{Bounds, WorldError};

/// Environment variable that overrides `population.seed`.
pub const SEED_ENV_VAR: &str = "CREATURES_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `creatures-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Arena size and pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Perception defaults handed to every spawned agent.
    #[serde(default)]
    pub perception: PerceptionConfig,

    /// Flocking policy tunables.
    #[serde(default)]
    pub flocking: FlockingConfig,

    /// Initial population parameters.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CREATURES_SEED`, when set to an integer, overrides
    /// `population.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.population.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.population.apply_env_overrides();
        Ok(config)
    }

    /// Check every range constraint the kernel relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        if !self.perception.field_of_view.is_finite()
            || self.perception.field_of_view <= 0.0
            || self.perception.field_of_view > core::f64::consts::TAU
        {
            return Err(ConfigError::Invalid {
                field: "perception.field_of_view",
                reason: format!(
                    "must be in (0, 2π], got {}",
                    self.perception.field_of_view
                ),
            });
        }
        non_negative("perception.vision_radius", self.perception.vision_radius)?;
        non_negative("flocking.min_speed", self.flocking.min_speed)?;
        non_negative("flocking.min_separation", self.flocking.min_separation)?;
        non_negative("population.max_speed", self.population.max_speed)?;
        Ok(())
    }

    /// Flocking parameters for every flocker the engine spawns.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidFlocking`] if a threshold is out of
    /// range.
    pub fn flocking_params(&self) -> Result<FlockingParams, AgentError> {
        FlockingParams::new(
            self.flocking.min_speed,
            self.flocking.min_separation,
            self.flocking.heading_mean,
        )
    }

    /// Arena bounds from `world.width` and `world.height`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBounds`] if either dimension is not
    /// finite and positive.
    pub fn bounds(&self) -> Result<Bounds, WorldError> {
        Bounds::new(self.world.width, self.world.height)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite and > 0, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite and >= 0, got {value}"),
        })
    }
}

/// Arena and pacing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Arena width, centered on the origin.
    #[serde(default = "default_width")]
    pub width: f64,

    /// Arena height, centered on the origin.
    #[serde(default = "default_height")]
    pub height: f64,

    /// Fixed delay between tick passes in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Perception applied to spawned agents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PerceptionConfig {
    /// Full view-cone width in radians.
    #[serde(default = "default_field_of_view")]
    pub field_of_view: f64,

    /// Maximum perception distance.
    #[serde(default = "default_vision_radius")]
    pub vision_radius: f64,

    /// Presentation size.
    #[serde(default = "default_size")]
    pub size: u32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            field_of_view: default_field_of_view(),
            vision_radius: default_vision_radius(),
            size: default_size(),
        }
    }
}

/// Flocking policy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlockingConfig {
    /// Speed floor after averaging.
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,

    /// Closest neighbor distance at which a flocker still moves.
    #[serde(default = "default_min_separation")]
    pub min_separation: f64,

    /// Heading averaging mode (`arithmetic` or `circular`).
    #[serde(default)]
    pub heading_mean: HeadingMean,
}

impl Default for FlockingConfig {
    fn default() -> Self {
        Self {
            min_speed: default_min_speed(),
            min_separation: default_min_separation(),
            heading_mean: HeadingMean::default(),
        }
    }
}

/// Initial population configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents to spawn at simulation start.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Exclusive upper bound for the random initial speed.
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Policy given to every spawned agent.
    #[serde(default)]
    pub policy: PolicyKind,

    /// Seed for a reproducible population; `None` draws from the thread
    /// RNG.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PopulationConfig {
    /// Override the seed with `CREATURES_SEED` when it parses as `u64`.
    pub fn apply_env_overrides(&mut self) {
        if let Some(seed) = std::env::var(SEED_ENV_VAR)
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
        {
            self.seed = Some(seed);
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            max_speed: default_max_speed(),
            policy: PolicyKind::default(),
            seed: None,
        }
    }
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = run until stopped).
    #[serde(default)]
    pub max_ticks: u64,

    /// Emit a progress report every N ticks (0 = never).
    #[serde(default = "default_report_interval_ticks")]
    pub report_interval_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: 0,
            report_interval_ticks: default_report_interval_ticks(),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_width() -> f64 {
    640.0
}

const fn default_height() -> f64 {
    480.0
}

const fn default_tick_interval_ms() -> u64 {
    10
}

const fn default_field_of_view() -> f64 {
    DEFAULT_FIELD_OF_VIEW
}

const fn default_vision_radius() -> f64 {
    DEFAULT_VISION_RADIUS
}

const fn default_size() -> u32 {
    DEFAULT_SIZE
}

const fn default_min_speed() -> f64 {
    MIN_SPEED
}

const fn default_min_separation() -> f64 {
    MIN_SEPARATION
}

const fn default_count() -> usize {
    5
}

const fn default_max_speed() -> f64 {
    10.0
}

const fn default_report_interval_ticks() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_owned()
}

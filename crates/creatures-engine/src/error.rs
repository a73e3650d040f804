//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup so `main` can
//! propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: creatures_core::config::ConfigError,
    },

    /// Arena construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: creatures_core::world::WorldError,
    },

    /// Population building failed.
    #[error("spawner error: {source}")]
    Population {
        /// The underlying population error.
        #[from]
        source: creatures_core::population::PopulationError,
    },

    /// The simulation task panicked or was cancelled.
    #[error("simulation task failed: {message}")]
    Task {
        /// Description of the join failure.
        message: String,
    },
}

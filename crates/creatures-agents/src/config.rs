//! Default perception parameters and tunable flocking parameters.
//!
//! The defaults match the values the simulator has always used. The
//! engine builds [`FlockingParams`] from `creatures-config.yaml` at startup
//! and hands them to every flocker it spawns.

use core::f64::consts::FRAC_PI_4;

use creatures_types::HeadingMean;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Default full width of an agent's view cone, in radians.
pub const DEFAULT_FIELD_OF_VIEW: f64 = FRAC_PI_4;

/// Default maximum perception distance.
pub const DEFAULT_VISION_RADIUS: f64 = 50.0;

/// Default presentation size.
pub const DEFAULT_SIZE: u32 = 40;

/// Speed floor a flocker never drops below.
pub const MIN_SPEED: f64 = 3.0;

/// Closest a flocker lets a neighbor get before it stops translating.
pub const MIN_SEPARATION: f64 = 10.0;

/// Parameters of the flocking policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlockingParams {
    /// Speed floor applied after averaging (default: 3).
    pub min_speed: f64,

    /// Minimum neighbor distance required to move this tick (default: 10).
    pub min_separation: f64,

    /// How headings are averaged (default: arithmetic).
    pub heading_mean: HeadingMean,
}

impl Default for FlockingParams {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            min_separation: MIN_SEPARATION,
            heading_mean: HeadingMean::Arithmetic,
        }
    }
}

impl FlockingParams {
    /// Build flocking parameters, rejecting negative or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidFlocking`] if either threshold is
    /// negative, NaN, or infinite.
    pub fn new(
        min_speed: f64,
        min_separation: f64,
        heading_mean: HeadingMean,
    ) -> Result<Self, AgentError> {
        if !min_speed.is_finite() || min_speed < 0.0 {
            return Err(AgentError::InvalidFlocking {
                reason: format!("min_speed must be finite and >= 0, got {min_speed}"),
            });
        }
        if !min_separation.is_finite() || min_separation < 0.0 {
            return Err(AgentError::InvalidFlocking {
                reason: format!("min_separation must be finite and >= 0, got {min_separation}"),
            });
        }
        Ok(Self {
            min_speed,
            min_separation,
            heading_mean,
        })
    }
}

//! Error types for the creatures-agents crate.
//!
//! Agents only fail at construction time. Once built, `act` and the
//! visibility test are total: geometric degeneracies are handled in place.

/// Errors that can occur while constructing an agent or its policy.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Speed was negative, NaN, or infinite.
    #[error("invalid speed {speed}: must be finite and >= 0")]
    InvalidSpeed {
        /// The rejected speed.
        speed: f64,
    },

    /// Field of view was outside `(0, 2π]` or not finite.
    #[error("invalid field of view {field_of_view}: must lie in (0, 2π]")]
    InvalidFieldOfView {
        /// The rejected field of view, in radians.
        field_of_view: f64,
    },

    /// Vision radius was negative, NaN, or infinite.
    #[error("invalid vision radius {vision_radius}: must be finite and >= 0")]
    InvalidVisionRadius {
        /// The rejected radius.
        vision_radius: f64,
    },

    /// Heading was NaN or infinite.
    #[error("invalid heading {heading}: must be finite")]
    InvalidHeading {
        /// The rejected heading.
        heading: f64,
    },

    /// Position had a NaN or infinite coordinate.
    #[error("invalid position ({x}, {y}): coordinates must be finite")]
    InvalidPosition {
        /// Rejected horizontal coordinate.
        x: f64,
        /// Rejected vertical coordinate.
        y: f64,
    },

    /// Flocking parameters failed validation.
    #[error("invalid flocking parameters: {reason}")]
    InvalidFlocking {
        /// Description of the rejected parameter.
        reason: String,
    },
}

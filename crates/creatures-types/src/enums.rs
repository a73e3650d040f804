//! Enumeration types shared across the Creatures workspace.
//!
//! Both enums serialize as `snake_case` strings so they can be written
//! directly in `creatures-config.yaml`.

use serde::{Deserialize, Serialize};

/// Which motion policy an agent runs each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Moves straight along its heading, ignores neighbors.
    Wanderer,
    /// Aligns heading and speed with visible neighbors.
    #[default]
    Flocker,
}

impl core::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Wanderer => f.write_str("wanderer"),
            Self::Flocker => f.write_str("flocker"),
        }
    }
}

/// How a flocker aggregates its own heading with its neighbors' headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMean {
    /// Plain arithmetic mean of the raw heading values.
    ///
    /// Discontinuous across the `0 / 2π` seam: `0.1` and `6.2` average to
    /// roughly `3.15`, pointing the opposite way.
    #[default]
    Arithmetic,
    /// Mean of the unit heading vectors (`atan2` of summed sines and cosines).
    Circular,
}

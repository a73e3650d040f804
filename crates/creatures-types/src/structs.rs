//! Core data structs: arena points, colors, and the agent record.
//!
//! Coordinates follow screen conventions with the origin at the arena
//! center: `x` grows to the right, `y` grows downward. A heading of `0`
//! points along `+x` and a heading of `π/2` points up the screen (`-y`).

use serde::{Deserialize, Serialize};

use crate::enums::PolicyKind;
use crate::ids::AgentId;

/// A point in the continuous 2D arena plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

impl Point {
    /// The arena center.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `(dx, dy)`.
    pub const fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether both coordinates are finite numbers.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An RGB color with components in `[0, 1]`.
///
/// Opaque to the motion kernel; carried through to whoever draws agents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

impl Rgb {
    /// Create a color from its components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to 8-bit channels, clamping out-of-range components.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb8(self) -> [u8; 3] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

/// Structured, field-by-field view of one agent.
///
/// This is what renderers draw from and what inspectors print. It is a
/// copy: holding a record never holds a reference into the live world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Identity of the agent.
    pub id: AgentId,
    /// Motion policy the agent runs.
    pub policy: PolicyKind,
    /// Current position.
    pub position: Point,
    /// Current heading in radians, `[0, 2π)`.
    pub heading: f64,
    /// Current speed in arena units per tick.
    pub speed: f64,
    /// Full width of the view cone in radians.
    pub field_of_view: f64,
    /// Maximum perception distance.
    pub vision_radius: f64,
    /// Presentation color.
    pub color: Rgb,
    /// Presentation size in arena units.
    pub size: u32,
}

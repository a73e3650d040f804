//! Shared type definitions for the Creatures simulation.
//!
//! Plain data shared by the motion kernel, the world, and anything that
//! observes a running simulation (renderers, inspectors, log sinks).
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for agent identity
//! - [`enums`] -- Policy and heading-aggregation selectors
//! - [`structs`] -- Points, colors, and the structured agent record

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{HeadingMean, PolicyKind};
pub use ids::AgentId;
pub use structs::{AgentRecord, Point, Rgb};

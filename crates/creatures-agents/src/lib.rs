//! Agent state, geometry, and motion policies for the Creatures simulation.
//!
//! This crate is the perception-and-motion kernel. It knows nothing about
//! threads or schedules: the world hands each agent the neighbors it can
//! see, the agent decides where to go, and the world's [`Arena`] keeps the
//! result inside the bounds.
//!
//! # Modules
//!
//! - [`geometry`] -- Bearings, distances, and angle normalization.
//! - [`agent`] -- The [`Agent`] state model, visibility test, and builder.
//! - [`policy`] -- The closed set of motion policies and their `act` step.
//! - [`config`] -- Default perception and flocking parameters.
//! - [`error`] -- Construction errors.
//!
//! [`Arena`]: agent::Arena
//! [`Agent`]: agent::Agent

pub mod agent;
pub mod config;
pub mod error;
pub mod geometry;
pub mod policy;

pub use agent::{Agent, AgentBuilder, Arena, Motion, Perceived};
pub use config::FlockingParams;
pub use error::AgentError;
pub use policy::Policy;

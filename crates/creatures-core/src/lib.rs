//! World, tick cycle, and simulation driver for the Creatures simulation.
//!
//! This crate owns the authoritative agent collection and the loop that
//! advances it. One driver task mutates the world; any number of observers
//! read it, pause it, or swap the whole population through a shared
//! [`SimulationHandle`].
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `creatures-config.yaml` into
//!   strongly-typed structs.
//! - [`world`] -- Arena bounds, the agent collection, and its queries.
//! - [`tick`] -- One sequential pass over every agent.
//! - [`operator`] -- The shared exclusive region plus pause/stop controls.
//! - [`runner`] -- The fixed-delay simulation loop.
//! - [`population`] -- The seam to whatever builds populations.
//!
//! [`SimulationHandle`]: operator::SimulationHandle

pub mod config;
pub mod operator;
pub mod population;
pub mod runner;
pub mod tick;
pub mod world;

//! The seam to whatever builds agent populations.
//!
//! The core never invents agents itself. A [`PopulationFactory`] produces
//! an initial collection for a given count and arena, and [`repopulate`]
//! uses one to swap the live population without restarting the driver.

use creatures_agents::{Agent, AgentError};
use tracing::info;

use crate::operator::SimulationHandle;
use crate::world::Bounds;

/// Errors that can occur while building a population.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// An agent could not be constructed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// The factory produced a different number of agents than requested.
    #[error("factory produced {produced} agents, expected {requested}")]
    CountMismatch {
        /// Number of agents asked for.
        requested: usize,
        /// Number of agents returned.
        produced: usize,
    },
}

/// Produces populations of agents.
///
/// Implementations choose positions inside `bounds`, headings in
/// `[0, 2π)`, speeds, and colors. The kernel treats all of those as
/// opaque input; it only requires exactly `count` agents back.
pub trait PopulationFactory: Send {
    /// Build `count` agents for an arena of the given bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError`] if any agent fails validation.
    fn populate(&mut self, count: usize, bounds: &Bounds) -> Result<Vec<Agent>, PopulationError>;
}

/// Build a fresh population with `factory` and swap it into the running
/// simulation in one atomic step.
///
/// Returns the size of the population that was replaced.
///
/// # Errors
///
/// Returns [`PopulationError`] if the factory fails or returns the wrong
/// number of agents. The live population is untouched in that case.
pub async fn repopulate(
    handle: &SimulationHandle,
    factory: &mut dyn PopulationFactory,
    count: usize,
) -> Result<usize, PopulationError> {
    let agents = factory.populate(count, handle.bounds())?;
    if agents.len() != count {
        return Err(PopulationError::CountMismatch {
            requested: count,
            produced: agents.len(),
        });
    }
    let previous = handle.replace_agents(agents).await;
    info!(previous, count, "Repopulated simulation");
    Ok(previous)
}

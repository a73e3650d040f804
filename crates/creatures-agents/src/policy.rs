//! Motion policies.
//!
//! A closed set of variants dispatched from [`Agent::act`]:
//!
//! - **Wanderer** -- moves straight along its heading, ignores neighbors.
//! - **Flocker** -- averages its speed and heading with the visible
//!   neighbors, keeps a minimum speed, and stops translating (but still
//!   turns) while any neighbor is closer than the separation threshold.
//!
//! [`Agent::act`]: crate::agent::Agent::act

use core::iter;

use creatures_types::{HeadingMean, PolicyKind};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Arena, Motion, Perceived};
use crate::config::FlockingParams;
use crate::geometry;

/// The motion policy an agent runs each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Policy {
    /// Straight-line motion.
    Wanderer,
    /// Local alignment with visible neighbors.
    Flocker(FlockingParams),
}

impl Policy {
    /// The selector for this policy, without its parameters.
    pub const fn kind(&self) -> PolicyKind {
        match self {
            Self::Wanderer => PolicyKind::Wanderer,
            Self::Flocker(_) => PolicyKind::Flocker,
        }
    }

    /// Build the policy for `kind`, using `flocking` when it is a flocker.
    pub const fn from_kind(kind: PolicyKind, flocking: FlockingParams) -> Self {
        match kind {
            PolicyKind::Wanderer => Self::Wanderer,
            PolicyKind::Flocker => Self::Flocker(flocking),
        }
    }
}

pub(crate) fn wander<A>(agent: &mut Agent, arena: &A) -> Motion
where
    A: Arena + ?Sized,
{
    agent.advance(arena);
    Motion::Moved
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn flock<A>(
    agent: &mut Agent,
    params: &FlockingParams,
    neighbors: &[Perceived],
    arena: &A,
) -> Motion
where
    A: Arena + ?Sized,
{
    // the agent counts itself in every average
    let group = neighbors.len().saturating_add(1) as f64;

    let speed_sum: f64 = neighbors.iter().map(|n| n.speed).sum();
    let mut avg_speed = (agent.speed + speed_sum) / group;
    if avg_speed < params.min_speed {
        avg_speed = params.min_speed;
    }

    let avg_heading = match params.heading_mean {
        HeadingMean::Arithmetic => {
            let heading_sum: f64 = neighbors.iter().map(|n| n.heading).sum();
            (agent.heading + heading_sum) / group
        }
        HeadingMean::Circular => geometry::circular_mean(
            iter::once(agent.heading).chain(neighbors.iter().map(|n| n.heading)),
        )
        .unwrap_or(agent.heading),
    };

    agent.speed = avg_speed;
    agent.heading = geometry::normalize_angle(avg_heading);

    let min_dist = neighbors
        .iter()
        .map(|n| geometry::distance(n.position, agent.position))
        .fold(f64::INFINITY, f64::min);

    if min_dist > params.min_separation {
        agent.advance(arena);
        Motion::Moved
    } else {
        Motion::Held
    }
}

//! The arena and the authoritative agent collection.
//!
//! The arena is `width × height`, centered on the origin. Any position an
//! agent writes is passed through [`Bounds::wrap`]: leaving one edge puts
//! the agent back in through the opposite edge.
//!
//! # Invariants
//!
//! - Every agent's position lies in `[-w/2, w/2] × [-h/2, h/2]` after any
//!   mutation, including initial placement and wholesale replacement.
//! - An agent is never its own neighbor.

use creatures_agents::{Agent, AgentError, Arena, Perceived};
use creatures_types::{AgentId, AgentRecord, Point};
use tracing::debug;

use creatures_agents::geometry;

/// Errors that can occur while constructing a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Width or height was zero, negative, or not finite.
    #[error("invalid arena bounds {width} x {height}: both must be finite and > 0")]
    InvalidBounds {
        /// The rejected width.
        width: f64,
        /// The rejected height.
        height: f64,
    },

    /// An agent could not be constructed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

/// Size of the arena, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    width: f64,
    height: f64,
}

impl Bounds {
    /// Create arena bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBounds`] unless both dimensions are
    /// finite and strictly positive.
    pub fn new(width: f64, height: f64) -> Result<Self, WorldError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(WorldError::InvalidBounds { width, height });
        }
        Ok(Self { width, height })
    }

    /// Arena width.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Arena height.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Whether `p` lies inside the arena, edges included.
    pub fn contains(&self, p: Point) -> bool {
        p.x.abs() <= self.width / 2.0 && p.y.abs() <= self.height / 2.0
    }

    /// Map a position into the arena.
    ///
    /// Per axis, a coordinate past `+size/2` re-enters from `-size/2`
    /// carrying its overshoot (`size/2 + δ` becomes `-size/2 + δ`), and
    /// symmetrically for the lower edge. The result is clamped afterwards,
    /// so even an overshoot of more than one arena lands inside.
    pub fn wrap(&self, p: Point) -> Point {
        Point::new(wrap_axis(p.x, self.width), wrap_axis(p.y, self.height))
    }
}

impl Arena for Bounds {
    fn wrap(&self, position: Point) -> Point {
        Self::wrap(self, position)
    }
}

fn wrap_axis(v: f64, size: f64) -> f64 {
    let half = size / 2.0;
    let wrapped = if v > half {
        v - size
    } else if v < -half {
        v + size
    } else {
        v
    };
    wrapped.clamp(-half, half)
}

/// Agents in `agents` that `observer` can see, in processing order.
/// Never yields `observer` itself.
pub(crate) fn visible_to<'a>(
    agents: &'a [Agent],
    observer: &'a Agent,
) -> impl Iterator<Item = &'a Agent> + 'a {
    agents
        .iter()
        .filter(move |candidate| candidate.is_visible_to(observer))
}

/// The arena plus every live agent, in processing order.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) bounds: Bounds,
    pub(crate) agents: Vec<Agent>,
    /// Reused neighbor buffer for the tick pass.
    pub(crate) scratch: Vec<Perceived>,
}

impl World {
    /// Create a world with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBounds`] if the dimensions are invalid.
    pub fn new(width: f64, height: f64, agents: Vec<Agent>) -> Result<Self, WorldError> {
        Ok(Self::with_bounds(Bounds::new(width, height)?, agents))
    }

    /// Create a world from validated bounds. Every agent is placed through
    /// [`Bounds::wrap`].
    pub fn with_bounds(bounds: Bounds, mut agents: Vec<Agent>) -> Self {
        for agent in &mut agents {
            agent.place_in(&bounds);
        }
        Self {
            bounds,
            agents,
            scratch: Vec::new(),
        }
    }

    /// Arena bounds.
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// All agents, in processing order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the world has no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Look up an agent by identity.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    /// Structured records of every agent, in processing order.
    pub fn records(&self) -> Vec<AgentRecord> {
        self.agents.iter().map(Agent::record).collect()
    }

    /// Map a position into the arena (see [`Bounds::wrap`]).
    pub fn wrap_position(&self, p: Point) -> Point {
        self.bounds.wrap(p)
    }

    /// Every other agent inside `observer`'s view cone and vision radius.
    pub fn neighbors_of<'a>(&'a self, observer: &'a Agent) -> Vec<&'a Agent> {
        visible_to(&self.agents, observer).collect()
    }

    /// Every agent within `radius` of `point`, ignoring view cones.
    pub fn agents_near(&self, point: Point, radius: f64) -> Vec<&Agent> {
        self.agents
            .iter()
            .filter(|a| geometry::distance(a.position(), point) <= radius)
            .collect()
    }

    /// Swap in a whole new population, returning the previous one.
    ///
    /// New agents are placed through [`Bounds::wrap`] before they become
    /// visible.
    pub fn replace_agents(&mut self, mut agents: Vec<Agent>) -> Vec<Agent> {
        for agent in &mut agents {
            agent.place_in(&self.bounds);
        }
        debug!(
            previous = self.agents.len(),
            replacement = agents.len(),
            "Agent collection replaced"
        );
        std::mem::replace(&mut self.agents, agents)
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use creatures_agents::Policy;

    use super::*;

    fn wanderer(x: f64, y: f64, heading: f64) -> Result<Agent, AgentError> {
        Agent::builder(Policy::Wanderer)
            .position(Point::new(x, y))
            .heading(heading)
            .build()
    }

    fn world(agents: Vec<Agent>) -> Result<World, WorldError> {
        World::new(640.0, 480.0, agents)
    }

    #[test]
    fn invalid_bounds_rejected() {
        assert!(Bounds::new(0.0, 10.0).is_err());
        assert!(Bounds::new(10.0, -1.0).is_err());
        assert!(Bounds::new(f64::NAN, 10.0).is_err());
        assert!(Bounds::new(f64::INFINITY, 10.0).is_err());
        assert!(Bounds::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn wrap_carries_overshoot_to_opposite_edge() {
        let bounds = Bounds::new(640.0, 480.0);
        assert!(bounds.is_ok());
        if let Ok(bounds) = bounds {
            let p = bounds.wrap(Point::new(320.0 + 3.0, -240.0 - 2.0));
            assert!((p.x - (-320.0 + 3.0)).abs() < 1e-9);
            assert!((p.y - (240.0 - 2.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn wrap_keeps_edges_and_interior() {
        let bounds = Bounds::new(100.0, 100.0);
        assert!(bounds.is_ok_and(|b| {
            b.wrap(Point::new(50.0, -50.0)) == Point::new(50.0, -50.0)
                && b.wrap(Point::new(1.0, 2.0)) == Point::new(1.0, 2.0)
        }));
    }

    #[test]
    fn wrap_clamps_huge_overshoot() {
        let bounds = Bounds::new(100.0, 100.0);
        assert!(bounds.is_ok_and(|b| {
            let p = b.wrap(Point::new(1_000.0, -1_000.0));
            b.contains(p)
        }));
    }

    #[test]
    fn world_wraps_positions_with_its_bounds() {
        let w = world(Vec::new());
        assert!(w.is_ok_and(|w| {
            let p = w.wrap_position(Point::new(-320.0 - 5.0, 100.0));
            (p.x - (320.0 - 5.0)).abs() < 1e-9 && (p.y - 100.0).abs() < 1e-9
        }));
    }

    #[test]
    fn construction_places_agents_inside() {
        let agent = wanderer(400.0, 0.0, 0.0);
        assert!(agent.is_ok());
        if let Ok(agent) = agent {
            let w = world(vec![agent]);
            assert!(w.is_ok_and(|w| {
                w.agents()
                    .iter()
                    .all(|a| w.bounds().contains(a.position()))
            }));
        }
    }

    #[test]
    fn neighbors_exclude_self_and_respect_cone() {
        let observer = wanderer(0.0, 0.0, 0.0);
        let ahead = wanderer(20.0, 0.0, PI);
        let behind = wanderer(-20.0, 0.0, 0.0);
        let far = wanderer(200.0, 0.0, 0.0);
        let all = [observer, ahead, behind, far];
        assert!(all.iter().all(Result::is_ok));
        let agents: Vec<Agent> = all.into_iter().filter_map(Result::ok).collect();
        let ahead_id = agents.get(1).map(Agent::id);

        let w = world(agents);
        assert!(w.is_ok());
        if let Ok(w) = w {
            let observer = w.agents().first();
            assert!(observer.is_some());
            if let Some(observer) = observer {
                let seen: Vec<AgentId> = w.neighbors_of(observer).iter().map(|a| a.id()).collect();
                assert_eq!(seen.len(), 1);
                assert_eq!(seen.first().copied(), ahead_id);
            }
        }
    }

    #[test]
    fn view_cone_is_mirrored_vertically() {
        // facing up the screen (π/2), the cone opens toward +y
        let observer = wanderer(0.0, 0.0, FRAC_PI_2);
        let up_screen = wanderer(0.0, -20.0, 0.0);
        let down_screen = wanderer(0.0, 20.0, 0.0);
        let all = [observer, up_screen, down_screen];
        assert!(all.iter().all(Result::is_ok));
        let agents: Vec<Agent> = all.into_iter().filter_map(Result::ok).collect();
        let down_id = agents.get(2).map(Agent::id);

        let w = world(agents);
        assert!(w.is_ok());
        if let Ok(w) = w {
            if let Some(observer) = w.agents().first() {
                let seen: Vec<AgentId> = w.neighbors_of(observer).iter().map(|a| a.id()).collect();
                assert_eq!(seen.first().copied(), down_id);
                assert_eq!(seen.len(), 1);
            }
        }
    }

    #[test]
    fn agents_near_ignores_heading() {
        let a = wanderer(0.0, 0.0, 0.0);
        let b = wanderer(-15.0, 0.0, 0.0);
        let c = wanderer(100.0, 100.0, 0.0);
        let all = [a, b, c];
        assert!(all.iter().all(Result::is_ok));
        let w = world(all.into_iter().filter_map(Result::ok).collect());
        assert!(w.is_ok_and(|w| w.agents_near(Point::new(-5.0, 0.0), 20.0).len() == 2));
    }

    #[test]
    fn replace_agents_swaps_and_wraps() {
        let old = wanderer(0.0, 0.0, 0.0);
        let new = wanderer(330.0, 0.0, 0.0);
        assert!(old.is_ok() && new.is_ok());
        if let (Ok(old), Ok(new)) = (old, new) {
            let old_id = old.id();
            let new_id = new.id();
            let w = world(vec![old]);
            assert!(w.is_ok());
            if let Ok(mut w) = w {
                let previous = w.replace_agents(vec![new]);
                assert_eq!(previous.first().map(Agent::id), Some(old_id));
                assert_eq!(w.len(), 1);
                assert!(w.get(new_id).is_some());
                assert!(w.get(old_id).is_none());
                assert!(w.records().iter().all(|r| w.bounds().contains(r.position)));
            }
        }
    }
}

//! The per-agent state model.
//!
//! An [`Agent`] owns its kinematic state and is mutated only through
//! [`Agent::act`], once per tick, by whoever drives the simulation. Other
//! code reads it through accessors or copies it out as a [`Perceived`]
//! neighbor view or an [`AgentRecord`].

use core::f64::consts::TAU;

use creatures_types::{AgentId, AgentRecord, Point, Rgb};

use crate::config::{DEFAULT_FIELD_OF_VIEW, DEFAULT_SIZE, DEFAULT_VISION_RADIUS};
use crate::error::AgentError;
use crate::geometry;
use crate::policy::{self, Policy};

/// The world as an agent sees it while acting: something that keeps
/// positions inside the arena.
pub trait Arena {
    /// Map a freshly computed position back into the arena.
    fn wrap(&self, position: Point) -> Point;
}

/// What an agent learns about one visible neighbor.
///
/// A copy taken right before the observer acts, so neighbors processed
/// earlier in the same tick show their already-updated state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perceived {
    /// Neighbor position.
    pub position: Point,
    /// Neighbor heading, `[0, 2π)`.
    pub heading: f64,
    /// Neighbor speed.
    pub speed: f64,
}

/// Outcome of one `act` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// The agent translated this tick.
    Moved,
    /// The agent held its position (a neighbor was too close).
    Held,
}

/// An autonomous agent with a position, heading, speed, and motion policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) policy: Policy,
    pub(crate) position: Point,
    pub(crate) heading: f64,
    pub(crate) speed: f64,
    pub(crate) field_of_view: f64,
    pub(crate) vision_radius: f64,
    pub(crate) color: Rgb,
    pub(crate) size: u32,
}

impl Agent {
    /// Start building an agent that runs the given policy.
    pub const fn builder(policy: Policy) -> AgentBuilder {
        AgentBuilder::new(policy)
    }

    /// Advance this agent by one tick.
    ///
    /// `neighbors` are the agents currently visible to this one (never
    /// including itself). The only side effect is on this agent's own
    /// position, heading, and speed.
    pub fn act<A>(&mut self, neighbors: &[Perceived], arena: &A) -> Motion
    where
        A: Arena + ?Sized,
    {
        match self.policy {
            Policy::Wanderer => policy::wander(self, arena),
            Policy::Flocker(params) => policy::flock(self, &params, neighbors, arena),
        }
    }

    /// Whether this agent lies inside the observer's view cone and range.
    ///
    /// The bearing is taken from the observer's position toward this agent,
    /// relative to the observer's heading. The range test is inclusive, the
    /// cone test is strict.
    pub fn is_visible(
        &self,
        observer_position: Point,
        observer_heading: f64,
        observer_fov: f64,
        observer_vision_radius: f64,
    ) -> bool {
        if geometry::distance(self.position, observer_position) > observer_vision_radius {
            return false;
        }
        let bearing = geometry::bearing_to(observer_position, observer_heading, self.position);
        bearing.abs() < observer_fov / 2.0
    }

    /// Whether `observer` can see this agent, using the observer's own
    /// field of view and vision radius.
    pub fn is_visible_to(&self, observer: &Self) -> bool {
        self.id != observer.id
            && self.is_visible(
                observer.position,
                observer.heading,
                observer.field_of_view,
                observer.vision_radius,
            )
    }

    /// Copy out the part of this agent a neighbor can perceive.
    pub const fn perceived(&self) -> Perceived {
        Perceived {
            position: self.position,
            heading: self.heading,
            speed: self.speed,
        }
    }

    /// Structured field-by-field record of this agent.
    pub const fn record(&self) -> AgentRecord {
        AgentRecord {
            id: self.id,
            policy: self.policy.kind(),
            position: self.position,
            heading: self.heading,
            speed: self.speed,
            field_of_view: self.field_of_view,
            vision_radius: self.vision_radius,
            color: self.color,
            size: self.size,
        }
    }

    /// Identity of this agent.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Motion policy this agent runs.
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Current position.
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Current heading, `[0, 2π)`.
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Current speed.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Full width of the view cone, in radians.
    pub const fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    /// Maximum perception distance.
    pub const fn vision_radius(&self) -> f64 {
        self.vision_radius
    }

    /// Presentation color.
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Presentation size.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Re-place this agent through the arena, e.g. when it joins a world.
    pub fn place_in<A>(&mut self, arena: &A)
    where
        A: Arena + ?Sized,
    {
        self.position = arena.wrap(self.position);
    }

    /// Move one step along the current heading, then wrap.
    pub(crate) fn advance<A>(&mut self, arena: &A)
    where
        A: Arena + ?Sized,
    {
        let dx = self.speed * self.heading.cos();
        let dy = -self.speed * self.heading.sin();
        self.position = arena.wrap(self.position.offset(dx, dy));
    }
}

/// Validating builder for [`Agent`].
///
/// Unset fields fall back to the simulator defaults: origin, heading `0`,
/// speed `0`, black, field of view `π/4`, vision radius `50`, size `40`.
#[derive(Debug, Clone)]
pub struct AgentBuilder {
    id: Option<AgentId>,
    policy: Policy,
    position: Point,
    heading: f64,
    speed: f64,
    field_of_view: f64,
    vision_radius: f64,
    color: Rgb,
    size: u32,
}

impl AgentBuilder {
    /// Create a builder for the given policy with default parameters.
    pub const fn new(policy: Policy) -> Self {
        Self {
            id: None,
            policy,
            position: Point::ORIGIN,
            heading: 0.0,
            speed: 0.0,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            vision_radius: DEFAULT_VISION_RADIUS,
            color: Rgb::new(0.0, 0.0, 0.0),
            size: DEFAULT_SIZE,
        }
    }

    /// Use a specific identity instead of a fresh one.
    #[must_use]
    pub const fn id(mut self, id: AgentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Initial position.
    #[must_use]
    pub const fn position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Initial heading in radians; normalized on build.
    #[must_use]
    pub const fn heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    /// Initial speed.
    #[must_use]
    pub const fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Full width of the view cone in radians.
    #[must_use]
    pub const fn field_of_view(mut self, field_of_view: f64) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    /// Maximum perception distance.
    #[must_use]
    pub const fn vision_radius(mut self, vision_radius: f64) -> Self {
        self.vision_radius = vision_radius;
        self
    }

    /// Presentation color.
    #[must_use]
    pub const fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Presentation size.
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Validate and build the agent.
    ///
    /// # Errors
    ///
    /// Returns an [`AgentError`] describing the first invalid field.
    pub fn build(self) -> Result<Agent, AgentError> {
        if !self.position.is_finite() {
            return Err(AgentError::InvalidPosition {
                x: self.position.x,
                y: self.position.y,
            });
        }
        if !self.heading.is_finite() {
            return Err(AgentError::InvalidHeading {
                heading: self.heading,
            });
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(AgentError::InvalidSpeed { speed: self.speed });
        }
        if !self.field_of_view.is_finite()
            || self.field_of_view <= 0.0
            || self.field_of_view > TAU
        {
            return Err(AgentError::InvalidFieldOfView {
                field_of_view: self.field_of_view,
            });
        }
        if !self.vision_radius.is_finite() || self.vision_radius < 0.0 {
            return Err(AgentError::InvalidVisionRadius {
                vision_radius: self.vision_radius,
            });
        }

        Ok(Agent {
            id: self.id.unwrap_or_default(),
            policy: self.policy,
            position: self.position,
            heading: geometry::normalize_angle(self.heading),
            speed: self.speed,
            field_of_view: self.field_of_view,
            vision_radius: self.vision_radius,
            color: self.color,
            size: self.size,
        })
    }
}

//! Random population builder.
//!
//! Positions are uniform over the arena, headings uniform in `[0, 2π)`,
//! and initial speeds a whole number in `[0, max_speed)`. Colors walk the
//! RGB cube in steps of `1 / cbrt(count)` so every agent in a population
//! gets a distinct shade: red advances every agent and carries into green,
//! green carries into blue, each wrapping once it passes 1.

use core::f64::consts::TAU;

use creatures_agents::{Agent, FlockingParams, Policy};
use creatures_core::config::SimulationConfig;
use creatures_core::population::{PopulationError, PopulationFactory};
use creatures_core::world::Bounds;
use creatures_types::{PolicyKind, Point, Rgb};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Everything the spawner needs to build agents, taken from
/// [`SimulationConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerConfig {
    /// Policy every agent starts with.
    pub policy: PolicyKind,
    /// Flocking tunables, used when `policy` is `flocker`.
    pub flocking: FlockingParams,
    /// Exclusive upper bound of the initial speed.
    pub max_speed: f64,
    /// Full view-cone width in radians.
    pub field_of_view: f64,
    /// Maximum perception distance.
    pub vision_radius: f64,
    /// Presentation size.
    pub size: u32,
}

impl SpawnerConfig {
    /// Collect spawner settings from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::Agent`] if the flocking section is out of
    /// range.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, PopulationError> {
        Ok(Self {
            policy: config.population.policy,
            flocking: config.flocking_params()?,
            max_speed: config.population.max_speed,
            field_of_view: config.perception.field_of_view,
            vision_radius: config.perception.vision_radius,
            size: config.perception.size,
        })
    }
}

// -----------------------------------------------------------------------
// Color cube walk
// -----------------------------------------------------------------------

/// Steps through the RGB cube one shade per agent.
#[derive(Debug, Clone, Copy)]
struct ColorWalk {
    step: f32,
    r: f32,
    g: f32,
    b: f32,
}

impl ColorWalk {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn new(count: usize) -> Self {
        let cube_root = (count.max(1) as f64).cbrt();
        Self {
            step: (1.0 / cube_root) as f32,
            r: 0.0,
            g: 0.0,
            b: 0.0,
        }
    }

    fn next_shade(&mut self) -> Rgb {
        self.r += self.step;
        if self.r > 1.0 {
            self.r -= 1.0;
            self.g += self.step;
            if self.g > 1.0 {
                self.g -= 1.0;
                self.b += self.step;
                if self.b > 1.0 {
                    self.b -= 1.0;
                }
            }
        }
        Rgb::new(self.r, self.g, self.b)
    }
}

// -----------------------------------------------------------------------
// Population factory
// -----------------------------------------------------------------------

/// [`PopulationFactory`] that scatters agents uniformly over the arena.
#[derive(Debug)]
pub struct ColorCubePopulation {
    config: SpawnerConfig,
    rng: SmallRng,
}

impl ColorCubePopulation {
    /// Create a builder. With a seed every population it builds is
    /// reproducible; without one it draws from the thread RNG.
    pub fn new(config: SpawnerConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self { config, rng }
    }

    fn random_agent(&mut self, bounds: &Bounds, color: Rgb) -> Result<Agent, PopulationError> {
        let x = self.rng.random::<f64>().mul_add(bounds.width(), -bounds.width() / 2.0);
        let y = self.rng.random::<f64>().mul_add(bounds.height(), -bounds.height() / 2.0);
        let heading = self.rng.random::<f64>() * TAU;
        let speed = (self.rng.random::<f64>() * self.config.max_speed).floor();
        let policy = Policy::from_kind(self.config.policy, self.config.flocking);

        let agent = Agent::builder(policy)
            .position(Point::new(x, y))
            .heading(heading)
            .speed(speed)
            .field_of_view(self.config.field_of_view)
            .vision_radius(self.config.vision_radius)
            .color(color)
            .size(self.config.size)
            .build()?;
        Ok(agent)
    }
}

impl PopulationFactory for ColorCubePopulation {
    fn populate(&mut self, count: usize, bounds: &Bounds) -> Result<Vec<Agent>, PopulationError> {
        let mut colors = ColorWalk::new(count);
        let mut agents = Vec::with_capacity(count);
        for _ in 0..count {
            let color = colors.next_shade();
            agents.push(self.random_agent(bounds, color)?);
        }
        info!(
            count,
            policy = %self.config.policy,
            "Population spawned"
        );
        Ok(agents)
    }
}

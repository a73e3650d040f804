//! One tick: a single sequential pass over every agent.
//!
//! For each agent, in collection order, the pass collects the neighbors it
//! can currently see and calls [`Agent::act`]. There is no snapshot
//! barrier: an agent processed later in the pass perceives the
//! already-updated state of agents processed earlier. Results therefore
//! depend on collection order, but are reproducible for a given order.
//!
//! [`Agent::act`]: creatures_agents::Agent::act

use creatures_agents::{Agent, Motion};
use tracing::debug;

use crate::world::{World, visible_to};

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed (first tick is 1).
    pub tick: u64,
    /// Number of agents processed.
    pub agents: usize,
    /// Agents that translated this tick.
    pub moved: usize,
    /// Agents that held position because a neighbor was too close.
    pub held: usize,
}

/// Run one pass over every agent in `world`, labelling it `tick`.
pub fn run_tick(world: &mut World, tick: u64) -> TickSummary {
    let mut perceived = std::mem::take(&mut world.scratch);
    let mut moved: usize = 0;
    let mut held: usize = 0;

    for index in 0..world.agents.len() {
        perceived.clear();
        if let Some(observer) = world.agents.get(index) {
            perceived.extend(visible_to(&world.agents, observer).map(Agent::perceived));
        }

        if let Some(agent) = world.agents.get_mut(index) {
            match agent.act(&perceived, &world.bounds) {
                Motion::Moved => moved = moved.saturating_add(1),
                Motion::Held => held = held.saturating_add(1),
            }
        }
    }

    perceived.clear();
    world.scratch = perceived;

    let summary = TickSummary {
        tick,
        agents: world.agents.len(),
        moved,
        held,
    };
    debug!(
        tick,
        agents = summary.agents,
        moved,
        held,
        "Tick completed"
    );
    summary
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use creatures_agents::config::MIN_SPEED;
    use creatures_agents::{AgentError, FlockingParams, Policy};
    use creatures_types::Point;

    use super::*;

    fn flocker(position: Point, heading: f64, speed: f64) -> Result<Agent, AgentError> {
        Agent::builder(Policy::Flocker(FlockingParams::default()))
            .position(position)
            .heading(heading)
            .speed(speed)
            .build()
    }

    fn world_of(agents: Vec<Result<Agent, AgentError>>) -> Option<World> {
        let agents: Result<Vec<Agent>, AgentError> = agents.into_iter().collect();
        World::new(640.0, 480.0, agents.ok()?).ok()
    }

    #[test]
    fn empty_world_ticks() {
        let w = World::new(10.0, 10.0, Vec::new());
        assert!(w.is_ok());
        if let Ok(mut w) = w {
            let summary = run_tick(&mut w, 1);
            assert_eq!(summary.agents, 0);
            assert_eq!(summary.moved, 0);
        }
    }

    #[test]
    fn stationary_flockers_reach_min_speed() {
        let w = world_of(vec![
            flocker(Point::new(-100.0, 0.0), 0.0, 0.0),
            flocker(Point::new(100.0, 50.0), 1.0, 0.0),
        ]);
        assert!(w.is_some());
        if let Some(mut w) = w {
            run_tick(&mut w, 1);
            for agent in w.agents() {
                assert!((agent.speed() - MIN_SPEED).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn crowded_flockers_hold_position() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(5.0, 0.0);
        let w = world_of(vec![flocker(a, 0.0, 4.0), flocker(b, PI, 4.0)]);
        assert!(w.is_some());
        if let Some(mut w) = w {
            let summary = run_tick(&mut w, 1);
            assert_eq!(summary.held, 2);
            let positions: Vec<Point> = w.agents().iter().map(Agent::position).collect();
            assert_eq!(positions, vec![a, b]);
        }
    }

    #[test]
    fn later_agents_see_earlier_updates() {
        // A sees B and turns toward the mean; B then sees A's new heading,
        // not the one A started the tick with.
        let w = world_of(vec![
            flocker(Point::new(0.0, 0.0), 0.0, 4.0),
            flocker(Point::new(5.0, 0.0), PI, 4.0),
        ]);
        assert!(w.is_some());
        if let Some(mut w) = w {
            run_tick(&mut w, 1);
            let headings: Vec<f64> = w.agents().iter().map(Agent::heading).collect();
            let first = headings.first().copied().unwrap_or(f64::NAN);
            let second = headings.get(1).copied().unwrap_or(f64::NAN);
            assert!((first - PI / 2.0).abs() < 1e-12);
            assert!((second - 3.0 * PI / 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ticks_keep_everyone_in_bounds() {
        let w = world_of(
            (0..12)
                .map(|i| {
                    let f = f64::from(i);
                    flocker(Point::new(f * 25.0 - 150.0, f * 17.0 - 100.0), f * 0.5, 9.0)
                })
                .collect(),
        );
        assert!(w.is_some());
        if let Some(mut w) = w {
            for tick in 1..=500 {
                run_tick(&mut w, tick);
                assert!(w.agents().iter().all(|a| w.bounds().contains(a.position())));
                assert!(
                    w.agents()
                        .iter()
                        .all(|a| (0.0..2.0 * PI).contains(&a.heading()))
                );
            }
        }
    }
}

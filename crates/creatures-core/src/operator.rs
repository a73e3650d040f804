//! Shared simulation state and operator controls.
//!
//! [`SimulationHandle`] is wrapped in [`Arc`](std::sync::Arc) and shared
//! between the driver task and any number of observers. It holds a single
//! exclusive region around the world, the pause flag, and the tick counter:
//!
//! - the driver holds it for a whole tick pass,
//! - [`replace_agents`](SimulationHandle::replace_agents),
//!   [`snapshot`](SimulationHandle::snapshot), and
//!   [`agents_near`](SimulationHandle::agents_near) take it too,
//!
//! so no reader can observe a half-finished pass or a half-swapped
//! population. Stop requests and the tick interval are plain atomics read
//! on the loop's hot path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use creatures_agents::Agent;
use creatures_types::{AgentId, AgentRecord, Point};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};
use tracing::info;

use crate::config::SimulationBoundsConfig;
use crate::tick::{self, TickSummary};
use crate::world::{Bounds, World};

/// Reason why the simulation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// Everything guarded by the exclusive region.
#[derive(Debug)]
struct SimulationCell {
    world: World,
    paused: bool,
    tick: u64,
}

/// Shared simulation state and operator controls.
#[derive(Debug)]
pub struct SimulationHandle {
    /// World, pause flag, and tick counter.
    cell: Mutex<SimulationCell>,

    /// Notification used to wake the driver when resumed or stopped.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Fixed delay between tick passes, in milliseconds.
    tick_interval_ms: AtomicU64,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Arena bounds; fixed for the lifetime of the world.
    bounds: Bounds,
}

impl SimulationHandle {
    /// Wrap a world for shared use. The simulation starts running.
    pub fn new(world: World, tick_interval_ms: u64, bounds_config: &SimulationBoundsConfig) -> Self {
        let bounds = *world.bounds();
        Self {
            cell: Mutex::new(SimulationCell {
                world,
                paused: false,
                tick: 0,
            }),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            max_ticks: bounds_config.max_ticks,
            bounds,
        }
    }

    // -----------------------------------------------------------------------
    // Ticking
    // -----------------------------------------------------------------------

    /// Run one tick pass inside the exclusive region.
    ///
    /// Returns `None` without touching the world when the simulation is
    /// paused; the paused flag is read under the same lock as the pass.
    /// `inspect` sees the world right after the pass, before any other
    /// caller can touch it; keep it short.
    pub async fn step<F>(&self, inspect: F) -> Option<TickSummary>
    where
        F: FnOnce(&TickSummary, &World),
    {
        let mut cell = self.cell.lock().await;
        if cell.paused {
            return None;
        }
        let next = cell.tick.saturating_add(1);
        let summary = tick::run_tick(&mut cell.world, next);
        cell.tick = next;
        inspect(&summary, &cell.world);
        Some(summary)
    }

    /// Number of completed ticks.
    pub async fn tick_count(&self) -> u64 {
        self.cell.lock().await.tick
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Flip between running and paused, returning the new paused state.
    ///
    /// Resuming wakes a driver blocked in
    /// [`wait_if_paused`](Self::wait_if_paused). Pausing never interrupts
    /// a tick already in progress; once this returns `true`, no further
    /// tick starts until the next resume.
    pub async fn toggle_pause(&self) -> bool {
        let paused = {
            let mut cell = self.cell.lock().await;
            cell.paused = !cell.paused;
            cell.paused
        };
        if paused {
            info!("Simulation pause requested");
        } else {
            info!("Simulation resume requested");
            self.resume_notify.notify_one();
        }
        paused
    }

    /// Check whether the simulation is paused.
    pub async fn is_paused(&self) -> bool {
        self.cell.lock().await.paused
    }

    /// Wait until the simulation is no longer paused or a stop is requested.
    ///
    /// Returns immediately if running.
    pub async fn wait_if_paused(&self) {
        while self.is_paused().await && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request that the driver loop end after the current tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Tick Timing
    // -----------------------------------------------------------------------

    /// Get the delay between tick passes in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the delay between tick passes, returning the previous value.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::AcqRel)
    }

    /// Get the configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Check whether the tick limit has been reached.
    ///
    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    // -----------------------------------------------------------------------
    // Observer queries
    // -----------------------------------------------------------------------

    /// Arena bounds of the shared world.
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Records of every agent, in processing order, from a single
    /// consistent view of the world.
    pub async fn snapshot(&self) -> Vec<AgentRecord> {
        self.cell.lock().await.world.records()
    }

    /// Records of every agent within `radius` of `point` (hit-testing).
    pub async fn agents_near(&self, point: Point, radius: f64) -> Vec<AgentRecord> {
        let cell = self.cell.lock().await;
        cell.world
            .agents_near(point, radius)
            .into_iter()
            .map(Agent::record)
            .collect()
    }

    /// Record of one agent and the records of the neighbors it sees now.
    pub async fn inspect(&self, id: AgentId) -> Option<(AgentRecord, Vec<AgentRecord>)> {
        let cell = self.cell.lock().await;
        let agent = cell.world.get(id)?;
        let neighbors = cell
            .world
            .neighbors_of(agent)
            .into_iter()
            .map(Agent::record)
            .collect();
        Some((agent.record(), neighbors))
    }

    /// Run a read-only closure against the world inside the exclusive
    /// region.
    pub async fn with_world<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&World) -> R,
    {
        let cell = self.cell.lock().await;
        f(&cell.world)
    }

    /// Atomically swap in a new population, returning how many agents the
    /// previous one had.
    ///
    /// Waits for any tick in progress to finish; the next tick runs
    /// entirely on the new agents.
    pub async fn replace_agents(&self, agents: Vec<Agent>) -> usize {
        let mut cell = self.cell.lock().await;
        let replacement = agents.len();
        let previous = cell.world.replace_agents(agents).len();
        info!(
            tick = cell.tick,
            previous,
            replacement, "Population replaced"
        );
        previous
    }
}

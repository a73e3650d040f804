//! Simulation loop runner with operator controls.
//!
//! [`run_simulation`] is the single driver of a shared world. Each
//! iteration:
//!
//! 1. blocks while paused,
//! 2. runs one tick pass inside the exclusive region,
//! 3. notifies the [`TickCallback`],
//! 4. blocks again if a pause arrived during the pass,
//! 5. sleeps the fixed tick interval (a fixed delay, not a fixed rate).
//!
//! A tick never starts while paused: the pause flag is checked at the top
//! of every iteration and again under the lock that runs the pass.
//!
//! The state machine is `Running ⇄ Paused`, starting in `Running`. The
//! loop only ends when an operator requests a stop or the configured tick
//! limit is reached.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::operator::{SimulationEndReason, SimulationHandle};
use crate::tick::TickSummary;
use crate::world::World;

/// Result of the simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed by this run.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// Runs inside the exclusive region, so `world` is exactly the state the
/// tick produced. Implementations must not block.
pub trait TickCallback: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, summary: &TickSummary, world: &World);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _world: &World) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// Meant to be the body of exactly one spawned task per handle; every
/// other holder of the handle only queries, pauses, replaces, or stops.
pub async fn run_simulation(
    handle: &Arc<SimulationHandle>,
    callback: &mut dyn TickCallback,
) -> SimulationResult {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = handle.max_ticks(),
        tick_interval_ms = handle.tick_interval_ms(),
        "Simulation starting"
    );

    loop {
        // --- Check stop request (before tick) ---
        if handle.is_stop_requested() {
            info!("Operator stop requested");
            return SimulationResult {
                end_reason: SimulationEndReason::OperatorStop,
                final_summary: last_summary,
                total_ticks,
            };
        }

        // --- Gate on pause (before tick) ---
        if handle.is_paused().await {
            wait_for_resume(handle).await;
            continue;
        }

        // --- Execute tick ---
        let Some(summary) = handle
            .step(|summary, world| callback.on_tick(summary, world))
            .await
        else {
            // paused between the gate and the lock
            continue;
        };
        total_ticks = total_ticks.saturating_add(1);

        // --- Check tick limit (after tick) ---
        if handle.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = handle.max_ticks(),
                "Tick limit reached"
            );
            return SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            };
        }

        last_summary = Some(summary);

        // --- Honor pause before sleeping ---
        if handle.is_paused().await {
            wait_for_resume(handle).await;
        }

        // --- Sleep for tick interval ---
        let interval_ms = handle.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

/// Block while paused, returning on resume or stop.
async fn wait_for_resume(handle: &SimulationHandle) {
    info!("Simulation paused, waiting for resume...");
    handle.wait_if_paused().await;
    if !handle.is_stop_requested() {
        info!("Simulation resumed");
    }
}

/// Log the outcome of a finished run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            agents = summary.agents,
            moved = summary.moved,
            held = summary.held,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

//! Tick callback that reports simulation progress through tracing.
//!
//! Every tick gets a `debug!` line. Every `report_interval_ticks` ticks the
//! callback also logs population-wide motion statistics and the full record
//! of one tracked agent, serialized as JSON, together with how many
//! neighbors it currently sees.

use creatures_agents::Agent;
use creatures_core::runner::TickCallback;
use creatures_core::tick::TickSummary;
use creatures_core::world::World;
use creatures_types::AgentId;
use tracing::{debug, info, warn};

/// Callback that turns tick results into log events.
pub struct LoggingCallback {
    report_interval_ticks: u64,
    tracked: Option<AgentId>,
}

impl LoggingCallback {
    /// Create a callback reporting every `report_interval_ticks` ticks
    /// (0 disables periodic reports).
    pub const fn new(report_interval_ticks: u64) -> Self {
        Self {
            report_interval_ticks,
            tracked: None,
        }
    }

    /// Whether `tick` is a reporting tick.
    const fn is_report_tick(&self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.report_interval_ticks), Some(0))
    }

    /// The agent to inspect: the tracked one while it is alive, otherwise
    /// the first agent in processing order.
    fn tracked_in(&mut self, world: &World) -> Option<AgentId> {
        let alive = self.tracked.filter(|id| world.get(*id).is_some());
        if alive.is_none() {
            self.tracked = world.agents().first().map(Agent::id);
        }
        self.tracked
    }

    fn report(&mut self, summary: &TickSummary, world: &World) {
        let speeds: Vec<f64> = world.agents().iter().map(Agent::speed).collect();
        let mean_speed = mean(&speeds);
        info!(
            tick = summary.tick,
            agents = summary.agents,
            moved = summary.moved,
            held = summary.held,
            mean_speed,
            "Simulation progress"
        );

        let Some(agent) = self.tracked_in(world).and_then(|id| world.get(id)) else {
            return;
        };
        let neighbors = world.neighbors_of(agent).len();
        match serde_json::to_string(&agent.record()) {
            Ok(record) => info!(tick = summary.tick, neighbors, record = %record, "Tracked agent"),
            Err(e) => warn!(error = %e, "failed to serialize agent record"),
        }
    }
}

impl TickCallback for LoggingCallback {
    fn on_tick(&mut self, summary: &TickSummary, world: &World) {
        debug!(
            tick = summary.tick,
            agents = summary.agents,
            moved = summary.moved,
            held = summary.held,
            "Tick reported"
        );
        if self.is_report_tick(summary.tick) {
            self.report(summary, world);
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

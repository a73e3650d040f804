//! Integration tests for the simulation driver.
//!
//! Each test runs the real `run_simulation` loop against a shared
//! `SimulationHandle`, either inline with a tick limit or as a spawned task
//! controlled from the test body the way an observer would.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use creatures_agents::{Agent, FlockingParams, Policy};
use creatures_core::config::SimulationBoundsConfig;
use creatures_core::operator::{SimulationEndReason, SimulationHandle};
use creatures_core::runner::{NoOpCallback, TickCallback, run_simulation};
use creatures_core::tick::TickSummary;
use creatures_core::world::World;
use creatures_types::{AgentId, Point};

fn bounds_config(max_ticks: u64) -> SimulationBoundsConfig {
    SimulationBoundsConfig {
        max_ticks,
        report_interval_ticks: 0,
    }
}

fn wanderers(n: u32, speed: f64) -> Vec<Agent> {
    (0..n)
        .map(|i| {
            let f = f64::from(i);
            Agent::builder(Policy::Wanderer)
                .position(Point::new(f * 7.0 - 100.0, f * 3.0 - 50.0))
                .heading(f * 0.4)
                .speed(speed)
                .build()
                .unwrap()
        })
        .collect()
}

fn flockers(n: u32) -> Vec<Agent> {
    (0..n)
        .map(|i| {
            let f = f64::from(i);
            Agent::builder(Policy::Flocker(FlockingParams::default()))
                .position(Point::new(f * 11.0 - 150.0, f * 9.0 - 120.0))
                .heading(f * 0.3)
                .speed(f % 10.0)
                .build()
                .unwrap()
        })
        .collect()
}

fn ids_of(agents: &[Agent]) -> BTreeSet<AgentId> {
    agents.iter().map(Agent::id).collect()
}

fn spawn_driver(
    handle: &Arc<SimulationHandle>,
) -> tokio::task::JoinHandle<creatures_core::runner::SimulationResult> {
    let driver = Arc::clone(handle);
    tokio::spawn(async move { run_simulation(&driver, &mut NoOpCallback).await })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pause_freezes_ticks_and_resume_continues() {
    let world = World::new(640.0, 480.0, wanderers(10, 2.0)).unwrap();
    let handle = Arc::new(SimulationHandle::new(world, 1, &bounds_config(0)));
    let driver = spawn_driver(&handle);

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(handle.tick_count().await > 0);

    assert!(handle.toggle_pause().await);
    let paused_at = handle.tick_count().await;
    let positions = handle.snapshot().await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(handle.tick_count().await, paused_at);
    assert_eq!(handle.snapshot().await, positions);

    assert!(!handle.toggle_pause().await);
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(handle.tick_count().await > paused_at);

    handle.request_stop();
    let result = driver.await.unwrap();
    assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn paused_before_spawn_never_ticks() {
    let world = World::new(640.0, 480.0, wanderers(5, 3.0)).unwrap();
    let handle = Arc::new(SimulationHandle::new(world, 1, &bounds_config(0)));
    let before = handle.snapshot().await;
    assert!(handle.toggle_pause().await);
    let driver = spawn_driver(&handle);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.tick_count().await, 0);
    assert_eq!(handle.snapshot().await, before);

    handle.request_stop();
    let result = driver.await.unwrap();
    assert_eq!(result.total_ticks, 0);
    assert!(result.final_summary.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pause_during_the_interval_blocks_the_next_tick() {
    let world = World::new(640.0, 480.0, wanderers(5, 3.0)).unwrap();
    let handle = Arc::new(SimulationHandle::new(world, 200, &bounds_config(0)));
    let driver = spawn_driver(&handle);

    // the first tick runs immediately, then the driver sleeps 200 ms
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.toggle_pause().await);
    let paused_at = handle.tick_count().await;
    assert_eq!(paused_at, 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(handle.tick_count().await, paused_at);

    handle.request_stop();
    let result = driver.await.unwrap();
    assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
    assert_eq!(result.total_ticks, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_while_paused_ends_the_run() {
    let world = World::new(640.0, 480.0, wanderers(3, 1.0)).unwrap();
    let handle = Arc::new(SimulationHandle::new(world, 1, &bounds_config(0)));
    let driver = spawn_driver(&handle);

    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.toggle_pause().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.request_stop();

    let result = tokio::time::timeout(Duration::from_secs(2), driver).await;
    assert!(result.is_ok(), "driver stayed blocked after stop");
    let result = result.unwrap().unwrap();
    assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn replacement_is_never_observed_half_done() {
    let first = wanderers(20, 1.5);
    let second = flockers(12);
    let first_ids = ids_of(&first);
    let second_ids = ids_of(&second);

    let world = World::new(640.0, 480.0, first.clone()).unwrap();
    let handle = Arc::new(SimulationHandle::new(world, 0, &bounds_config(0)));
    let driver = spawn_driver(&handle);

    for replacement in [&second, &first].into_iter().cycle().take(40) {
        handle.replace_agents(replacement.clone()).await;

        for _ in 0..3 {
            let seen: BTreeSet<AgentId> =
                handle.snapshot().await.iter().map(|r| r.id).collect();
            assert!(
                seen == first_ids || seen == second_ids,
                "snapshot mixed two populations"
            );
        }
        tokio::task::yield_now().await;
    }

    handle.request_stop();
    let result = driver.await.unwrap();
    assert!(result.total_ticks > 0);
}

#[tokio::test]
async fn every_tick_keeps_agents_inside_the_arena() {
    struct BoundsCheck {
        ticks: u64,
        violations: usize,
    }
    impl TickCallback for BoundsCheck {
        fn on_tick(&mut self, _summary: &TickSummary, world: &World) {
            let outside = world
                .agents()
                .iter()
                .filter(|a| !world.bounds().contains(a.position()))
                .count();
            self.ticks = self.ticks.saturating_add(1);
            self.violations = self.violations.saturating_add(outside);
        }
    }

    let mut agents = flockers(30);
    agents.extend(wanderers(10, 9.0));
    let world = World::new(200.0, 150.0, agents).unwrap();
    let handle = Arc::new(SimulationHandle::new(world, 0, &bounds_config(400)));

    let mut check = BoundsCheck {
        ticks: 0,
        violations: 0,
    };
    let result = run_simulation(&handle, &mut check).await;

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(check.ticks, 400);
    assert_eq!(check.violations, 0);
}

#[tokio::test]
async fn wanderers_follow_closed_form_through_the_driver() {
    let heading = 2.2;
    let speed = 4.0;
    let agent = Agent::builder(Policy::Wanderer)
        .heading(heading)
        .speed(speed)
        .build()
        .unwrap();
    let id = agent.id();
    let world = World::new(10_000.0, 10_000.0, vec![agent]).unwrap();
    let handle = Arc::new(SimulationHandle::new(world, 0, &bounds_config(25)));

    let result = run_simulation(&handle, &mut NoOpCallback).await;
    assert_eq!(result.total_ticks, 25);

    let (record, neighbors) = handle.inspect(id).await.unwrap();
    assert!(neighbors.is_empty());
    let k = 25.0;
    assert!((record.position.x - k * speed * heading.cos()).abs() < 1e-9);
    assert!((record.position.y + k * speed * heading.sin()).abs() < 1e-9);
    assert!((record.heading - heading).abs() < 1e-12);
}

#[tokio::test]
async fn flockers_never_drop_below_min_speed() {
    let world = World::new(640.0, 480.0, flockers(20)).unwrap();
    let handle = Arc::new(SimulationHandle::new(world, 0, &bounds_config(50)));

    run_simulation(&handle, &mut NoOpCallback).await;

    let records = handle.snapshot().await;
    assert_eq!(records.len(), 20);
    assert!(
        records
            .iter()
            .all(|r| r.speed >= creatures_agents::config::MIN_SPEED)
    );
}

//! Invariant Soak Tests
//!
//! Long seeded runs through the real random source. Every observed snapshot
//! must satisfy the queue invariants regardless of the draw sequence.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_test::assert_ok;
use waitroom_core::application::{QueueSimulator, SimulatorConfig};
use waitroom_core::domain::{QueueEvent, QueueState, StaffAction};
use waitroom_core::port::random_source::StdRandomSource;
use waitroom_core::port::time_provider::mocks::FixedTimeProvider;
use waitroom_core::port::TimeProvider;

fn seeded(seed: u64) -> (QueueSimulator, Arc<FixedTimeProvider>) {
    let clock = Arc::new(FixedTimeProvider::new(0));
    let time: Arc<dyn TimeProvider> = clock.clone();
    let sim = QueueSimulator::new(
        SimulatorConfig::default(),
        QueueState::initial(format!("P-soak-{}", seed), 0),
        time,
        Box::new(StdRandomSource::seeded(seed)),
    )
    .unwrap();
    (sim, clock)
}

fn assert_invariants(state: &QueueState) {
    assert!(state.position >= 1, "position {} below 1", state.position);
    assert!(
        state.estimated_wait_time >= 10,
        "wait {} below 10",
        state.estimated_wait_time
    );
    assert!(
        state.total_patients >= state.position,
        "total {} below position {}",
        state.total_patients,
        state.position
    );
    assert!(
        (30..=100).contains(&state.department_load),
        "load {} out of range",
        state.department_load
    );
}

#[test]
fn test_refresh_soak_keeps_invariants() {
    for seed in [1, 7, 42, 1_234, 99_999] {
        let (sim, clock) = seeded(seed);
        let mut last_updated = sim.snapshot().last_updated;

        for _ in 0..2_000 {
            clock.advance(1_000);
            sim.refresh();
            let state = sim.snapshot();
            assert_invariants(&state);
            assert!(state.last_updated > last_updated);
            last_updated = state.last_updated;
        }
    }
}

#[test]
fn test_mixed_soak_keeps_invariants() {
    let (sim, clock) = seeded(2024);
    let actions = [StaffAction::CallNext, StaffAction::Delay, StaffAction::Emergency];

    for step in 0..3_000usize {
        clock.advance(250);
        if step % 5 == 0 {
            sim.inject_action(actions[step / 5 % actions.len()]);
        } else {
            sim.refresh();
        }
        assert_invariants(&sim.snapshot());
    }
}

#[test]
fn test_approaching_turn_only_on_downward_crossing() {
    let (sim, _clock) = seeded(77);
    let mut events = sim.subscribe();
    let mut previous = sim.snapshot().position;

    for _ in 0..2_000 {
        sim.refresh();
        let current = sim.snapshot().position;

        while let Ok(event) = events.try_recv() {
            if let QueueEvent::ApproachingTurn { position, .. } = event {
                assert_eq!(position, current);
                assert!(previous > 3 && current <= 3);
            }
        }
        previous = current;
    }
}

#[tokio::test(start_paused = true)]
async fn test_periodic_soak_keeps_invariants() {
    let (sim, _clock) = seeded(5);
    let mut state = sim.watch_state();

    assert_ok!(sim.start());
    sleep(Duration::from_millis(2_000 + 200 * 15_000 + 100)).await;

    assert_eq!(sim.stats().periodic_ticks, 200);
    assert_invariants(&state.borrow_and_update());
}

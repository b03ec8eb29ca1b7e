//! Staff Action Integration Tests
//!
//! Deterministic updates injected by staff, with and without a live feed.

use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};
use waitroom_core::application::{QueueSimulator, SimulatorConfig};
use waitroom_core::domain::{
    ConnectionState, DomainError, QueueEvent, QueueState, StaffAction, UpdateKind, UpdateOrigin,
};
use waitroom_core::port::random_source::mocks::ScriptedRandomSource;
use waitroom_core::port::time_provider::mocks::FixedTimeProvider;
use waitroom_core::port::TimeProvider;
use waitroom_core::AppError;

fn simulator_with(state: QueueState) -> QueueSimulator {
    let time: Arc<dyn TimeProvider> = Arc::new(FixedTimeProvider::new(state.last_updated + 500));
    QueueSimulator::new(
        SimulatorConfig::default(),
        state,
        time,
        Box::new(ScriptedRandomSource::new(vec![0.5])),
    )
    .unwrap()
}

fn initial() -> QueueState {
    QueueState::initial("P-staff", 1_000)
}

#[test]
fn test_call_next_moves_up_one_place() {
    let sim = simulator_with(initial());
    let before = sim.snapshot();

    let update = sim.inject_action(StaffAction::CallNext);
    let after = sim.snapshot();

    assert_eq!(update.kind, UpdateKind::PositionChange);
    assert_eq!(update.origin, UpdateOrigin::StaffAction(StaffAction::CallNext));
    assert_eq!(after.position, 7);
    assert_eq!(after.estimated_wait_time, before.estimated_wait_time);
    assert_eq!(after.total_patients, before.total_patients);
    assert_eq!(after.department_load, before.department_load);
    assert_eq!(after.last_updated, 1_500);
}

#[test]
fn test_call_next_stops_at_front() {
    let mut state = initial();
    state.position = 1;
    let sim = simulator_with(state);

    sim.inject_action(StaffAction::CallNext);

    assert_eq!(sim.snapshot().position, 1);
}

#[test]
fn test_call_next_into_threshold_notifies_once() {
    let mut state = initial();
    state.position = 5;
    let sim = simulator_with(state);
    let mut events = sim.subscribe();

    sim.inject_action(StaffAction::CallNext);
    assert!(events.try_recv().is_err());

    sim.inject_action(StaffAction::CallNext);
    let event = events.try_recv().unwrap();
    assert!(matches!(
        event,
        QueueEvent::ApproachingTurn {
            position: 3,
            origin: UpdateOrigin::StaffAction(StaffAction::CallNext),
            ..
        }
    ));

    sim.inject_action(StaffAction::CallNext);
    assert!(events.try_recv().is_err());
}

#[test]
fn test_emergency_raises_wait_and_caps_load() {
    let mut state = initial();
    state.department_load = 90;
    let sim = simulator_with(state);
    let mut events = sim.subscribe();

    let update = sim.inject_action(StaffAction::Emergency);
    let after = sim.snapshot();

    assert_eq!(update.kind, UpdateKind::DepartmentStatus);
    assert!(update.message.is_some());
    assert_eq!(after.estimated_wait_time, 65);
    assert_eq!(after.department_load, 100);
    assert_eq!(after.position, 8);
    // department_status never carries a wait-time notification
    assert!(events.try_recv().is_err());
}

#[test]
fn test_delay_adds_fifteen_minutes_and_notifies() {
    let sim = simulator_with(initial());
    let mut events = sim.subscribe();

    let update = sim.inject_action(StaffAction::Delay);

    assert_eq!(update.kind, UpdateKind::WaitTimeUpdate);
    assert_eq!(sim.snapshot().estimated_wait_time, 60);
    assert_eq!(
        events.try_recv().unwrap(),
        QueueEvent::WaitTimeChanged {
            previous: 45,
            current: 60,
            origin: UpdateOrigin::StaffAction(StaffAction::Delay),
            at: 1_500,
        }
    );
}

#[test]
fn test_named_actions_parse() {
    let sim = simulator_with(initial());

    assert_ok!(sim.inject_named_action("call_next"));
    assert_ok!(sim.inject_named_action("delay"));
    assert_ok!(sim.inject_named_action("emergency"));

    let stats = sim.stats();
    assert_eq!(stats.staff_actions, 3);
    assert_eq!(stats.applied_updates, 3);
}

#[test]
fn test_unknown_action_rejected_without_change() {
    let sim = simulator_with(initial());
    let before = sim.snapshot();

    let err = assert_err!(sim.inject_named_action("discharge"));

    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidActionKind(ref name)) if name == "discharge"
    ));
    assert_eq!(sim.snapshot(), before);
    assert_eq!(sim.stats().staff_actions, 0);
}

#[test]
fn test_actions_apply_while_disconnected() {
    let sim = simulator_with(initial());

    sim.inject_action(StaffAction::Delay);

    assert_eq!(sim.connection(), ConnectionState::Disconnected);
    assert_eq!(sim.snapshot().estimated_wait_time, 60);
}

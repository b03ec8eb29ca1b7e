//! Update Generator - produces synthetic and staff-triggered updates
//!
//! Random integers are derived from unit floats as `floor(r * span) - shift`,
//! so `offset(r, 6, 3)` covers `-3..=2`, the asymmetric queue movement range.

use super::constants::*;
use crate::domain::{QueueState, QueueStatePatch, StaffAction, Update, UpdateKind, UpdateOrigin};
use crate::port::RandomSource;

/// Branches the random generator picks from, uniformly
const GENERATED_KINDS: [UpdateKind; 4] = [
    UpdateKind::PositionChange,
    UpdateKind::WaitTimeUpdate,
    UpdateKind::QueueMovement,
    UpdateKind::DepartmentStatus,
];

/// Uniform integer in `-shift..span-shift`
fn offset(random: &mut dyn RandomSource, span: u32, shift: i64) -> i64 {
    let draw = (random.next_unit() * f64::from(span)).floor() as i64;
    draw.clamp(0, i64::from(span) - 1) - shift
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Produce one random update against `state`
///
/// Draw order: branch, then the branch's own draw.
pub fn generate(
    state: &QueueState,
    random: &mut dyn RandomSource,
    origin: UpdateOrigin,
    now: i64,
) -> Update {
    let branch = offset(random, GENERATED_KINDS.len() as u32, 0) as usize;
    let kind = GENERATED_KINDS[branch];

    match kind {
        UpdateKind::PositionChange => {
            let position = if random.next_unit() < POSITION_ADVANCE_PROBABILITY {
                state.position.saturating_sub(1).max(MIN_POSITION)
            } else {
                state.position
            };
            let message = if position < state.position {
                format!("You moved up to position {position}")
            } else {
                "Your position is unchanged".to_string()
            };
            Update::new(
                kind,
                QueueStatePatch {
                    position: Some(position),
                    ..Default::default()
                },
                origin,
                now,
            )
            .with_message(message)
        }
        UpdateKind::WaitTimeUpdate => {
            let delta = offset(random, 21, 10);
            let wait = (i64::from(state.estimated_wait_time) + delta).max(i64::from(MIN_WAIT_MINUTES));
            Update::new(
                kind,
                QueueStatePatch {
                    estimated_wait_time: Some(to_u32(wait)),
                    ..Default::default()
                },
                origin,
                now,
            )
            .with_message(format!("Estimated wait is now {wait} minutes"))
        }
        UpdateKind::QueueMovement => {
            let delta = offset(random, 6, 3);
            let total = (i64::from(state.total_patients) + delta).max(i64::from(state.position));
            Update::new(
                kind,
                QueueStatePatch {
                    total_patients: Some(to_u32(total)),
                    ..Default::default()
                },
                origin,
                now,
            )
            .with_message(format!("{total} patients in the queue"))
        }
        _ => {
            let delta = offset(random, 20, 10);
            let load = (i64::from(state.department_load) + delta)
                .clamp(i64::from(LOAD_FLOOR), i64::from(LOAD_CEILING));
            Update::new(
                UpdateKind::DepartmentStatus,
                QueueStatePatch {
                    department_load: Some(to_u32(load)),
                    ..Default::default()
                },
                origin,
                now,
            )
            .with_message(format!("Department load at {load}%"))
        }
    }
}

/// Deterministic update for a staff action
pub fn staff_action(state: &QueueState, action: StaffAction, now: i64) -> Update {
    let origin = UpdateOrigin::StaffAction(action);
    match action {
        StaffAction::CallNext => {
            let position = state.position.saturating_sub(1).max(MIN_POSITION);
            Update::new(
                UpdateKind::PositionChange,
                QueueStatePatch {
                    position: Some(position),
                    ..Default::default()
                },
                origin,
                now,
            )
            .with_message("Staff called the next patient")
        }
        StaffAction::Emergency => Update::new(
            UpdateKind::DepartmentStatus,
            QueueStatePatch {
                estimated_wait_time: Some(
                    state
                        .estimated_wait_time
                        .saturating_add(EMERGENCY_WAIT_PENALTY_MINUTES),
                ),
                department_load: Some(
                    state
                        .department_load
                        .saturating_add(EMERGENCY_LOAD_INCREASE)
                        .min(LOAD_CEILING),
                ),
                ..Default::default()
            },
            origin,
            now,
        )
        .with_message("Emergency case arrived, waits may increase"),
        StaffAction::Delay => Update::new(
            UpdateKind::WaitTimeUpdate,
            QueueStatePatch {
                estimated_wait_time: Some(
                    state
                        .estimated_wait_time
                        .saturating_add(DELAY_WAIT_PENALTY_MINUTES),
                ),
                ..Default::default()
            },
            origin,
            now,
        )
        .with_message("Treatment delays reported"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::random_source::mocks::ScriptedRandomSource;

    fn state() -> QueueState {
        QueueState::initial("P-test", 1000)
    }

    // Branch draws: [0,0.25) position, [0.25,0.5) wait, [0.5,0.75) movement, [0.75,1) load
    const POSITION: f64 = 0.1;
    const WAIT: f64 = 0.3;
    const MOVEMENT: f64 = 0.6;
    const LOAD: f64 = 0.9;

    #[test]
    fn test_position_change_advances_below_probability() {
        let mut random = ScriptedRandomSource::new(vec![POSITION, 0.29]);
        let update = generate(&state(), &mut random, UpdateOrigin::Periodic, 2000);

        assert_eq!(update.kind, UpdateKind::PositionChange);
        assert_eq!(update.patch.position, Some(7));
        assert_eq!(update.timestamp, 2000);
        assert_eq!(random.draws(), 2);
    }

    #[test]
    fn test_position_change_holds_at_or_above_probability() {
        let mut random = ScriptedRandomSource::new(vec![POSITION, 0.3]);
        let update = generate(&state(), &mut random, UpdateOrigin::Periodic, 2000);

        assert_eq!(update.patch.position, Some(8));
    }

    #[test]
    fn test_position_change_never_below_one() {
        let mut s = state();
        s.position = 1;
        let mut random = ScriptedRandomSource::new(vec![POSITION, 0.0]);
        let update = generate(&s, &mut random, UpdateOrigin::Periodic, 2000);

        assert_eq!(update.patch.position, Some(1));
    }

    #[test]
    fn test_wait_time_range_is_symmetric() {
        // r -> 0.0 gives -10, r -> just under 1.0 gives +10
        let mut low = ScriptedRandomSource::new(vec![WAIT, 0.0]);
        let mut high = ScriptedRandomSource::new(vec![WAIT, 0.999]);

        let down = generate(&state(), &mut low, UpdateOrigin::Periodic, 0);
        let up = generate(&state(), &mut high, UpdateOrigin::Periodic, 0);

        assert_eq!(down.kind, UpdateKind::WaitTimeUpdate);
        assert_eq!(down.patch.estimated_wait_time, Some(35));
        assert_eq!(up.patch.estimated_wait_time, Some(55));
    }

    #[test]
    fn test_wait_time_floor() {
        let mut s = state();
        s.estimated_wait_time = 12;
        let mut random = ScriptedRandomSource::new(vec![WAIT, 0.0]);
        let update = generate(&s, &mut random, UpdateOrigin::Periodic, 0);

        assert_eq!(update.patch.estimated_wait_time, Some(10));
    }

    #[test]
    fn test_queue_movement_range_is_minus_three_to_plus_two() {
        let mut low = ScriptedRandomSource::new(vec![MOVEMENT, 0.0]);
        let mut high = ScriptedRandomSource::new(vec![MOVEMENT, 0.999]);

        let shrink = generate(&state(), &mut low, UpdateOrigin::Periodic, 0);
        let grow = generate(&state(), &mut high, UpdateOrigin::Periodic, 0);

        assert_eq!(shrink.kind, UpdateKind::QueueMovement);
        assert_eq!(shrink.patch.total_patients, Some(20));
        assert_eq!(grow.patch.total_patients, Some(25));
    }

    #[test]
    fn test_queue_movement_never_below_position() {
        let mut s = state();
        s.total_patients = 9;
        let mut random = ScriptedRandomSource::new(vec![MOVEMENT, 0.0]);
        let update = generate(&s, &mut random, UpdateOrigin::Periodic, 0);

        assert_eq!(update.patch.total_patients, Some(8));
    }

    #[test]
    fn test_department_load_clamped() {
        let mut busy = state();
        busy.department_load = 98;
        let mut quiet = state();
        quiet.department_load = 33;

        let mut up = ScriptedRandomSource::new(vec![LOAD, 0.999]);
        let mut down = ScriptedRandomSource::new(vec![LOAD, 0.0]);

        let capped = generate(&busy, &mut up, UpdateOrigin::Periodic, 0);
        let floored = generate(&quiet, &mut down, UpdateOrigin::Periodic, 0);

        assert_eq!(capped.kind, UpdateKind::DepartmentStatus);
        assert_eq!(capped.patch.department_load, Some(100));
        assert_eq!(floored.patch.department_load, Some(30));
    }

    #[test]
    fn test_generate_keeps_origin() {
        let mut random = ScriptedRandomSource::new(vec![LOAD, 0.5]);
        let update = generate(&state(), &mut random, UpdateOrigin::Refresh, 0);

        assert_eq!(update.origin, UpdateOrigin::Refresh);
        assert!(update.message.is_some());
    }

    #[test]
    fn test_call_next() {
        let update = staff_action(&state(), StaffAction::CallNext, 5000);

        assert_eq!(update.kind, UpdateKind::PositionChange);
        assert_eq!(update.patch.position, Some(7));
        assert_eq!(update.patch.estimated_wait_time, None);
        assert_eq!(update.origin, UpdateOrigin::StaffAction(StaffAction::CallNext));
    }

    #[test]
    fn test_emergency_caps_load_at_hundred() {
        let mut s = state();
        s.department_load = 90;
        let update = staff_action(&s, StaffAction::Emergency, 5000);

        assert_eq!(update.kind, UpdateKind::DepartmentStatus);
        assert_eq!(update.patch.estimated_wait_time, Some(65));
        assert_eq!(update.patch.department_load, Some(100));
    }

    #[test]
    fn test_delay() {
        let update = staff_action(&state(), StaffAction::Delay, 5000);

        assert_eq!(update.kind, UpdateKind::WaitTimeUpdate);
        assert_eq!(update.patch.estimated_wait_time, Some(60));
    }
}

// Merge policy - applies an Update to QueueState and decides on notifications

use super::constants::*;
use crate::domain::{QueueEvent, QueueState, Update, UpdateKind};
use tracing::debug;

/// Same rules for every update regardless of where it came from
///
/// Clamps are enforced here, not by callers:
/// - position >= 1, wait >= 10, total patients >= position
/// - department load in [30, 100] when a generated update sets it,
///   capped at 100 when a staff action sets it
#[derive(Debug, Clone)]
pub struct MergePolicy {
    approaching_turn_position: u32,
    wait_change_minutes: u32,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::new(APPROACHING_TURN_POSITION, WAIT_CHANGE_THRESHOLD_MINUTES)
    }
}

impl MergePolicy {
    pub fn new(approaching_turn_position: u32, wait_change_minutes: u32) -> Self {
        Self {
            approaching_turn_position,
            wait_change_minutes,
        }
    }

    /// Pull a record that never went through `apply` inside the bounds
    ///
    /// Returns true if any field was adjusted.
    pub fn normalize(state: &mut QueueState) -> bool {
        let before = state.clone();
        clamp_counts(state);
        state.department_load = state.department_load.clamp(LOAD_FLOOR, LOAD_CEILING);
        *state != before
    }

    /// Merge `update` into `state`, returning the notification it triggers, if any
    ///
    /// The approaching-turn notification is edge-triggered: it fires only when
    /// the position goes from above the threshold to at or below it.
    pub fn apply(&self, state: &mut QueueState, update: &Update) -> Option<QueueEvent> {
        let previous_position = state.position;
        let previous_wait = state.estimated_wait_time;

        state.merge(&update.patch);
        state.last_updated = update.timestamp;

        clamp_counts(state);
        if update.patch.department_load.is_some() {
            state.department_load = if update.origin.is_generated() {
                state.department_load.clamp(LOAD_FLOOR, LOAD_CEILING)
            } else {
                state.department_load.min(LOAD_CEILING)
            };
        }

        debug!(
            kind = %update.kind,
            position = state.position,
            wait = state.estimated_wait_time,
            total = state.total_patients,
            load = state.department_load,
            "Update merged"
        );

        let threshold = self.approaching_turn_position;
        match update.kind {
            UpdateKind::PositionChange
                if state.position <= threshold && previous_position > threshold =>
            {
                Some(QueueEvent::ApproachingTurn {
                    position: state.position,
                    origin: update.origin,
                    at: update.timestamp,
                })
            }
            UpdateKind::WaitTimeUpdate
                if state.estimated_wait_time.abs_diff(previous_wait) >= self.wait_change_minutes =>
            {
                Some(QueueEvent::WaitTimeChanged {
                    previous: previous_wait,
                    current: state.estimated_wait_time,
                    origin: update.origin,
                    at: update.timestamp,
                })
            }
            _ => None,
        }
    }
}

fn clamp_counts(state: &mut QueueState) {
    state.position = state.position.max(MIN_POSITION);
    state.estimated_wait_time = state.estimated_wait_time.max(MIN_WAIT_MINUTES);
    state.total_patients = state.total_patients.max(state.position);
}

// Notifications emitted to observers of a simulator

use super::update::{UpdateKind, UpdateOrigin};
use serde::{Deserialize, Serialize};

/// Side-effect notification
///
/// Serialized with a `kind` tag, e.g. `{"kind":"approaching-turn","position":3,"at":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QueueEvent {
    Connected {
        at: i64,
    },
    Disconnected {
        at: i64,
    },
    Refreshed {
        update: UpdateKind,
        at: i64,
    },
    /// Position dropped from above the threshold to at or below it
    ApproachingTurn {
        position: u32,
        origin: UpdateOrigin,
        at: i64,
    },
    WaitTimeChanged {
        previous: u32,
        current: u32,
        origin: UpdateOrigin,
        at: i64,
    },
    ConnectionLost {
        reason: String,
        at: i64,
    },
}

impl QueueEvent {
    /// Wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            QueueEvent::Connected { .. } => "connected",
            QueueEvent::Disconnected { .. } => "disconnected",
            QueueEvent::Refreshed { .. } => "refreshed",
            QueueEvent::ApproachingTurn { .. } => "approaching-turn",
            QueueEvent::WaitTimeChanged { .. } => "wait-time-changed",
            QueueEvent::ConnectionLost { .. } => "connection-lost",
        }
    }

    pub fn at(&self) -> i64 {
        match self {
            QueueEvent::Connected { at }
            | QueueEvent::Disconnected { at }
            | QueueEvent::Refreshed { at, .. }
            | QueueEvent::ApproachingTurn { at, .. }
            | QueueEvent::WaitTimeChanged { at, .. }
            | QueueEvent::ConnectionLost { at, .. } => *at,
        }
    }
}

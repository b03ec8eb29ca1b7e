// Update Domain Model - one synthetic or staff-triggered change to QueueState

use super::error::DomainError;
use super::queue::{QueueStatus, UrgencyLevel};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What an update represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    PositionChange,
    WaitTimeUpdate,
    QueueMovement,
    DepartmentStatus,
    EmergencyAlert,
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateKind::PositionChange => write!(f, "position_change"),
            UpdateKind::WaitTimeUpdate => write!(f, "wait_time_update"),
            UpdateKind::QueueMovement => write!(f, "queue_movement"),
            UpdateKind::DepartmentStatus => write!(f, "department_status"),
            UpdateKind::EmergencyAlert => write!(f, "emergency_alert"),
        }
    }
}

/// Manually triggered operator intervention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffAction {
    CallNext,
    Emergency,
    Delay,
}

impl std::fmt::Display for StaffAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaffAction::CallNext => write!(f, "call_next"),
            StaffAction::Emergency => write!(f, "emergency"),
            StaffAction::Delay => write!(f, "delay"),
        }
    }
}

impl FromStr for StaffAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call_next" => Ok(StaffAction::CallNext),
            "emergency" => Ok(StaffAction::Emergency),
            "delay" => Ok(StaffAction::Delay),
            other => Err(DomainError::InvalidActionKind(other.to_string())),
        }
    }
}

/// Who produced an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "action")]
pub enum UpdateOrigin {
    /// Periodic generator tick
    Periodic,
    /// Out-of-schedule refresh (same generator)
    Refresh,
    StaffAction(StaffAction),
}

impl UpdateOrigin {
    /// True for updates drawn from the random generator
    pub fn is_generated(&self) -> bool {
        matches!(self, UpdateOrigin::Periodic | UpdateOrigin::Refresh)
    }
}

/// Partial QueueState; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_wait_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_patients: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_status: Option<QueueStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_load: Option<u32>,
}

/// A single change, consumed once by the merge policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub kind: UpdateKind,
    pub patch: QueueStatePatch,
    pub origin: UpdateOrigin,
    /// Display-only note
    pub message: Option<String>,
    pub timestamp: i64, // epoch ms
}

impl Update {
    pub fn new(kind: UpdateKind, patch: QueueStatePatch, origin: UpdateOrigin, timestamp: i64) -> Self {
        Self {
            kind,
            patch,
            origin,
            message: None,
            timestamp,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// Queue Domain Model

use super::error::DomainError;
use super::update::QueueStatePatch;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Patient identifier (opaque, stable for the session)
pub type PatientId = String;

/// Where the patient is in the department's flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueStatus {
    Waiting,
    Called,
    InTreatment,
    Completed,
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueStatus::Waiting => write!(f, "waiting"),
            QueueStatus::Called => write!(f, "called"),
            QueueStatus::InTreatment => write!(f, "in-treatment"),
            QueueStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for QueueStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(QueueStatus::Waiting),
            "called" => Ok(QueueStatus::Called),
            "in-treatment" => Ok(QueueStatus::InTreatment),
            "completed" => Ok(QueueStatus::Completed),
            other => Err(DomainError::InvalidQueueStatus(other.to_string())),
        }
    }
}

/// Coarse triage label, independent of position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyLevel::Low => write!(f, "low"),
            UrgencyLevel::Medium => write!(f, "medium"),
            UrgencyLevel::High => write!(f, "high"),
        }
    }
}

impl FromStr for UrgencyLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(UrgencyLevel::Low),
            "medium" => Ok(UrgencyLevel::Medium),
            "high" => Ok(UrgencyLevel::High),
            other => Err(DomainError::InvalidUrgencyLevel(other.to_string())),
        }
    }
}

/// Queue status record shown to one waiting patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueState {
    pub patient_id: PatientId,
    /// 1-based rank among waiting patients
    pub position: u32,
    /// Minutes
    pub estimated_wait_time: u32,
    pub total_patients: u32,
    pub queue_status: QueueStatus,
    pub urgency_level: UrgencyLevel,
    /// Percent
    pub department_load: u32,

    // Decorative sub-counts, not checked against total_patients
    pub emergency: u32,
    pub urgent: u32,
    pub standard: u32,
    pub total: u32,

    pub last_updated: i64, // epoch ms
}

impl QueueState {
    /// Session defaults for a freshly checked-in patient
    pub fn initial(patient_id: impl Into<PatientId>, now: i64) -> Self {
        Self {
            patient_id: patient_id.into(),
            position: 8,
            estimated_wait_time: 45,
            total_patients: 23,
            queue_status: QueueStatus::Waiting,
            urgency_level: UrgencyLevel::Medium,
            department_load: 75,
            emergency: 3,
            urgent: 8,
            standard: 12,
            total: 23,
            last_updated: now,
        }
    }

    /// Shallow merge: every field present in the patch overwrites ours
    pub fn merge(&mut self, patch: &QueueStatePatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(wait) = patch.estimated_wait_time {
            self.estimated_wait_time = wait;
        }
        if let Some(total_patients) = patch.total_patients {
            self.total_patients = total_patients;
        }
        if let Some(status) = patch.queue_status {
            self.queue_status = status;
        }
        if let Some(urgency) = patch.urgency_level {
            self.urgency_level = urgency;
        }
        if let Some(load) = patch.department_load {
            self.department_load = load;
        }
    }
}

// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid action kind: {0} (expected call_next, emergency or delay)")]
    InvalidActionKind(String),

    #[error("Invalid queue status: {0}")]
    InvalidQueueStatus(String),

    #[error("Invalid urgency level: {0}")]
    InvalidUrgencyLevel(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;

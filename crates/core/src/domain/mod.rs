// Domain Layer - Queue state, updates and notifications

pub mod connection;
pub mod error;
pub mod event;
pub mod queue;
pub mod update;

// Re-exports
pub use connection::ConnectionState;
pub use error::DomainError;
pub use event::QueueEvent;
pub use queue::{PatientId, QueueState, QueueStatus, UrgencyLevel};
pub use update::{QueueStatePatch, StaffAction, Update, UpdateKind, UpdateOrigin};

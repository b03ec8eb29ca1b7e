//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};
use waitroom_core::application::SimulatorStats;
use waitroom_core::domain::{ConnectionState, QueueEvent, QueueState, Update};

/// queue.state.v1 - Current snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    pub connection: ConnectionState,
    pub state: QueueState,
}

/// queue.start.v1 / queue.stop.v1 - Connection status after the call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionResponse {
    pub connection: ConnectionState,
}

/// queue.inject.v1 - Staff action
#[derive(Debug, Deserialize)]
pub struct InjectRequest {
    pub action: String,
}

/// Result of queue.refresh.v1 and queue.inject.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub update: Update,
    pub state: QueueState,
}

/// events.tail.v1 - Recent notifications
#[derive(Debug, Deserialize)]
pub struct TailEventsRequest {
    #[serde(default = "default_lines")]
    pub lines: usize,
}

fn default_lines() -> usize {
    50
}

impl Default for TailEventsRequest {
    fn default() -> Self {
        Self {
            lines: default_lines(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub sequence: u64,
    pub event: QueueEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailEventsResponse {
    pub events: Vec<RecordedEvent>,
    pub dropped: u64,
}

/// admin.stats.v1 - Simulator counters
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub connection: ConnectionState,
    pub patient_id: String,
    pub simulator: SimulatorStats,
    pub journal_len: usize,
    pub uptime_seconds: u64,
}

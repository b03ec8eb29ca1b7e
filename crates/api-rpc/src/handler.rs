//! RPC Method Handlers
//!
//! Implements each JSON-RPC method against the shared simulator.

use crate::error::to_rpc_error;
use crate::journal::EventJournal;
use crate::types::{
    ConnectionResponse, InjectRequest, StateResponse, StatsResponse, TailEventsRequest,
    TailEventsResponse, UpdateResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use waitroom_core::application::QueueSimulator;

/// Upper bound on events.tail.v1 lines
const MAX_TAIL_LINES: usize = 1000;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    simulator: Arc<QueueSimulator>,
    journal: Arc<EventJournal>,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(simulator: Arc<QueueSimulator>, journal: Arc<EventJournal>) -> Self {
        Self {
            simulator,
            journal,
            start_time: Instant::now(),
        }
    }

    /// queue.state.v1
    pub fn state(&self) -> StateResponse {
        StateResponse {
            connection: self.simulator.connection(),
            state: self.simulator.snapshot(),
        }
    }

    /// queue.start.v1
    pub fn start(&self) -> Result<ConnectionResponse, ErrorObjectOwned> {
        self.simulator.start().map_err(to_rpc_error)?;
        Ok(ConnectionResponse {
            connection: self.simulator.connection(),
        })
    }

    /// queue.stop.v1
    pub fn stop(&self) -> ConnectionResponse {
        self.simulator.stop();
        ConnectionResponse {
            connection: self.simulator.connection(),
        }
    }

    /// queue.refresh.v1
    pub fn refresh(&self) -> UpdateResponse {
        let update = self.simulator.refresh();
        UpdateResponse {
            update,
            state: self.simulator.snapshot(),
        }
    }

    /// queue.inject.v1
    pub fn inject(&self, params: InjectRequest) -> Result<UpdateResponse, ErrorObjectOwned> {
        let update = self
            .simulator
            .inject_named_action(params.action.trim())
            .map_err(to_rpc_error)?;

        info!(action = %params.action, "Staff action injected via RPC");
        Ok(UpdateResponse {
            update,
            state: self.simulator.snapshot(),
        })
    }

    /// events.tail.v1
    pub fn tail_events(&self, params: TailEventsRequest) -> TailEventsResponse {
        TailEventsResponse {
            events: self.journal.tail(params.lines.min(MAX_TAIL_LINES)),
            dropped: self.journal.dropped(),
        }
    }

    /// admin.stats.v1
    pub fn stats(&self) -> StatsResponse {
        StatsResponse {
            connection: self.simulator.connection(),
            patient_id: self.simulator.snapshot().patient_id,
            simulator: self.simulator.stats(),
            journal_len: self.journal.len(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

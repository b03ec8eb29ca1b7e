//! Event Journal
//!
//! Keeps the most recent simulator notifications so polling clients (CLI,
//! admin console) can tail them. Fed from the simulator's broadcast channel by
//! a background task; if the task falls behind it records how many events
//! were skipped and carries on.

use crate::types::RecordedEvent;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use waitroom_core::domain::QueueEvent;

struct Entries {
    events: VecDeque<RecordedEvent>,
    next_sequence: u64,
    dropped: u64,
}

/// Bounded in-memory history of queue events
pub struct EventJournal {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl EventJournal {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries {
                events: VecDeque::with_capacity(capacity.max(1)),
                next_sequence: 1,
                dropped: 0,
            }),
        }
    }

    /// Record every event received on `rx` until the channel closes
    pub fn spawn_recorder(
        self: &Arc<Self>,
        mut rx: broadcast::Receiver<QueueEvent>,
    ) -> JoinHandle<()> {
        let journal = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => journal.record(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Event journal lagged, skipping ahead");
                        journal.note_dropped(skipped);
                    }
                    Err(RecvError::Closed) => {
                        debug!("Event channel closed, journal recorder exiting");
                        return;
                    }
                }
            }
        })
    }

    pub fn record(&self, event: QueueEvent) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let sequence = entries.next_sequence;
        entries.next_sequence += 1;
        if entries.events.len() == self.capacity {
            entries.events.pop_front();
        }
        entries.events.push_back(RecordedEvent { sequence, event });
    }

    fn note_dropped(&self, skipped: u64) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.dropped += skipped;
        entries.next_sequence += skipped;
    }

    /// Last `lines` events, oldest first
    pub fn tail(&self, lines: usize) -> Vec<RecordedEvent> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let start = entries.events.len().saturating_sub(lines);
        entries.events.iter().skip(start).cloned().collect()
    }

    /// Events lost to lagging
    pub fn dropped(&self) -> u64 {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dropped
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

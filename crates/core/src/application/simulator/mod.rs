//! Queue Simulator - owns one patient's QueueState and its simulated live feed
//!
//! One simulator per patient view. All mutation goes through a single lock, so
//! periodic ticks, refreshes and staff actions apply strictly in call order.
//! Consumers only ever see snapshots:
//! - `watch` receivers for the state record and the connection status
//! - a `broadcast` receiver for notifications
//!
//! The periodic generator runs as a tokio task tied to a session id. `stop()`,
//! `mark_error()` and `Drop` all clear the session under the lock, so a
//! connect or tick that wakes up afterwards finds a stale id and does nothing.

mod config;
pub mod constants;
pub mod generator;
pub mod policy;
mod session;


pub use config::SimulatorConfig;
pub use policy::MergePolicy;

use crate::domain::{ConnectionState, QueueEvent, QueueState, StaffAction, Update, UpdateOrigin};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, RandomSource, TimeProvider};
use serde::Serialize;
use session::{cancel_channel, CancelHandle, CancelToken};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Counters exposed for the admin surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulatorStats {
    pub applied_updates: u64,
    pub periodic_ticks: u64,
    pub refreshes: u64,
    pub staff_actions: u64,
    pub events_emitted: u64,
    pub sessions_started: u64,
}

/// Simulated queue feed for a single patient
pub struct QueueSimulator {
    shared: Arc<Shared>,
}

struct Shared {
    config: SimulatorConfig,
    policy: MergePolicy,
    time_provider: Arc<dyn TimeProvider>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<QueueState>,
    connection_tx: watch::Sender<ConnectionState>,
    events_tx: broadcast::Sender<QueueEvent>,
}

struct Inner {
    state: QueueState,
    connection: ConnectionState,
    random: Box<dyn RandomSource>,
    session: Option<Session>,
    next_session_id: u64,
    stats: SimulatorStats,
}

struct Session {
    id: u64,
    cancel: CancelHandle,
}

impl QueueSimulator {
    /// Create a simulator around an existing state record
    ///
    /// A record outside the queue bounds is clamped into them first.
    pub fn new(
        config: SimulatorConfig,
        mut initial: QueueState,
        time_provider: Arc<dyn TimeProvider>,
        random: Box<dyn RandomSource>,
    ) -> Result<Self> {
        config.validate()?;
        if MergePolicy::normalize(&mut initial) {
            warn!(
                patient_id = %initial.patient_id,
                position = initial.position,
                total_patients = initial.total_patients,
                "Initial queue state adjusted to the queue bounds"
            );
        }

        let (state_tx, _) = watch::channel(initial.clone());
        let (connection_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (events_tx, _) = broadcast::channel(config.event_capacity);
        let policy = MergePolicy::new(config.approaching_turn_position, config.wait_change_minutes);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                policy,
                time_provider,
                inner: Mutex::new(Inner {
                    state: initial,
                    connection: ConnectionState::Disconnected,
                    random,
                    session: None,
                    next_session_id: 0,
                    stats: SimulatorStats::default(),
                }),
                state_tx,
                connection_tx,
                events_tx,
            }),
        })
    }

    /// Create a simulator for a newly checked-in patient with default queue values
    pub fn for_new_patient(
        config: SimulatorConfig,
        id_provider: &dyn IdProvider,
        time_provider: Arc<dyn TimeProvider>,
        random: Box<dyn RandomSource>,
    ) -> Result<Self> {
        let initial = QueueState::initial(id_provider.generate_id(), time_provider.now_millis());
        Self::new(config, initial, time_provider, random)
    }

    /// Open the simulated connection
    ///
    /// `disconnected -> connecting`, then `connected` after the connect delay,
    /// after which a tick fires every `tick_interval`. No-op while connecting
    /// or connected.
    pub fn start(&self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            AppError::InvalidState("start() requires a running tokio runtime".to_string())
        })?;

        let mut inner = self.shared.lock();
        if inner.connection.is_active() {
            debug!(connection = %inner.connection, "start() ignored, session already live");
            return Ok(());
        }

        inner.next_session_id += 1;
        let session_id = inner.next_session_id;
        let (cancel, token) = cancel_channel();
        inner.session = Some(Session {
            id: session_id,
            cancel,
        });
        inner.stats.sessions_started += 1;
        self.shared
            .set_connection(&mut inner, ConnectionState::Connecting);

        runtime.spawn(run_session(Arc::clone(&self.shared), session_id, token));

        info!(
            session_id,
            patient_id = %inner.state.patient_id,
            "Simulator session starting"
        );
        Ok(())
    }

    /// Close the connection and cancel the generator. No-op if already disconnected.
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        if inner.connection == ConnectionState::Disconnected {
            debug!("stop() ignored, already disconnected");
            return;
        }

        Shared::cancel_session(&mut inner);
        self.shared
            .set_connection(&mut inner, ConnectionState::Disconnected);
        let at = self.shared.time_provider.now_millis();
        self.shared.emit(&mut inner, QueueEvent::Disconnected { at });
    }

    /// Generate and apply one update immediately, whatever the connection state
    pub fn refresh(&self) -> Update {
        let mut inner = self.shared.lock();
        let update = self.shared.generate(&mut inner, UpdateOrigin::Refresh);
        inner.stats.refreshes += 1;
        self.shared.apply(&mut inner, &update);
        self.shared.emit(
            &mut inner,
            QueueEvent::Refreshed {
                update: update.kind,
                at: update.timestamp,
            },
        );

        info!(kind = %update.kind, "Queue refreshed");
        update
    }

    /// Apply the deterministic update for a staff action, whatever the connection state
    pub fn inject_action(&self, action: StaffAction) -> Update {
        let mut inner = self.shared.lock();
        let now = self.shared.time_provider.now_millis();
        let update = generator::staff_action(&inner.state, action, now);
        inner.stats.staff_actions += 1;
        self.shared.apply(&mut inner, &update);

        info!(
            action = %action,
            position = inner.state.position,
            wait = inner.state.estimated_wait_time,
            load = inner.state.department_load,
            "Staff action applied"
        );
        update
    }

    /// Parse `name` as a staff action and apply it
    ///
    /// Unknown names fail with `DomainError::InvalidActionKind`.
    pub fn inject_named_action(&self, name: &str) -> Result<Update> {
        let action: StaffAction = name.parse()?;
        Ok(self.inject_action(action))
    }

    /// Put the feed into `error`, cancelling any live session
    pub fn mark_error(&self, reason: impl Into<String>) {
        let reason = reason.into();
        let mut inner = self.shared.lock();
        if inner.connection == ConnectionState::Error {
            return;
        }

        Shared::cancel_session(&mut inner);
        self.shared.set_connection(&mut inner, ConnectionState::Error);
        warn!(reason = %reason, "Simulated connection lost");
        let at = self.shared.time_provider.now_millis();
        self.shared
            .emit(&mut inner, QueueEvent::ConnectionLost { reason, at });
    }

    /// Current state record
    pub fn snapshot(&self) -> QueueState {
        self.shared.state_tx.borrow().clone()
    }

    pub fn connection(&self) -> ConnectionState {
        *self.shared.connection_tx.borrow()
    }

    /// Receiver that observes every state change
    pub fn watch_state(&self) -> watch::Receiver<QueueState> {
        self.shared.state_tx.subscribe()
    }

    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.shared.connection_tx.subscribe()
    }

    /// Subscribe to notifications emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.shared.events_tx.subscribe()
    }

    pub fn stats(&self) -> SimulatorStats {
        self.shared.lock().stats
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.shared.config
    }
}

impl Drop for QueueSimulator {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        if Shared::cancel_session(&mut inner) {
            debug!("Simulator dropped, session cancelled");
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Nothing panics while holding the lock; recover the data if it ever does
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn owns(inner: &Inner, session_id: u64) -> bool {
        inner
            .session
            .as_ref()
            .is_some_and(|session| session.id == session_id)
    }

    /// Returns true if a live session was cancelled
    fn cancel_session(inner: &mut Inner) -> bool {
        match inner.session.take() {
            Some(session) => {
                session.cancel.cancel();
                debug!(session_id = session.id, "Session cancelled");
                true
            }
            None => false,
        }
    }

    fn set_connection(&self, inner: &mut Inner, next: ConnectionState) {
        let previous = inner.connection;
        inner.connection = next;
        self.connection_tx.send_replace(next);
        info!(from = %previous, to = %next, "Connection state changed");
    }

    fn emit(&self, inner: &mut Inner, event: QueueEvent) {
        inner.stats.events_emitted += 1;
        debug!(kind = event.kind(), at = event.at(), "Queue event");
        // send only fails when nobody is subscribed
        let _ = self.events_tx.send(event);
    }

    fn generate(&self, inner: &mut Inner, origin: UpdateOrigin) -> Update {
        let now = self.time_provider.now_millis();
        generator::generate(&inner.state, inner.random.as_mut(), origin, now)
    }

    fn apply(&self, inner: &mut Inner, update: &Update) {
        let event = self.policy.apply(&mut inner.state, update);
        inner.stats.applied_updates += 1;
        self.state_tx.send_replace(inner.state.clone());
        if let Some(event) = event {
            self.emit(inner, event);
        }
    }

    /// Connect delay elapsed; false if the session was cancelled meanwhile
    fn complete_connect(&self, session_id: u64) -> bool {
        let mut inner = self.lock();
        if !Self::owns(&inner, session_id) || inner.connection != ConnectionState::Connecting {
            return false;
        }

        self.set_connection(&mut inner, ConnectionState::Connected);
        let at = self.time_provider.now_millis();
        self.emit(&mut inner, QueueEvent::Connected { at });
        true
    }

    /// One periodic tick; false once the session is no longer live
    fn tick(&self, session_id: u64) -> bool {
        let mut inner = self.lock();
        if !Self::owns(&inner, session_id) || inner.connection != ConnectionState::Connected {
            return false;
        }

        let update = self.generate(&mut inner, UpdateOrigin::Periodic);
        inner.stats.periodic_ticks += 1;
        self.apply(&mut inner, &update);
        debug!(session_id, kind = %update.kind, "Periodic update applied");
        true
    }
}

async fn run_session(shared: Arc<Shared>, session_id: u64, mut cancel: CancelToken) {
    tokio::select! {
        _ = sleep(shared.config.connect_delay) => {}
        _ = cancel.cancelled() => {
            debug!(session_id, "Session cancelled while connecting");
            return;
        }
    }

    if cancel.is_cancelled() || !shared.complete_connect(session_id) {
        return;
    }

    let period = shared.config.tick_interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !shared.tick(session_id) {
                    break;
                }
            }
            _ = cancel.cancelled() => break,
        }
    }
    debug!(session_id, "Session task finished");
}

//! `TaskflowClient`: session lifecycle plus the monitor that watches it.
//!
//! The client owns the [`SessionManager`] behind a mutex and starts a
//! [`SessionMonitor`] each time the session enters `Authenticated`. Every
//! state change is published on a `watch` channel, which is what a UI
//! subscribes to for the "is authenticated" flag.

use std::sync::Arc;
use std::time::Duration;

use taskflow_directory::{Directory, RestDirectory};
use taskflow_protocol::Member;
use taskflow_session::{
    ActivityKind, Clock, JsonFileStore, SessionManager, SessionState, SessionStore, SystemClock,
};
use tokio::sync::{Mutex, watch};

use crate::monitor::{SessionMonitor, SharedManager, publish};
use crate::{TaskflowConfig, TaskflowError};

/// A client session with its background monitor.
///
/// # Example
///
/// ```rust,no_run
/// use taskflow::prelude::*;
///
/// # async fn run() -> Result<(), TaskflowError> {
/// let config = TaskflowConfig::from_env()?;
/// let mut client = TaskflowClient::from_config(&config)?;
///
/// if !client.restore().await.is_authenticated() {
///     client.login("ada@taskflow.dev", "secret").await;
/// }
/// client.record_activity(ActivityKind::KeyPress);
/// # Ok(())
/// # }
/// ```
pub struct TaskflowClient<D, S, C = SystemClock> {
    manager: SharedManager<D, S, C>,
    state_tx: Arc<watch::Sender<SessionState>>,
    monitor: Option<SessionMonitor>,
    poll_interval: Duration,
}

impl TaskflowClient<RestDirectory, JsonFileStore> {
    /// Builds a client against the hosted directory with a file-backed
    /// session, as configured.
    ///
    /// # Errors
    /// Fails if the directory settings are incomplete or the session file
    /// exists but cannot be read.
    pub fn from_config(config: &TaskflowConfig) -> Result<Self, TaskflowError> {
        let directory = RestDirectory::new(config.rest_config())?;
        let store = JsonFileStore::open(&config.store_path)?;
        tracing::info!(
            store = %config.store_path.display(),
            url = %directory.members_url(),
            "taskflow client configured"
        );
        Ok(Self::new(SessionManager::with_system_clock(
            directory,
            store,
            config.session_config(),
        )))
    }
}

impl<D, S, C> TaskflowClient<D, S, C>
where
    D: Directory,
    S: SessionStore,
    C: Clock,
{
    /// Wraps a manager. No monitor runs until the session authenticates.
    pub fn new(manager: SessionManager<D, S, C>) -> Self {
        let poll_interval = manager.config().poll_interval;
        let (state_tx, _) = watch::channel(manager.state());
        Self {
            manager: Arc::new(Mutex::new(manager)),
            state_tx: Arc::new(state_tx),
            monitor: None,
            poll_interval,
        }
    }

    /// Restores the persisted session. Call once at startup.
    pub async fn restore(&mut self) -> SessionState {
        self.stop_monitor();
        publish(&self.state_tx, SessionState::Restoring);

        let state = self.manager.lock().await.restore().await;
        self.settle(state);
        state
    }

    /// Attempts a login. Returns `true` on success.
    ///
    /// Wrong credentials and an unreachable directory both return `false`.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.stop_monitor();

        let (ok, state) = {
            let mut manager = self.manager.lock().await;
            let ok = manager.login(email, password).await;
            (ok, manager.state())
        };
        self.settle(state);
        ok
    }

    /// Ends the session and stops the monitor. Safe to call repeatedly.
    pub async fn logout(&mut self) {
        self.stop_monitor();
        let state = {
            let mut manager = self.manager.lock().await;
            manager.logout();
            manager.state()
        };
        publish(&self.state_tx, state);
    }

    /// Reports user activity to the monitor.
    ///
    /// Returns `false` when no session is being monitored; the signal is
    /// dropped, matching the manager's own behavior when unauthenticated.
    pub fn record_activity(&self, kind: ActivityKind) -> bool {
        self.monitor.as_ref().is_some_and(|m| m.signal(kind))
    }

    /// The last published session state.
    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// The logged-in member, if any.
    pub async fn current_user(&self) -> Option<Member> {
        self.manager.lock().await.current_user().cloned()
    }

    /// Fetches the full member list, for the team grid and lookups.
    ///
    /// The directory is cloned out so the session lock is free while the
    /// request is in flight.
    pub async fn members(&self) -> Result<Vec<Member>, TaskflowError>
    where
        D: Clone,
    {
        let directory = self.manager.lock().await.directory().clone();
        Ok(directory.get_members().await?)
    }

    /// Subscribes to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Runs `f` against the manager under its lock.
    pub async fn with_manager<R>(&self, f: impl FnOnce(&SessionManager<D, S, C>) -> R) -> R {
        f(&*self.manager.lock().await)
    }

    /// Whether a monitor task is currently running.
    pub fn is_monitoring(&self) -> bool {
        self.monitor.as_ref().is_some_and(SessionMonitor::is_running)
    }

    /// Stops the monitor and releases the client. The persisted session
    /// is left in place for the next [`restore`](Self::restore).
    pub fn shutdown(mut self) {
        self.stop_monitor();
        tracing::info!("taskflow client shut down");
    }

    fn settle(&mut self, state: SessionState) {
        publish(&self.state_tx, state);
        if state.is_authenticated() {
            self.monitor = Some(SessionMonitor::spawn(
                Arc::clone(&self.manager),
                Arc::clone(&self.state_tx),
                self.poll_interval,
            ));
        }
    }
}

impl<D, S, C> TaskflowClient<D, S, C> {
    fn stop_monitor(&mut self) {
        if self.monitor.take().is_some() {
            tracing::debug!("session monitor aborted");
        }
    }
}

impl<D, S, C> Drop for TaskflowClient<D, S, C> {
    fn drop(&mut self) {
        self.stop_monitor();
    }
}

//! Background session monitor: an actor task alive only while a session
//! is authenticated.
//!
//! The actor owns a [`PollScheduler`] for the expiry check and the
//! receiving end of the activity channel. Both branches run inside one
//! `tokio::select!` loop, so a poll and an activity signal never touch the
//! manager at the same time. The actor stops itself once the session
//! leaves `Authenticated`; dropping the [`SessionMonitor`] handle aborts it.

use std::sync::Arc;
use std::time::Duration;

use taskflow_directory::Directory;
use taskflow_session::{ActivityKind, Clock, SessionManager, SessionState, SessionStore};
use taskflow_tick::PollScheduler;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

/// Buffered activity signals before new ones are dropped.
///
/// Dropping is harmless: the tracker only persists one write per
/// interval anyway.
const ACTIVITY_BUFFER: usize = 64;

/// The manager as shared between the client and its monitor.
pub(crate) type SharedManager<D, S, C> = Arc<Mutex<SessionManager<D, S, C>>>;

/// Handle to a running monitor actor.
///
/// Dropping the handle aborts the task, so no timer or listener outlives
/// the session that started it.
#[derive(Debug)]
pub struct SessionMonitor {
    activity: mpsc::Sender<ActivityKind>,
    task: JoinHandle<()>,
}

impl SessionMonitor {
    /// Spawns the actor on the current runtime.
    pub(crate) fn spawn<D, S, C>(
        manager: SharedManager<D, S, C>,
        state_tx: Arc<watch::Sender<SessionState>>,
        poll_interval: Duration,
    ) -> Self
    where
        D: Directory,
        S: SessionStore,
        C: Clock,
    {
        let (tx, rx) = mpsc::channel(ACTIVITY_BUFFER);
        let actor = MonitorActor {
            manager,
            state_tx,
            scheduler: PollScheduler::every(poll_interval),
            activity: rx,
        };

        Self {
            activity: tx,
            task: tokio::spawn(actor.run()),
        }
    }

    /// Forwards an activity signal. Returns `false` if the monitor has
    /// stopped or its buffer is full.
    pub fn signal(&self, kind: ActivityKind) -> bool {
        match self.activity.try_send(kind) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::trace!(%kind, "activity buffer full, signal dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Whether the actor task is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct MonitorActor<D, S, C> {
    manager: SharedManager<D, S, C>,
    state_tx: Arc<watch::Sender<SessionState>>,
    scheduler: PollScheduler,
    activity: mpsc::Receiver<ActivityKind>,
}

impl<D, S, C> MonitorActor<D, S, C>
where
    D: Directory,
    S: SessionStore,
    C: Clock,
{
    async fn run(mut self) {
        tracing::debug!(interval = ?self.scheduler.interval(), "session monitor started");

        loop {
            let state = tokio::select! {
                info = self.scheduler.wait_for_poll() => {
                    tracing::debug!(poll = info.poll, missed = info.missed, "expiry poll");
                    let mut manager = self.manager.lock().await;
                    manager.check_expiry();
                    manager.state()
                }
                signal = self.activity.recv() => {
                    let Some(kind) = signal else {
                        break;
                    };
                    let mut manager = self.manager.lock().await;
                    manager.record_activity(kind);
                    manager.state()
                }
            };

            publish(&self.state_tx, state);
            if !state.is_authenticated() {
                break;
            }
        }

        tracing::debug!(polls = self.scheduler.poll_count(), "session monitor stopped");
    }
}

/// Publishes `state` to subscribers if it differs from the last value.
pub(crate) fn publish(tx: &watch::Sender<SessionState>, state: SessionState) {
    tx.send_if_modified(|current| {
        if *current == state {
            false
        } else {
            tracing::debug!(from = %current, to = %state, "session state published");
            *current = state;
            true
        }
    });
}

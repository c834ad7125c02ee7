//! Session types: configuration, lifecycle state, and storage keys.
//!
//! A session is the client's record of who is logged in. It is two
//! independent persisted entries:
//! - the cached member under [`USER_KEY`]
//! - the last-activity time (epoch ms, decimal) under [`ACTIVITY_KEY`]

use std::fmt;
use std::time::Duration;

/// Store key for the JSON-encoded current member.
pub const USER_KEY: &str = "taskflow_user";

/// Store key for the last-activity timestamp.
pub const ACTIVITY_KEY: &str = "taskflow_last_activity";

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Timing knobs for the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Idle time after which a session is treated as expired.
    ///
    /// Default: 1 hour.
    pub inactivity_timeout: Duration,

    /// Minimum spacing between persisted activity writes, however often
    /// activity is observed.
    ///
    /// Default: 60 seconds.
    pub activity_write_interval: Duration,

    /// How often the background monitor checks for expiry.
    ///
    /// Default: 60 seconds.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: Duration::from_millis(3_600_000),
            activity_write_interval: Duration::from_millis(60_000),
            poll_interval: Duration::from_millis(60_000),
        }
    }
}

impl SessionConfig {
    /// Replaces zero intervals with the defaults.
    ///
    /// A zero poll interval would spin the monitor; a zero write interval
    /// would persist on every pointer move.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.poll_interval.is_zero() {
            tracing::warn!("poll_interval is zero, using default");
            self.poll_interval = defaults.poll_interval;
        }
        if self.activity_write_interval.is_zero() {
            tracing::warn!("activity_write_interval is zero, using default");
            self.activity_write_interval = defaults.activity_write_interval;
        }
        self
    }

    pub(crate) fn timeout_ms(&self) -> u64 {
        self.inactivity_timeout.as_millis() as u64
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where the session state machine currently is.
///
/// ```text
///                  restore()
///   Unauthenticated ───────→ Restoring ──(found / offline)──→ Authenticated
///        ↑   ↑                   │                               │   │
///        │   └──(none / unknown)─┘                               │   │
///        │                                                       │   │
///        ├──────────────────────(logout)─────────────────────────┘   │
///        │                                                           │
///        └────────── Expired ←──(idle > timeout, restore or poll)────┘
/// ```
///
/// `Expired` is transient: the manager passes through it while clearing
/// the persisted entries and settles in `Unauthenticated`. Callers only
/// observe "logged out".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Restoring,
    Authenticated,
    Expired,
}

impl SessionState {
    /// Returns `true` only in `Authenticated`.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Unauthenticated"),
            Self::Restoring => write!(f, "Restoring"),
            Self::Authenticated => write!(f, "Authenticated"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

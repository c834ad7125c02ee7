//! Client session management for TaskFlow.
//!
//! This crate holds the client's belief about who is logged in:
//!
//! 1. **Identity**: checked against the member [`Directory`](taskflow_directory::Directory)
//!    at login and re-validated when a persisted session is restored
//! 2. **Persistence**: the cached member and a last-activity timestamp
//!    live in a [`SessionStore`] so a session survives restarts
//! 3. **Freshness**: an inactivity timeout, throttled activity writes,
//!    and a poll hook ([`SessionManager::check_expiry`]) that logs the
//!    user out once the timestamp goes stale
//!
//! # How it fits in the stack
//!
//! ```text
//! Client facade (above)  ← drives restore/login/logout, runs the poll task
//!     ↕
//! Session Layer (this crate)  ← owns the state machine and persisted entries
//!     ↕
//! Directory + Protocol (below)  ← member records and the REST source of truth
//! ```
//!
//! Time comes from a [`Clock`], so tests drive the whole state machine
//! with a [`ManualClock`] instead of sleeping.

mod activity;
mod clock;
mod error;
mod manager;
mod session;
mod store;

pub use activity::{ActivityKind, ActivityTracker};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{SessionError, StoreError};
pub use manager::SessionManager;
pub use session::{ACTIVITY_KEY, SessionConfig, SessionState, USER_KEY};
pub use store::{JsonFileStore, MemoryStore, SessionStore};

//! # TaskFlow
//!
//! Client core for the TaskFlow project tracker.
//!
//! TaskFlow keeps a client-side session against a hosted member directory
//! and presents paginated grids of tasks, projects, and team members. This
//! crate ties the layers together: directory → session manager → monitor,
//! with the grid presenter alongside.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskflow::prelude::*;
//!
//! # async fn run() -> Result<(), TaskflowError> {
//! taskflow::init_tracing();
//!
//! let config = TaskflowConfig::load_from("taskflow.json")?;
//! let mut client = TaskflowClient::from_config(&config)?;
//! match client.restore().await {
//!     SessionState::Authenticated => {}
//!     _ => {
//!         client.login("ada@taskflow.dev", "secret").await;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod monitor;

pub use client::TaskflowClient;
pub use config::{
    DirectorySettings, ENV_KEY, ENV_STORE_PATH, ENV_URL, SessionSettings, TaskflowConfig,
};
pub use error::TaskflowError;
pub use monitor::SessionMonitor;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

pub mod prelude {
    //! Everything an application needs, in one import.

    pub use crate::{TaskflowClient, TaskflowConfig, TaskflowError, init_tracing};
    pub use taskflow_directory::{Directory, RestDirectory, StaticDirectory};
    pub use taskflow_grid::{GridKind, GridRow, Lookup, PageSize, Paginator};
    pub use taskflow_protocol::{
        Member, MemberId, Priority, Project, ProjectId, ProjectStatus, Task, TaskId, TaskStatus,
    };
    pub use taskflow_session::{
        ActivityKind, JsonFileStore, MemoryStore, SessionConfig, SessionManager, SessionState,
        SessionStore, SystemClock,
    };
}

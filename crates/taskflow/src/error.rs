//! Unified error type for the TaskFlow client.

use std::path::PathBuf;

use taskflow_directory::DirectoryError;
use taskflow_grid::GridError;
use taskflow_protocol::ProtocolError;
use taskflow_session::{SessionError, StoreError};

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `taskflow` crate you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum TaskflowError {
    /// A record failed to encode, decode, or validate.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The member directory could not be reached or answered badly.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The persisted session store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A grid was configured with an unsupported value.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The configuration file could not be read or written.
    #[error("config file {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`TaskflowConfig`](crate::TaskflowConfig).
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required setting is missing or empty.
    #[error("invalid config: {0}")]
    Config(String),
}

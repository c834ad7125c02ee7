//! Error types for the session layer.
//!
//! None of these escape `login`, `restore`, or `logout`: those degrade to
//! a logged-out (or cached-in) state and log the cause. They surface
//! when a store is opened or when the facade needs to report why a
//! session could not be persisted.

use std::path::PathBuf;

use taskflow_protocol::ProtocolError;

/// Errors raised by a [`SessionStore`](crate::SessionStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a flat JSON object of strings.
    #[error("store file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while persisting or reading session entries.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The persisted store rejected a read or write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A persisted entry could not be encoded or decoded.
    #[error("persisted entry unusable: {0}")]
    Codec(#[from] ProtocolError),

    /// The persisted activity timestamp is not a decimal integer.
    #[error("invalid activity timestamp {0:?}")]
    InvalidTimestamp(String),
}

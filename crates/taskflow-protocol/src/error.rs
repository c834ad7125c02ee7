//! Error types for the protocol layer.
//!
//! Each TaskFlow crate defines its own error enum. A `ProtocolError`
//! always means a record could not be converted to or from its stored
//! form; it never means the directory or the store itself failed.

/// Errors that can occur while encoding or decoding records.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a record into its stored text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning stored text back into a record).
    ///
    /// Common causes: a hand-edited store file, a truncated write, or an
    /// entry written by an incompatible client version.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The record decoded but violates a domain rule (e.g. an empty id).
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

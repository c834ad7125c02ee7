/// Errors that can occur while reading the member directory.
///
/// The session layer treats every variant the same way (directory
/// unavailable), but the distinction is kept for logs.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The directory could not be reached (DNS, connect, TLS, timeout).
    #[error("directory unreachable: {0}")]
    Unreachable(String),

    /// The directory answered with a non-success status.
    #[error("directory returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a list of members.
    #[error("malformed directory response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The client was built with an unusable configuration.
    #[error("invalid directory configuration: {0}")]
    InvalidConfig(String),
}

//! Error types for the grid layer.

/// Errors that can occur while configuring a grid.
///
/// Page navigation never errors: out-of-range requests are ignored.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    /// The requested page size is not one of 20, 50, 100.
    #[error("unsupported page size {0} (expected 20, 50 or 100)")]
    UnsupportedPageSize(u32),

    /// The grid kind name is not recognized.
    #[error("unknown grid kind {0:?}")]
    UnknownKind(String),
}

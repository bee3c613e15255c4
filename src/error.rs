//! Error types for a Dora session

use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, DoraError>;

/// Every failure a [`Session`](crate::session::Session) can report.
///
/// None of these are transient: an operation that returns an error has left
/// the live table and log exactly as they were.
#[derive(Error, Debug)]
pub enum DoraError {
    #[error("Invalid data source: {0}")]
    InvalidSource(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    #[error("Output column is not configured")]
    OutputNotConfigured,

    #[error("Unknown snapshot: {0}")]
    UnknownSnapshot(String),

    #[error("Numeric operation failed: {0}")]
    NumericOperation(String),

    #[error("No table loaded")]
    NotLoaded,
}

//! Error types for run persistence.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised at the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data is not a run snapshot.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// Reading or writing failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run could not be serialised.
    #[error("serialization error: {0}")]
    Serialize(String),
}

//! Error types for store operations.

use nodegate_core::Interruption;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request was cancelled before the lookup finished.
    #[error("request cancelled")]
    Cancelled,
    /// The request deadline passed before the lookup finished.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
    /// The backend could not serve the lookup.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// I/O error while loading data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Fixture data could not be parsed.
    #[error("fixture error: {0}")]
    Fixture(#[from] serde_json::Error),
}

impl From<Interruption> for StoreError {
    fn from(value: Interruption) -> Self {
        match value {
            Interruption::Cancelled => StoreError::Cancelled,
            Interruption::DeadlineExceeded => StoreError::DeadlineExceeded,
        }
    }
}

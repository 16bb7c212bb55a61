//! Error types for the catalog store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Book not found.
    #[error("book not found: {0}")]
    BookNotFound(String),

    /// List not found.
    #[error("list not found: {0}")]
    ListNotFound(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

//! Error types for the import engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, ImportError>;

/// Errors from parsing an export payload. These always surface to the
/// caller before any mutation; a payload that fails to parse is never
/// partially applied.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The raw text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON decoded but does not have the export file shape.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    /// The export was produced by a schema version outside
    /// [`crate::MIN_SUPPORTED_VERSION`]..=[`crate::MAX_SUPPORTED_VERSION`].
    #[error("unsupported export version: {0}")]
    UnsupportedVersion(u64),
}

/// Errors that can occur in engine operations.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] shelf_store::StoreError),
}

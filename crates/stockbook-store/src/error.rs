//! Error types for the store layer.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// These are store-level faults (a broken connection, a failed write).
/// Per-key failures inside the batch operations are reported in the batch
/// outcome values instead, so one bad key never fails its siblings.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored value did not decode as the expected JSON shape.
    #[error("serialization error for key {key}: {reason}")]
    Serialization { key: String, reason: String },

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Backend fault: poisoned lock, lost worker, and similar.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

//! Error types for the catalog.

use thiserror::Error;

use stockbook_core::ValidationError;
use stockbook_store::StoreError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad input: empty names, or a CSV file without a name column.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A write to the underlying store failed. Reads degrade to empty.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

//! Error types for the inventory store.

use chrono::NaiveDate;
use thiserror::Error;

use stockbook_core::ValidationError;
use stockbook_store::StoreError;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The candidate or patch failed validation; nothing was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A write to the underlying store failed. Reads never surface this;
    /// they degrade to empty.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An update referenced an id that is not in the bucket.
    #[error("no item {id} in bucket {date}")]
    NotFound { date: NaiveDate, id: String },
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

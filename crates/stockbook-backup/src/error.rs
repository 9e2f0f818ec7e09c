//! Error types for export/import.

use thiserror::Error;

use stockbook_catalog::CatalogError;
use stockbook_inventory::InventoryError;
use stockbook_store::StoreError;

/// Errors that can occur during backup operations.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The bundle is unusable as a whole: unparseable JSON or a missing
    /// version field. When import fails this way, nothing was written.
    #[error("invalid backup format: {0}")]
    InvalidFormat(String),

    /// A write to the underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A bucket write through the inventory store failed.
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// A catalog merge failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type for backup operations.
pub type Result<T> = std::result::Result<T, BackupError>;

//! Error type for the facade.

use stockbook_backup::BackupError;
use stockbook_catalog::CatalogError;
use stockbook_core::ValidationError;
use stockbook_inventory::InventoryError;
use stockbook_store::StoreError;
use thiserror::Error;

/// Errors that can occur through the Stockbook facade.
#[derive(Debug, Error)]
pub enum StockbookError {
    /// Input validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Inventory error.
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Backup error.
    #[error("backup error: {0}")]
    Backup(#[from] BackupError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, StockbookError>;

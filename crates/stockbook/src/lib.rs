//! # Stockbook
//!
//! A local, single-user data layer for small-retail inventory: date-bucketed
//! records, a predefined-item catalog, full-data export/import, and sales
//! statistics, all over pluggable key-value storage.
//!
//! ## Overview
//!
//! Stockbook provides an offline-first library for:
//!
//! - **Inventory**: per-day buckets of sale/stock records, merged on
//!   matching name and price
//! - **Catalog**: predefined items the user adds from, deduplicated by
//!   name, category, and unit type
//! - **Backup**: the entire data set as one versioned JSON bundle
//! - **Statistics**: range reports and top-selling items computed on read
//!
//! ## Key Concepts
//!
//! - **Bucket**: all records for one calendar day, stored under one key.
//! - **Merge on add**: adding an item that matches an existing record by
//!   case-insensitive name and exact price sums the units instead of
//!   creating a second record.
//! - **Degraded reads**: readers never fail on corrupt data; a bucket that
//!   cannot be decoded reads as empty and the fault is logged.
//! - **Retention**: buckets older than a configurable window (30 days by
//!   default) are swept at startup.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stockbook::{NewItem, Stockbook};
//! use chrono::NaiveDate;
//!
//! async fn example() {
//!     // Open storage
//!     let book = Stockbook::open("stockbook.db").unwrap();
//!     book.run_retention_sweep().await.unwrap();
//!
//!     // Record a sale
//!     let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//!     let outcome = book
//!         .add_item(today, NewItem::new("Apples", 2.5, 3.0, "Food", "kg"))
//!         .await
//!         .unwrap();
//!     assert!(!outcome.was_merged());
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `stockbook::core` - Domain types (InventoryItem, CatalogEntry, etc.)
//! - `stockbook::store` - Storage abstraction, SQLite and in-memory
//! - `stockbook::inventory` - Date-bucketed inventory service
//! - `stockbook::catalog` - Predefined-item catalog service
//! - `stockbook::backup` - Export/import bundles
//! - `stockbook::stats` - Sales statistics

pub mod error;
pub mod stockbook;

// Re-export component crates
pub use stockbook_backup as backup;
pub use stockbook_catalog as catalog;
pub use stockbook_core as core;
pub use stockbook_inventory as inventory;
pub use stockbook_stats as stats;
pub use stockbook_store as store;

// Re-export main types for convenience
pub use error::{Result, StockbookError};
pub use stockbook::{Stockbook, StockbookConfig};

// Re-export commonly used component types
pub use stockbook_backup::{ExportBundle, ImportMode, ImportSummary, BUNDLE_VERSION};
pub use stockbook_catalog::{
    AddEntryOutcome, BulkAddReport, Catalog, CatalogQuery, CatalogSort, CsvImportReport,
};
pub use stockbook_core::{CatalogEntry, InventoryItem, ItemPatch, NewEntry, NewItem};
pub use stockbook_inventory::{AddOutcome, InventoryStore, RetentionSweep};
pub use stockbook_stats::{SalesAggregator, SalesReport, TopItem, Trend};
pub use stockbook_store::{Kv, MemoryKv, SqliteKv};

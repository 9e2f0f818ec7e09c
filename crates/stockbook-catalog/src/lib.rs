//! # Stockbook Catalog
//!
//! The predefined-item catalog: the user-curated list of known products
//! that inventory entry autocompletes from. Stored as one JSON array under
//! the `predefinedItems` key.
//!
//! ## Overview
//!
//! - **Composite-key dedup**: an entry's identity is its case-folded name
//!   plus exact category and unit type; every dedup path is a `HashSet`
//!   membership test, never nested iteration.
//! - **Tolerant ingestion**: bulk pastes and CSV uploads skip and report
//!   bad rows instead of aborting; only a CSV file without a name column
//!   is a hard failure.
//! - **Batch merges dedup against the pre-existing catalog only**; the
//!   duplicates inside one batch all land.
//!
//! ## Key Types
//!
//! - [`Catalog`] - The catalog service
//! - [`AddEntryOutcome`] - Added vs duplicate result of a single add
//! - [`BulkAddReport`] / [`CsvImportReport`] / [`MergeReport`] - Batch outcomes

pub mod catalog;
pub mod error;
pub mod export;
pub mod ingest;

pub use catalog::{
    AddEntryOutcome, BulkAddReport, Catalog, CatalogQuery, CatalogSort, CsvImportReport,
    MergeReport,
};
pub use error::{CatalogError, Result};
pub use export::{csv_template, entries_to_csv, entries_to_json, CSV_HEADER};
pub use ingest::{ParsedRow, SkippedRow};

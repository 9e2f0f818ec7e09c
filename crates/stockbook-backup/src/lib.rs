//! # Stockbook Backup
//!
//! Whole-state export and import: one JSON bundle carries every inventory
//! bucket, the predefined catalog, and the opaque config blobs, for manual
//! backups and device migration.
//!
//! ## Overview
//!
//! - **Export never mutates** and skips corrupt buckets so one bad value
//!   cannot poison a backup.
//! - **Import is gated on the version field**: a bundle without one writes
//!   nothing; everything past that gate is applied entry by entry, and a
//!   bad entry is skipped and reported, never fatal.
//! - **The catalog always merges.** Replace mode applies to inventory
//!   buckets only; an import never wipes the user's curated catalog.
//!
//! ## Key Types
//!
//! - [`ExportBundle`] - The bundle document
//! - [`BackupService`] - Export/import over the shared services
//! - [`ImportMode`] / [`ImportSummary`] - Bucket strategy and outcome

pub mod bundle;
pub mod error;
pub mod service;

pub use bundle::{ExportBundle, BUNDLE_VERSION};
pub use error::{BackupError, Result};
pub use service::{BackupService, ImportMode, ImportSummary};

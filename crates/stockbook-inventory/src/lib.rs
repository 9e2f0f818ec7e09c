//! # Stockbook Inventory
//!
//! The date-bucketed inventory store. Daily sales/stock records live in
//! per-date buckets (`inventory_<YYYY-MM-DD>`), each a JSON array of
//! records, on top of the key-value store.
//!
//! ## Overview
//!
//! - **Merge-or-append writes**: adding an item that matches an existing
//!   record on case-insensitive name and exact price accumulates units
//!   instead of creating a duplicate line.
//! - **Serialized buckets**: every read-modify-write of a bucket goes
//!   through a per-date async lock, so concurrent writers never lose an
//!   update. Multi-bucket scans take no locks and never block writers.
//! - **Degraded reads**: a missing or corrupt bucket reads as empty; the
//!   fault is logged and never crashes the caller.
//!
//! ## Key Types
//!
//! - [`InventoryStore`] - The bucket store service
//! - [`AddOutcome`] - Created vs merged result of an add
//! - [`RetentionSweep`] - Report of a `clean_old_buckets` pass

pub mod confirm;
pub mod error;
pub mod locks;
pub mod store;

pub use error::{InventoryError, Result};
pub use locks::KeyedLocks;
pub use store::{
    AddOutcome, BucketMerge, BucketScan, InventoryStore, RetentionSweep, DEFAULT_RETENTION_DAYS,
};

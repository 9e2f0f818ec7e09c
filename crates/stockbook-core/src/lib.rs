//! # Stockbook Core
//!
//! Pure domain primitives for Stockbook: inventory records, catalog entries,
//! the storage key layout, and the small injectable services (ids, clock)
//! the stateful crates build on.
//!
//! This crate contains no I/O, no storage, no async. It is pure computation
//! over inventory data.
//!
//! ## Key Types
//!
//! - [`InventoryItem`] - One sale/stock record inside a date bucket
//! - [`CatalogEntry`] - A predefined item the user can add from
//! - [`CompositeKey`] - Catalog identity: case-folded name + category + unit
//! - [`IdSource`] / [`Clock`] - Injectable id and time providers
//!
//! ## Key Layout
//!
//! All persisted state lives under well-known string keys. See [`keys`] for
//! the full catalog: `inventory_<YYYY-MM-DD>` buckets, `predefinedItems`,
//! `daily_confirmations`, and the opaque configuration keys.

pub mod catalog;
pub mod clock;
pub mod csv;
pub mod dates;
pub mod error;
pub mod ids;
pub mod item;
pub mod keys;
pub mod validation;

pub use catalog::{CatalogEntry, CompositeKey, NewEntry};
pub use clock::{Clock, SystemClock};
pub use error::ValidationError;
pub use ids::{IdSource, UuidIds};
pub use item::{InventoryItem, ItemPatch, NewItem};
pub use validation::{validate_entry, validate_item_patch, validate_new_item};

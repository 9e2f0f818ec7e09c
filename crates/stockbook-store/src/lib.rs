//! # Stockbook Store
//!
//! Key-value persistence for Stockbook. Provides a trait-based interface
//! for string-keyed byte storage with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! Everything above this crate reads and writes opaque byte values under
//! well-known string keys; the store neither knows nor cares that the
//! values happen to be JSON. The primary implementation is [`SqliteKv`],
//! with [`MemoryKv`] for tests.
//!
//! ## Key Types
//!
//! - [`Kv`] - The async trait for all storage operations
//! - [`KvExt`] - JSON read/write conveniences layered on any [`Kv`]
//! - [`SqliteKv`] - SQLite-based persistent storage
//! - [`MemoryKv`] - In-memory storage for tests
//! - [`MultiGet`] / [`BatchOutcome`] - Per-key outcomes of the batch operations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stockbook_store::{Kv, SqliteKv};
//!
//! async fn example() {
//!     let store = SqliteKv::open("stockbook.db").unwrap();
//!
//!     store.set("predefinedItems", b"[]").await.unwrap();
//!     let value = store.get("predefinedItems").await.unwrap();
//!     assert_eq!(value.as_deref(), Some(&b"[]"[..]));
//! }
//! ```

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;
pub use traits::{BatchOutcome, KeyFailure, Kv, KvExt, MultiGet};

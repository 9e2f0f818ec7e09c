//! # Stockbook Testkit
//!
//! Testing utilities for Stockbook.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: the full service stack over one in-memory store, with a
//!   pinned clock and sequential ids
//! - **Generators**: proptest strategies for property-based testing
//! - **Fault injection**: a store that fails on chosen keys, for
//!   exercising degraded reads and per-key failure reporting
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use stockbook_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! fixture.seed_day(fixture.today(), &[("Apples", 2.0, 3.0)]).await;
//! # }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use stockbook_testkit::generators::BucketParams;
//!
//! proptest! {
//!     #[test]
//!     fn bucket_holds_what_was_added(params: BucketParams) {
//!         // drive the inventory store with params.date / params.rows
//!     }
//! }
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use stockbook_testkit::faulty::FaultyKv;
//!
//! let kv = FaultyKv::new();
//! kv.poison("inventory_2024-06-01");
//! ```

pub mod faulty;
pub mod fixtures;
pub mod generators;

pub use faulty::FaultyKv;
pub use fixtures::{pinned_book, FixedClock, SeqIds, TestFixture};
pub use generators::{bucket_date, new_entry, new_item, BucketParams};

//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a pinned clock, sequential
//! ids, and the full service stack over one in-memory store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use stockbook::{Stockbook, StockbookConfig};
use stockbook_backup::BackupService;
use stockbook_catalog::Catalog;
use stockbook_core::{Clock, IdSource, NewEntry, NewItem};
use stockbook_inventory::InventoryStore;
use stockbook_stats::SalesAggregator;
use stockbook_store::{Kv, MemoryKv};

/// Deterministic sequential ids: `id-1`, `id-2`, ...
pub struct SeqIds(AtomicU64);

impl SeqIds {
    pub fn new() -> Self {
        Self(AtomicU64::new(1))
    }
}

impl Default for SeqIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SeqIds {
    fn next_id(&self) -> String {
        format!("id-{}", self.0.fetch_add(1, Ordering::Relaxed))
    }
}

/// A clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Noon UTC on the given day.
    pub fn at_noon(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).expect("noon exists").and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The full service stack over one shared in-memory store, with a pinned
/// clock and sequential ids so every test run sees the same ids and
/// timestamps.
pub struct TestFixture {
    pub kv: Arc<MemoryKv>,
    pub inventory: Arc<InventoryStore<MemoryKv>>,
    pub catalog: Arc<Catalog<MemoryKv>>,
    pub backup: BackupService<MemoryKv>,
    pub stats: SalesAggregator<MemoryKv>,
    pub clock: FixedClock,
}

impl TestFixture {
    /// Create a fixture pinned to noon UTC on 2024-06-15.
    pub fn new() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
    }

    /// Create a fixture pinned to the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        let kv = Arc::new(MemoryKv::new());
        let clock = FixedClock(now);
        let shared_clock: Arc<dyn Clock> = Arc::new(clock);
        let ids: Arc<dyn IdSource> = Arc::new(SeqIds::new());

        let inventory = Arc::new(InventoryStore::new(
            kv.clone(),
            ids.clone(),
            shared_clock.clone(),
        ));
        let catalog = Arc::new(Catalog::new(kv.clone(), ids));
        let backup = BackupService::new(
            kv.clone(),
            inventory.clone(),
            catalog.clone(),
            shared_clock.clone(),
        );
        let stats = SalesAggregator::new(inventory.clone(), shared_clock);

        Self {
            kv,
            inventory,
            catalog,
            backup,
            stats,
            clock,
        }
    }

    /// The fixture's idea of "today".
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Add one record per row to the bucket for `date`. Rows are
    /// (name, price, units) with the default labels.
    pub async fn seed_day(&self, date: NaiveDate, rows: &[(&str, f64, f64)]) {
        for (name, price, units) in rows {
            self.inventory
                .add_item(date, NewItem::new(*name, *price, *units, "Food", "pcs"))
                .await
                .expect("seed rows are valid");
        }
    }

    /// Add catalog entries by (name, category, unit type).
    pub async fn seed_catalog(&self, entries: &[(&str, &str, &str)]) {
        for (name, category, unit_type) in entries {
            self.catalog
                .add(NewEntry::new(*name, *category, *unit_type))
                .await
                .expect("seed entries are valid");
        }
    }

    /// Decode whatever is stored under `key` as JSON, for asserting on
    /// raw stored state.
    pub async fn stored_json(&self, key: &str) -> Option<serde_json::Value> {
        let bytes = self.kv.get(key).await.unwrap()?;
        Some(serde_json::from_slice(&bytes).expect("stored value is JSON"))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A facade over a fresh in-memory store with a pinned clock and
/// sequential ids.
pub fn pinned_book(now: DateTime<Utc>, config: StockbookConfig) -> Stockbook<MemoryKv> {
    Stockbook::new(
        MemoryKv::new(),
        Arc::new(SeqIds::new()),
        Arc::new(FixedClock(now)),
        config,
    )
}

//! The Stockbook handle: unified API over the component services.
//!
//! One `Stockbook` value owns the storage backend and wires the inventory,
//! catalog, backup, and statistics services on top of it.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, NaiveDate};

use stockbook_backup::{BackupService, ExportBundle, ImportMode, ImportSummary};
use stockbook_catalog::{
    AddEntryOutcome, BulkAddReport, Catalog, CatalogQuery, CsvImportReport,
};
use stockbook_core::{
    CatalogEntry, Clock, IdSource, InventoryItem, ItemPatch, NewEntry, NewItem, SystemClock,
    UuidIds,
};
use stockbook_inventory::{AddOutcome, InventoryStore, RetentionSweep, DEFAULT_RETENTION_DAYS};
use stockbook_stats::{SalesAggregator, SalesReport, TopItem};
use stockbook_store::{Kv, SqliteKv};

use crate::error::Result;

/// Configuration for a Stockbook instance.
#[derive(Debug, Clone)]
pub struct StockbookConfig {
    /// How many days of inventory buckets to keep; buckets strictly older
    /// than today minus this many days are removed by the retention sweep.
    pub retention_days: i64,
}

impl Default for StockbookConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

/// The main Stockbook handle.
///
/// Provides a unified API for:
/// - Date-bucketed inventory records
/// - The predefined-item catalog
/// - Export/import of the full data set
/// - Sales statistics
/// - Raw configuration values for the UI shell
pub struct Stockbook<K: Kv> {
    /// The storage backend, shared with every service.
    kv: Arc<K>,
    /// Date-bucketed inventory records and daily confirmations.
    inventory: Arc<InventoryStore<K>>,
    /// The predefined-item catalog.
    catalog: Arc<Catalog<K>>,
    /// Export/import of everything as one bundle.
    backup: BackupService<K>,
    /// Read-side sales statistics.
    stats: SalesAggregator<K>,
    /// Time source, used here for the retention cutoff.
    clock: Arc<dyn Clock>,
    /// Configuration.
    config: StockbookConfig,
}

impl<K: Kv> Stockbook<K> {
    /// Create an instance with every collaborator injected.
    ///
    /// Tests substitute the store, the id source, and the clock through
    /// this constructor; [`Stockbook::with_store`] is the production
    /// wiring.
    pub fn new(
        kv: K,
        ids: Arc<dyn IdSource>,
        clock: Arc<dyn Clock>,
        config: StockbookConfig,
    ) -> Self {
        let kv = Arc::new(kv);
        let inventory = Arc::new(InventoryStore::new(kv.clone(), ids.clone(), clock.clone()));
        let catalog = Arc::new(Catalog::new(kv.clone(), ids));
        let backup = BackupService::new(kv.clone(), inventory.clone(), catalog.clone(), clock.clone());
        let stats = SalesAggregator::new(inventory.clone(), clock.clone());
        Self {
            kv,
            inventory,
            catalog,
            backup,
            stats,
            clock,
            config,
        }
    }

    /// Create an instance over `kv` with uuid ids and the system clock.
    pub fn with_store(kv: K, config: StockbookConfig) -> Self {
        Self::new(kv, Arc::new(UuidIds), Arc::new(SystemClock), config)
    }

    /// Get the storage backend.
    pub fn store(&self) -> &K {
        &self.kv
    }

    /// Get the inventory service.
    pub fn inventory(&self) -> &InventoryStore<K> {
        &self.inventory
    }

    /// Get the catalog service.
    pub fn catalog(&self) -> &Catalog<K> {
        &self.catalog
    }

    /// Get the configuration.
    pub fn config(&self) -> &StockbookConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inventory Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get all records in the bucket for `date`. Never fails; an absent or
    /// unreadable bucket reads as empty.
    pub async fn items(&self, date: NaiveDate) -> Vec<InventoryItem> {
        self.inventory.items(date).await
    }

    /// Add a record to the bucket for `date`, merging into an existing
    /// record on a case-insensitive name and exact price match.
    pub async fn add_item(&self, date: NaiveDate, candidate: NewItem) -> Result<AddOutcome> {
        Ok(self.inventory.add_item(date, candidate).await?)
    }

    /// Apply a patch to the record `id` in the bucket for `date`.
    pub async fn update_item(
        &self,
        date: NaiveDate,
        id: &str,
        patch: ItemPatch,
    ) -> Result<InventoryItem> {
        Ok(self.inventory.update_item(date, id, patch).await?)
    }

    /// Delete the record `id` from the bucket for `date`. Returns `false`
    /// when no such record exists.
    pub async fn delete_item(&self, date: NaiveDate, id: &str) -> Result<bool> {
        Ok(self.inventory.delete_item(date, id).await?)
    }

    /// Whether the given day has been marked as reviewed.
    pub async fn is_day_confirmed(&self, date: NaiveDate) -> bool {
        self.inventory.is_day_confirmed(date).await
    }

    /// Mark the given day as reviewed, or clear the mark.
    pub async fn set_day_confirmed(&self, date: NaiveDate, confirmed: bool) -> Result<()> {
        Ok(self.inventory.set_day_confirmed(date, confirmed).await?)
    }

    /// Delete inventory buckets older than the configured retention window.
    ///
    /// Meant to run at startup. The cutoff is today minus
    /// `config.retention_days`; the bucket for the cutoff date itself
    /// survives.
    pub async fn run_retention_sweep(&self) -> Result<RetentionSweep> {
        let cutoff = self.clock.today() - Duration::days(self.config.retention_days);
        tracing::debug!(
            "Running retention sweep, cutoff {} ({} days)",
            cutoff,
            self.config.retention_days
        );
        Ok(self.inventory.clean_old_buckets(cutoff).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get every catalog entry. Never fails; an unreadable catalog reads
    /// as empty.
    pub async fn catalog_entries(&self) -> Vec<CatalogEntry> {
        self.catalog.entries().await
    }

    /// Get the catalog filtered and sorted for display.
    pub async fn catalog_filtered(&self, query: &CatalogQuery) -> Vec<CatalogEntry> {
        self.catalog.filtered(query).await
    }

    /// Whether no existing entry shares the candidate's composite key.
    pub async fn catalog_is_unique(&self, candidate: &NewEntry) -> bool {
        self.catalog.is_unique(candidate).await
    }

    /// Add one catalog entry, refusing composite-key duplicates.
    pub async fn add_catalog_entry(&self, candidate: NewEntry) -> Result<AddEntryOutcome> {
        Ok(self.catalog.add(candidate).await?)
    }

    /// Add entries from pasted free-form text, one name per line.
    pub async fn bulk_add_entries(
        &self,
        text: &str,
        default_category: &str,
        default_unit_type: &str,
    ) -> Result<BulkAddReport> {
        Ok(self
            .catalog
            .bulk_add_from_text(text, default_category, default_unit_type)
            .await?)
    }

    /// Add entries from an uploaded CSV file.
    pub async fn import_catalog_csv(&self, text: &str) -> Result<CsvImportReport> {
        Ok(self.catalog.import_csv(text).await?)
    }

    /// Delete the catalog entry `id`. Returns `false` when no such entry
    /// exists.
    pub async fn delete_catalog_entry(&self, id: &str) -> Result<bool> {
        Ok(self.catalog.delete_one(id).await?)
    }

    /// Delete every catalog entry.
    pub async fn clear_catalog(&self) -> Result<()> {
        Ok(self.catalog.delete_all().await?)
    }

    /// Export the catalog as CSV.
    pub async fn export_catalog_csv(&self) -> String {
        self.catalog.to_csv().await
    }

    /// Export the catalog as pretty-printed JSON.
    pub async fn export_catalog_json(&self) -> String {
        self.catalog.to_json().await
    }

    /// A starter CSV file for the catalog upload format.
    pub fn catalog_csv_template(&self) -> &'static str {
        self.catalog.csv_template()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Backup Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Export everything as one versioned bundle.
    pub async fn export_all(&self) -> Result<ExportBundle> {
        Ok(self.backup.export_all().await?)
    }

    /// Import a bundle. `Replace` overwrites matching buckets, `Merge`
    /// appends records with unseen ids; the catalog always merges.
    pub async fn import_all(
        &self,
        bundle: &ExportBundle,
        mode: ImportMode,
    ) -> Result<ImportSummary> {
        Ok(self.backup.import_all(bundle, mode).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statistics
    // ─────────────────────────────────────────────────────────────────────────

    /// Sales statistics over the inclusive date range.
    pub async fn statistics(&self, start: NaiveDate, end: NaiveDate) -> SalesReport {
        self.stats.statistics(start, end).await
    }

    /// The best sellers over the trailing `days`-day window.
    pub async fn top_selling_items(&self, days: i64, limit: usize) -> Vec<TopItem> {
        self.stats.top_selling_items(days, limit).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Values
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a raw configuration value. The bytes pass through untouched.
    pub async fn config_get(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.kv.get(key).await?)
    }

    /// Store a raw configuration value.
    pub async fn config_set(&self, key: &str, value: &[u8]) -> Result<()> {
        Ok(self.kv.set(key, value).await?)
    }

    /// Remove a configuration value. Removing an absent key is not an
    /// error.
    pub async fn config_delete(&self, key: &str) -> Result<()> {
        Ok(self.kv.delete(key).await?)
    }
}

impl Stockbook<SqliteKv> {
    /// Open (or create) a SQLite-backed instance at `path` with the
    /// default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_store(SqliteKv::open(path)?, StockbookConfig::default()))
    }

    /// Open a SQLite-backed instance that lives in memory.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::with_store(
            SqliteKv::open_memory()?,
            StockbookConfig::default(),
        ))
    }
}

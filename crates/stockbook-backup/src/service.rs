//! Export and import of whole-state bundles.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use stockbook_catalog::Catalog;
use stockbook_core::dates::{format_date, parse_date};
use stockbook_core::keys::{CATEGORIES, PREFERENCE_KEYS, UNIT_TYPES};
use stockbook_core::{Clock, InventoryItem, NewEntry};
use stockbook_inventory::InventoryStore;
use stockbook_store::{KeyFailure, Kv};

use crate::bundle::{ExportBundle, BUNDLE_VERSION};
use crate::error::{BackupError, Result};

/// How imported inventory buckets combine with stored ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Each valid incoming bucket overwrites the stored bucket wholesale.
    Replace,
    /// Incoming records append to the stored bucket, dropping records
    /// whose id already exists there.
    Merge,
}

/// What an import actually did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Buckets written or merged into.
    pub buckets_written: usize,
    /// Records landed across all buckets (every record in replace mode,
    /// the appended ones in merge mode).
    pub items_imported: usize,
    /// Inventory entries dropped for a bad date key or undecodable value.
    pub skipped: Vec<KeyFailure>,
    pub catalog_added: usize,
    pub catalog_skipped: usize,
    /// Config keys overwritten from the bundle.
    pub config_keys_written: Vec<String>,
}

/// Whole-state export/import over the shared store and services.
///
/// Export is a pure read and never mutates. Import validates the bundle as
/// a whole first (missing version writes nothing), then applies entries
/// one by one; a bad entry is skipped and reported, never fatal.
pub struct BackupService<K> {
    kv: Arc<K>,
    inventory: Arc<InventoryStore<K>>,
    catalog: Arc<Catalog<K>>,
    clock: Arc<dyn Clock>,
}

impl<K: Kv> BackupService<K> {
    pub fn new(
        kv: Arc<K>,
        inventory: Arc<InventoryStore<K>>,
        catalog: Arc<Catalog<K>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            kv,
            inventory,
            catalog,
            clock,
        }
    }

    /// Assemble a bundle of everything exportable.
    ///
    /// Corrupt buckets are skipped (the inventory scan logs them) so one
    /// bad bucket cannot poison a backup. Succeeds even on a completely
    /// empty store, yielding a valid, mostly-empty bundle.
    pub async fn export_all(&self) -> Result<ExportBundle> {
        let scan = self.inventory.scan().await?;
        let mut inventory = BTreeMap::new();
        for (date, items) in scan.buckets {
            let value = serde_json::to_value(&items).expect("inventory items serialize to JSON");
            inventory.insert(format_date(date), value);
        }

        let bundle = ExportBundle {
            version: BUNDLE_VERSION.to_string(),
            export_date: self.clock.now_rfc3339(),
            inventory,
            predefined_items: self.catalog.entries().await,
            categories: self.read_blob(CATEGORIES).await,
            unit_types: self.read_blob(UNIT_TYPES).await,
            user_preferences: self.read_preferences().await,
        };
        tracing::info!(
            "Exported {} buckets, {} catalog entries",
            bundle.inventory.len(),
            bundle.predefined_items.len()
        );
        Ok(bundle)
    }

    /// Apply a bundle to the store.
    ///
    /// The version field must be present, or nothing is written; unknown
    /// versions import with a warning. Inventory entries are validated one
    /// by one: a bad date key or undecodable value is skipped and reported.
    /// The catalog always merges by composite key regardless of `mode`, so
    /// an import never wipes the user's curated list. Config blobs present
    /// in the bundle overwrite the stored values; absent ones are left
    /// untouched.
    pub async fn import_all(&self, bundle: &ExportBundle, mode: ImportMode) -> Result<ImportSummary> {
        // 1. Version gate. Only absence is fatal.
        if !bundle.has_version() {
            return Err(BackupError::InvalidFormat(
                "missing version field".to_string(),
            ));
        }
        if bundle.version != BUNDLE_VERSION {
            tracing::warn!("Importing bundle with unknown version {}", bundle.version);
        }

        let mut summary = ImportSummary::default();

        // 2. Inventory buckets, each on its own.
        for (date_key, value) in &bundle.inventory {
            let date = match parse_date(date_key) {
                Ok(date) => date,
                Err(_) => {
                    tracing::warn!("Skipping inventory entry with bad date key: {}", date_key);
                    summary.skipped.push(KeyFailure {
                        key: date_key.clone(),
                        reason: "invalid date key".to_string(),
                    });
                    continue;
                }
            };
            let items: Vec<InventoryItem> = match serde_json::from_value(value.clone()) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Skipping undecodable inventory entry {}: {}", date_key, e);
                    summary.skipped.push(KeyFailure {
                        key: date_key.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match mode {
                ImportMode::Replace => {
                    summary.items_imported += self.inventory.replace_bucket(date, items).await?;
                }
                ImportMode::Merge => {
                    summary.items_imported += self.inventory.merge_bucket(date, items).await?.added;
                }
            }
            summary.buckets_written += 1;
        }

        // 3. Catalog: always merge, never replace.
        let candidates: Vec<NewEntry> = bundle
            .predefined_items
            .iter()
            .map(|entry| {
                NewEntry::new(
                    entry.name.clone(),
                    entry.category.clone(),
                    entry.unit_type.clone(),
                )
            })
            .collect();
        let merge = self.catalog.merge_in(candidates).await?;
        summary.catalog_added = merge.added;
        summary.catalog_skipped = merge.skipped_duplicates;

        // 4. Config blobs, last bundle wins.
        if let Some(value) = &bundle.categories {
            self.write_blob(CATEGORIES, value).await?;
            summary.config_keys_written.push(CATEGORIES.to_string());
        }
        if let Some(value) = &bundle.unit_types {
            self.write_blob(UNIT_TYPES, value).await?;
            summary.config_keys_written.push(UNIT_TYPES.to_string());
        }
        match &bundle.user_preferences {
            Some(Value::Object(prefs)) => {
                for key in PREFERENCE_KEYS {
                    match prefs.get(key) {
                        Some(value) if !value.is_null() => {
                            self.write_blob(key, value).await?;
                            summary.config_keys_written.push(key.to_string());
                        }
                        _ => {}
                    }
                }
            }
            Some(other) => {
                tracing::warn!("Ignoring non-object userPreferences blob: {}", other);
            }
            None => {}
        }

        tracing::info!(
            "Import finished: {} buckets, {} items, {} entries skipped, catalog +{}",
            summary.buckets_written,
            summary.items_imported,
            summary.skipped.len(),
            summary.catalog_added
        );
        Ok(summary)
    }

    /// Read a config key for the bundle. Stored text that parses as JSON
    /// rides as that JSON value; anything else rides as a string of the
    /// raw text. Absent and unreadable keys are omitted.
    async fn read_blob(&self, key: &str) -> Option<Value> {
        let bytes = match self.kv.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Unreadable config key {}: {}, omitting from export", key, e);
                return None;
            }
        };
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// Write a bundle blob back to its config key in the stored form:
    /// string values as their raw contents, everything else as JSON text.
    async fn write_blob(&self, key: &str, value: &Value) -> Result<()> {
        let text = match value {
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        };
        self.kv.set(key, text.as_bytes()).await?;
        Ok(())
    }

    /// The three preference keys aggregated into one bundle object, or
    /// `None` when none of them is stored.
    async fn read_preferences(&self) -> Option<Value> {
        let mut prefs = serde_json::Map::new();
        for key in PREFERENCE_KEYS {
            if let Some(value) = self.read_blob(key).await {
                prefs.insert(key.to_string(), value);
            }
        }
        if prefs.is_empty() {
            None
        } else {
            Some(Value::Object(prefs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU64, Ordering};

    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use stockbook_core::keys::{PREDEFINED_ITEMS, SELECTED_CURRENCY, SELECTED_LANGUAGE};
    use stockbook_core::{CatalogEntry, IdSource, NewItem};
    use stockbook_store::MemoryKv;

    fn entry(name: &str, category: &str, unit_type: &str) -> CatalogEntry {
        CatalogEntry {
            id: String::new(),
            name: name.to_string(),
            category: category.to_string(),
            unit_type: unit_type.to_string(),
        }
    }

    struct SeqIds(AtomicU64);

    impl SeqIds {
        fn new() -> Self {
            Self(AtomicU64::new(1))
        }
    }

    impl IdSource for SeqIds {
        fn next_id(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::Relaxed))
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    struct Fixture {
        kv: Arc<MemoryKv>,
        inventory: Arc<InventoryStore<MemoryKv>>,
        catalog: Arc<Catalog<MemoryKv>>,
        backup: BackupService<MemoryKv>,
    }

    fn fixture() -> Fixture {
        let kv = Arc::new(MemoryKv::new());
        let ids: Arc<dyn IdSource> = Arc::new(SeqIds::new());
        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()));
        let inventory = Arc::new(InventoryStore::new(kv.clone(), ids.clone(), clock.clone()));
        let catalog = Arc::new(Catalog::new(kv.clone(), ids.clone()));
        let backup = BackupService::new(kv.clone(), inventory.clone(), catalog.clone(), clock);
        Fixture {
            kv,
            inventory,
            catalog,
            backup,
        }
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    async fn seed(fx: &Fixture) {
        fx.inventory
            .add_item(june(1), NewItem::new("Apples", 2.5, 4.0, "Food", "kg"))
            .await
            .unwrap();
        fx.inventory
            .add_item(june(2), NewItem::new("Milk", 1.2, 3.0, "Beverages", "liters"))
            .await
            .unwrap();
        fx.catalog
            .add(NewEntry::new("Apples", "Food", "kg"))
            .await
            .unwrap();
        fx.kv
            .set(CATEGORIES, br#"["Food","Beverages"]"#)
            .await
            .unwrap();
        fx.kv.set(SELECTED_LANGUAGE, b"en").await.unwrap();
    }

    #[tokio::test]
    async fn test_export_carries_buckets_catalog_and_config() {
        let fx = fixture();
        seed(&fx).await;

        let bundle = fx.backup.export_all().await.unwrap();

        assert_eq!(bundle.version, BUNDLE_VERSION);
        assert_eq!(bundle.export_date, "2024-06-01T12:00:00.000Z");
        assert_eq!(bundle.inventory.len(), 2);
        assert!(bundle.inventory.contains_key("2024-06-01"));
        assert_eq!(bundle.predefined_items.len(), 1);
        assert_eq!(
            bundle.categories,
            Some(serde_json::json!(["Food", "Beverages"]))
        );
        // A raw (non-JSON) stored string rides as a JSON string.
        let prefs = bundle.user_preferences.unwrap();
        assert_eq!(prefs[SELECTED_LANGUAGE], Value::String("en".to_string()));
    }

    #[tokio::test]
    async fn test_export_skips_corrupt_buckets() {
        let fx = fixture();
        seed(&fx).await;
        fx.kv
            .set("inventory_2024-06-03", b"{not an item array")
            .await
            .unwrap();

        let bundle = fx.backup.export_all().await.unwrap();
        assert_eq!(bundle.inventory.len(), 2);
        assert!(!bundle.inventory.contains_key("2024-06-03"));
    }

    #[tokio::test]
    async fn test_export_of_empty_store_is_a_valid_bundle() {
        let fx = fixture();
        let bundle = fx.backup.export_all().await.unwrap();

        assert!(bundle.has_version());
        assert!(bundle.inventory.is_empty());
        assert!(bundle.predefined_items.is_empty());
        assert!(bundle.categories.is_none());
        assert!(bundle.user_preferences.is_none());
    }

    #[tokio::test]
    async fn test_import_without_version_writes_nothing() {
        let fx = fixture();
        let mut bundle = ExportBundle::default();
        bundle
            .inventory
            .insert("2024-06-01".to_string(), serde_json::json!([]));

        let result = fx.backup.import_all(&bundle, ImportMode::Replace).await;
        assert!(matches!(result, Err(BackupError::InvalidFormat(_))));
        assert!(fx.inventory.items(june(1)).await.is_empty());
        assert!(fx.kv.get(PREDEFINED_ITEMS).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_import_accepts_unknown_versions() {
        let fx = fixture();
        let bundle = ExportBundle {
            version: "0.9".to_string(),
            ..Default::default()
        };
        fx.backup
            .import_all(&bundle, ImportMode::Replace)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_import_skips_bad_entries_and_keeps_good_ones() {
        let fx = fixture();
        let mut bundle = ExportBundle {
            version: BUNDLE_VERSION.to_string(),
            ..Default::default()
        };
        bundle.inventory.insert(
            "2024-06-01".to_string(),
            serde_json::json!([{
                "id": "a", "name": "Apples", "price": 2.5, "unitsSold": 4.0
            }]),
        );
        bundle
            .inventory
            .insert("not-a-date".to_string(), serde_json::json!([]));
        bundle
            .inventory
            .insert("2024-06-02".to_string(), serde_json::json!("not a list"));

        let summary = fx
            .backup
            .import_all(&bundle, ImportMode::Replace)
            .await
            .unwrap();

        assert_eq!(summary.buckets_written, 1);
        assert_eq!(summary.items_imported, 1);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(fx.inventory.items(june(1)).await.len(), 1);
        assert!(fx.inventory.items(june(2)).await.is_empty());
    }

    #[tokio::test]
    async fn test_replace_mode_overwrites_buckets() {
        let fx = fixture();
        seed(&fx).await;

        let mut bundle = ExportBundle {
            version: BUNDLE_VERSION.to_string(),
            ..Default::default()
        };
        bundle.inventory.insert(
            "2024-06-01".to_string(),
            serde_json::json!([{
                "id": "imported", "name": "Pears", "price": 3.0, "unitsSold": 1.0
            }]),
        );

        fx.backup
            .import_all(&bundle, ImportMode::Replace)
            .await
            .unwrap();

        let items = fx.inventory.items(june(1)).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Pears");
        // Buckets absent from the bundle are untouched.
        assert_eq!(fx.inventory.items(june(2)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_merge_mode_dedups_by_record_id() {
        let fx = fixture();
        seed(&fx).await;
        let existing_id = fx.inventory.items(june(1)).await[0].id.clone();

        let mut bundle = ExportBundle {
            version: BUNDLE_VERSION.to_string(),
            ..Default::default()
        };
        bundle.inventory.insert(
            "2024-06-01".to_string(),
            serde_json::json!([
                {"id": existing_id, "name": "Apples", "price": 9.9, "unitsSold": 99.0},
                {"id": "imported", "name": "Pears", "price": 3.0, "unitsSold": 1.0}
            ]),
        );

        let summary = fx
            .backup
            .import_all(&bundle, ImportMode::Merge)
            .await
            .unwrap();

        assert_eq!(summary.items_imported, 1);
        let items = fx.inventory.items(june(1)).await;
        assert_eq!(items.len(), 2);
        // The colliding record did not overwrite the stored one.
        assert_eq!(items[0].price, 2.5);
    }

    #[tokio::test]
    async fn test_catalog_always_merges_regardless_of_mode() {
        let fx = fixture();
        seed(&fx).await;

        let bundle = ExportBundle {
            version: BUNDLE_VERSION.to_string(),
            predefined_items: vec![
                entry("apples", "Food", "kg"),
                entry("Bread", "Food", "pcs"),
            ],
            ..Default::default()
        };

        let summary = fx
            .backup
            .import_all(&bundle, ImportMode::Replace)
            .await
            .unwrap();

        assert_eq!(summary.catalog_added, 1);
        assert_eq!(summary.catalog_skipped, 1);
        // The pre-existing entry survived a replace-mode import.
        assert_eq!(fx.catalog.entries().await.len(), 2);
    }

    #[tokio::test]
    async fn test_config_blobs_round_trip_to_raw_bytes() {
        let fx = fixture();
        seed(&fx).await;
        fx.kv.set(SELECTED_CURRENCY, br#"{"code":"EUR"}"#).await.unwrap();

        let bundle = fx.backup.export_all().await.unwrap();

        // Wipe and restore into a fresh fixture.
        let fresh = fixture();
        fresh
            .backup
            .import_all(&bundle, ImportMode::Replace)
            .await
            .unwrap();

        let categories = fresh.kv.get(CATEGORIES).await.unwrap().unwrap();
        assert_eq!(&categories[..], br#"["Food","Beverages"]"#);
        let language = fresh.kv.get(SELECTED_LANGUAGE).await.unwrap().unwrap();
        assert_eq!(&language[..], b"en");
        let currency = fresh.kv.get(SELECTED_CURRENCY).await.unwrap().unwrap();
        assert_eq!(&currency[..], br#"{"code":"EUR"}"#);
    }

    #[tokio::test]
    async fn test_export_import_export_round_trips() {
        let fx = fixture();
        seed(&fx).await;

        let first = fx.backup.export_all().await.unwrap();

        let fresh = fixture();
        fresh
            .backup
            .import_all(&first, ImportMode::Replace)
            .await
            .unwrap();
        let second = fresh.backup.export_all().await.unwrap();

        assert_eq!(first.inventory, second.inventory);
        assert_eq!(first.categories, second.categories);
        assert_eq!(first.user_preferences, second.user_preferences);
        // Catalog entries get fresh ids on import; identity is preserved.
        let first_keys: Vec<_> = first
            .predefined_items
            .iter()
            .map(|e| e.composite_key())
            .collect();
        let second_keys: Vec<_> = second
            .predefined_items
            .iter()
            .map(|e| e.composite_key())
            .collect();
        assert_eq!(first_keys, second_keys);
    }
}

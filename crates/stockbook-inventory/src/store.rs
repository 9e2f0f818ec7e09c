//! The date-bucketed inventory store.
//!
//! One storage key per day (`inventory_<YYYY-MM-DD>`) holds a JSON array
//! of [`InventoryItem`] records. Every mutation is a read-modify-write of
//! one bucket under that bucket's lock; reads take no lock and degrade to
//! empty on any fault.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use stockbook_core::keys::{inventory_key, parse_inventory_key, INVENTORY_PREFIX};
use stockbook_core::{
    validate_item_patch, validate_new_item, Clock, IdSource, InventoryItem, ItemPatch, NewItem,
};
use stockbook_store::{KeyFailure, Kv, KvExt};

use crate::error::{InventoryError, Result};
use crate::locks::KeyedLocks;

/// Buckets strictly older than this many days are eligible for the
/// retention sweep.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Outcome of [`InventoryStore::add_item`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AddOutcome {
    /// No existing record matched; a fresh record was appended.
    Created(InventoryItem),
    /// An existing record with the same name (case-insensitively) and the
    /// same price absorbed the candidate's units.
    #[serde(rename_all = "camelCase")]
    Merged {
        item: InventoryItem,
        added_units: f64,
    },
}

impl AddOutcome {
    /// The stored record after the addition.
    pub fn item(&self) -> &InventoryItem {
        match self {
            AddOutcome::Created(item) => item,
            AddOutcome::Merged { item, .. } => item,
        }
    }

    pub fn was_merged(&self) -> bool {
        matches!(self, AddOutcome::Merged { .. })
    }
}

/// Outcome of merging imported records into one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketMerge {
    /// Records appended because their id was new to the bucket.
    pub added: usize,
    /// Records dropped because a record with the same id already existed.
    pub duplicate_ids: usize,
}

/// A read of every inventory bucket, in key (and therefore date) order.
#[derive(Debug, Default)]
pub struct BucketScan {
    pub buckets: Vec<(NaiveDate, Vec<InventoryItem>)>,
    /// Keys under the inventory prefix that could not be read as buckets.
    pub skipped: Vec<KeyFailure>,
}

/// Outcome of [`InventoryStore::clean_old_buckets`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionSweep {
    /// Bucket keys that were deleted.
    pub removed: Vec<String>,
    /// Keys under the inventory prefix that do not parse as date buckets
    /// and were left alone.
    pub skipped: Vec<String>,
    /// Stale keys whose delete failed.
    pub failed: Vec<KeyFailure>,
}

/// Date-bucketed inventory on top of any [`Kv`].
///
/// Ids and timestamps are assigned here, never by callers, via the
/// injected [`IdSource`] and [`Clock`].
pub struct InventoryStore<K> {
    pub(crate) kv: Arc<K>,
    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
    bucket_locks: KeyedLocks<NaiveDate>,
    pub(crate) confirm_lock: tokio::sync::Mutex<()>,
}

impl<K: Kv> InventoryStore<K> {
    pub fn new(kv: Arc<K>, ids: Arc<dyn IdSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            kv,
            ids,
            clock,
            bucket_locks: KeyedLocks::new(),
            confirm_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// All records in the bucket for `date`, in insertion order.
    ///
    /// Reads never fail: an absent, unreadable, or corrupt bucket comes
    /// back as an empty list and the fault is logged.
    pub async fn items(&self, date: NaiveDate) -> Vec<InventoryItem> {
        self.kv.get_json_or_default(&inventory_key(date)).await
    }

    /// Adds `candidate` to the bucket for `date`.
    ///
    /// When an existing record matches by name (case-insensitively) and
    /// exact price, that record absorbs the candidate's units and keeps its
    /// id and timestamps. Otherwise a fresh record is appended with a new
    /// id and the current time. Blank category and unit labels default to
    /// `Other` and `pcs`.
    pub async fn add_item(&self, date: NaiveDate, candidate: NewItem) -> Result<AddOutcome> {
        let mut candidate = candidate.normalized();
        validate_new_item(&candidate)?;
        if candidate.category.is_empty() {
            candidate.category = "Other".to_string();
        }
        if candidate.unit_type.is_empty() {
            candidate.unit_type = "pcs".to_string();
        }

        let _guard = self.bucket_locks.acquire(date).await;
        let key = inventory_key(date);
        let mut items: Vec<InventoryItem> = self.kv.get_json_or_default(&key).await;

        let outcome = match items.iter().position(|item| item.absorbs(&candidate)) {
            Some(idx) => {
                items[idx].units_sold += candidate.units_sold;
                items[idx].recompute_total();
                AddOutcome::Merged {
                    item: items[idx].clone(),
                    added_units: candidate.units_sold,
                }
            }
            None => {
                let mut item = InventoryItem {
                    id: self.ids.next_id(),
                    name: candidate.name,
                    price: candidate.price,
                    units_sold: candidate.units_sold,
                    total_amount: 0.0,
                    category: candidate.category,
                    unit_type: candidate.unit_type,
                    timestamp: self.clock.now_rfc3339(),
                    updated_at: None,
                };
                item.recompute_total();
                items.push(item.clone());
                AddOutcome::Created(item)
            }
        };

        self.kv.set_json(&key, &items).await?;
        tracing::debug!(
            "Added to bucket {}: {} ({})",
            date,
            outcome.item().name,
            if outcome.was_merged() { "merged" } else { "created" }
        );
        Ok(outcome)
    }

    /// Applies `patch` to the record with `id` in the bucket for `date` and
    /// returns the updated record.
    ///
    /// The record's `updated_at` is set to the current time. The creation
    /// `timestamp` is never touched.
    pub async fn update_item(
        &self,
        date: NaiveDate,
        id: &str,
        patch: ItemPatch,
    ) -> Result<InventoryItem> {
        validate_item_patch(&patch)?;

        let _guard = self.bucket_locks.acquire(date).await;
        let key = inventory_key(date);
        let mut items: Vec<InventoryItem> = self.kv.get_json_or_default(&key).await;

        let idx = items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| InventoryError::NotFound {
                date,
                id: id.to_string(),
            })?;

        patch.apply_to(&mut items[idx]);
        items[idx].updated_at = Some(self.clock.now_rfc3339());
        let updated = items[idx].clone();

        self.kv.set_json(&key, &items).await?;
        Ok(updated)
    }

    /// Removes the record with `id` from the bucket for `date`.
    ///
    /// Returns whether a record was actually removed. Deleting an absent id
    /// is not an error and writes nothing.
    pub async fn delete_item(&self, date: NaiveDate, id: &str) -> Result<bool> {
        let _guard = self.bucket_locks.acquire(date).await;
        let key = inventory_key(date);
        let mut items: Vec<InventoryItem> = self.kv.get_json_or_default(&key).await;

        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }

        self.kv.set_json(&key, &items).await?;
        Ok(true)
    }

    /// Overwrites the bucket for `date` with `items` verbatim and returns
    /// the record count. Import in replace mode goes through here.
    pub async fn replace_bucket(
        &self,
        date: NaiveDate,
        items: Vec<InventoryItem>,
    ) -> Result<usize> {
        let _guard = self.bucket_locks.acquire(date).await;
        self.kv.set_json(&inventory_key(date), &items).await?;
        Ok(items.len())
    }

    /// Appends the records from `incoming` whose ids are not already in the
    /// bucket for `date`. Import in merge mode goes through here.
    pub async fn merge_bucket(
        &self,
        date: NaiveDate,
        incoming: Vec<InventoryItem>,
    ) -> Result<BucketMerge> {
        let _guard = self.bucket_locks.acquire(date).await;
        let key = inventory_key(date);
        let mut items: Vec<InventoryItem> = self.kv.get_json_or_default(&key).await;

        let existing: HashSet<String> = items.iter().map(|item| item.id.clone()).collect();
        let mut merge = BucketMerge::default();
        for item in incoming {
            if existing.contains(&item.id) {
                merge.duplicate_ids += 1;
            } else {
                items.push(item);
                merge.added += 1;
            }
        }

        if merge.added > 0 {
            self.kv.set_json(&key, &items).await?;
        }
        Ok(merge)
    }

    /// Reads every inventory bucket.
    ///
    /// Listing failures propagate. Individual keys that do not parse as
    /// date buckets, or whose contents cannot be read, are reported in
    /// `skipped` and logged, never fatal. The scan takes no bucket locks,
    /// so a long export never blocks writers.
    pub async fn scan(&self) -> Result<BucketScan> {
        let keys = self.kv.list_keys(INVENTORY_PREFIX).await?;

        let mut scan = BucketScan::default();
        for key in keys {
            let Some(date) = parse_inventory_key(&key) else {
                tracing::warn!("Skipping non-bucket key under inventory prefix: {}", key);
                scan.skipped.push(KeyFailure {
                    key,
                    reason: "not a date bucket key".to_string(),
                });
                continue;
            };
            match self.kv.get_json::<Vec<InventoryItem>>(&key).await {
                Ok(Some(items)) => scan.buckets.push((date, items)),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Skipping unreadable bucket {}: {}", key, e);
                    scan.skipped.push(KeyFailure {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(scan)
    }

    /// Deletes every bucket strictly older than `cutoff`.
    ///
    /// A bucket for `cutoff` itself survives. Keys under the inventory
    /// prefix that do not parse as date buckets are left alone and listed
    /// in `skipped`. Each stale key is deleted independently; failures land
    /// in `failed` rather than aborting the sweep.
    pub async fn clean_old_buckets(&self, cutoff: NaiveDate) -> Result<RetentionSweep> {
        let keys = self.kv.list_keys(INVENTORY_PREFIX).await?;

        let mut sweep = RetentionSweep::default();
        let mut stale = Vec::new();
        for key in keys {
            match parse_inventory_key(&key) {
                Some(date) if date < cutoff => stale.push(key),
                Some(_) => {}
                None => {
                    tracing::warn!("Leaving non-bucket key under inventory prefix: {}", key);
                    sweep.skipped.push(key);
                }
            }
        }

        let outcome = self.kv.multi_delete(&stale).await?;
        let failed_keys: HashSet<&str> = outcome.failed.iter().map(|f| f.key.as_str()).collect();
        sweep.removed = stale
            .into_iter()
            .filter(|key| !failed_keys.contains(key.as_str()))
            .collect();
        sweep.failed = outcome.failed;

        tracing::info!(
            "Retention sweep before {}: {} removed, {} skipped, {} failed",
            cutoff,
            sweep.removed.len(),
            sweep.skipped.len(),
            sweep.failed.len()
        );
        Ok(sweep)
    }
}

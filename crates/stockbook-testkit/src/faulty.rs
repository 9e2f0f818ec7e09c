//! Fault injection for error-path tests.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use stockbook_store::{Kv, MemoryKv, Result, StoreError};

/// A store that fails every operation on a configured set of keys and
/// delegates the rest to an inner [`MemoryKv`].
///
/// This is how tests exercise the degraded-read paths (a bucket that
/// cannot be read) and the per-key failure reporting of the batch
/// operations, without reaching for a real broken database.
pub struct FaultyKv {
    inner: MemoryKv,
    poisoned: RwLock<HashSet<String>>,
}

impl FaultyKv {
    pub fn new() -> Self {
        Self {
            inner: MemoryKv::new(),
            poisoned: RwLock::new(HashSet::new()),
        }
    }

    /// Make every operation on `key` fail from now on.
    pub fn poison(&self, key: &str) {
        self.poisoned.write().unwrap().insert(key.to_string());
    }

    /// Let operations on `key` succeed again.
    pub fn heal(&self, key: &str) {
        self.poisoned.write().unwrap().remove(key);
    }

    /// Store a value directly, bypassing the fault check, so tests can
    /// seed a key and then poison it.
    pub async fn seed(&self, key: &str, value: &[u8]) -> Result<()> {
        self.inner.set(key, value).await
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.poisoned.read().unwrap().contains(key) {
            Err(StoreError::Backend(format!("injected fault for key {key}")))
        } else {
            Ok(())
        }
    }
}

impl Default for FaultyKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Kv for FaultyKv {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.check(key)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check(key)?;
        self.inner.delete(key).await
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        self.inner.list_keys(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use stockbook_core::{Clock, IdSource, NewItem};
    use stockbook_inventory::InventoryStore;

    use crate::fixtures::{FixedClock, SeqIds};

    fn june(day: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn store_over(kv: Arc<FaultyKv>) -> InventoryStore<FaultyKv> {
        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()));
        let ids: Arc<dyn IdSource> = Arc::new(SeqIds::new());
        InventoryStore::new(kv, ids, clock)
    }

    #[tokio::test]
    async fn test_poisoned_key_fails_and_heals() {
        let kv = FaultyKv::new();
        kv.set("k", b"v").await.unwrap();

        kv.poison("k");
        assert!(matches!(kv.get("k").await, Err(StoreError::Backend(_))));
        assert!(kv.set("k", b"w").await.is_err());

        kv.heal("k");
        assert_eq!(kv.get("k").await.unwrap(), Some(Bytes::from_static(b"v")));
    }

    #[tokio::test]
    async fn test_unreadable_bucket_reads_as_empty() {
        let kv = Arc::new(FaultyKv::new());
        let inventory = store_over(kv.clone());

        inventory
            .add_item(june(1), NewItem::new("Apples", 2.0, 1.0, "Food", "kg"))
            .await
            .unwrap();
        kv.poison("inventory_2024-06-01");

        assert!(inventory.items(june(1)).await.is_empty());
    }

    #[tokio::test]
    async fn test_scan_skips_unreadable_buckets_and_reports_them() {
        let kv = Arc::new(FaultyKv::new());
        let inventory = store_over(kv.clone());

        inventory
            .add_item(june(1), NewItem::new("Apples", 2.0, 1.0, "Food", "kg"))
            .await
            .unwrap();
        inventory
            .add_item(june(2), NewItem::new("Milk", 1.5, 1.0, "Food", "pcs"))
            .await
            .unwrap();
        kv.poison("inventory_2024-06-01");

        let scan = inventory.scan().await.unwrap();
        assert_eq!(scan.buckets.len(), 1);
        assert_eq!(scan.buckets[0].0, june(2));
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].key, "inventory_2024-06-01");
    }

    #[tokio::test]
    async fn test_sweep_reports_buckets_it_could_not_delete() {
        let kv = Arc::new(FaultyKv::new());
        let inventory = store_over(kv.clone());

        inventory
            .add_item(june(1), NewItem::new("Apples", 2.0, 1.0, "Food", "kg"))
            .await
            .unwrap();
        inventory
            .add_item(june(2), NewItem::new("Milk", 1.5, 1.0, "Food", "pcs"))
            .await
            .unwrap();
        kv.poison("inventory_2024-06-01");

        let sweep = inventory.clean_old_buckets(june(10)).await.unwrap();
        assert_eq!(sweep.removed, vec!["inventory_2024-06-02".to_string()]);
        assert_eq!(sweep.failed.len(), 1);
        assert_eq!(sweep.failed[0].key, "inventory_2024-06-01");
    }
}

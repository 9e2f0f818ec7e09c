//! Per-day review confirmations.
//!
//! A single JSON object under the `daily_confirmations` key maps date keys
//! (`YYYY-MM-DD`) to a confirmed flag. The map is tiny and shared by every
//! date, so its read-modify-write runs under one dedicated lock instead of
//! the per-bucket registry.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use stockbook_core::dates::format_date;
use stockbook_core::keys::DAILY_CONFIRMATIONS;
use stockbook_store::{Kv, KvExt};

use crate::error::Result;
use crate::store::InventoryStore;

impl<K: Kv> InventoryStore<K> {
    /// Whether the given day has been marked as reviewed. An absent entry
    /// and an unreadable map both read as unconfirmed.
    pub async fn is_day_confirmed(&self, date: NaiveDate) -> bool {
        let map: BTreeMap<String, bool> = self.kv.get_json_or_default(DAILY_CONFIRMATIONS).await;
        map.get(&format_date(date)).copied().unwrap_or(false)
    }

    /// Marks the given day as reviewed, or clears the mark.
    pub async fn set_day_confirmed(&self, date: NaiveDate, confirmed: bool) -> Result<()> {
        let _guard = self.confirm_lock.lock().await;
        let mut map: BTreeMap<String, bool> = self.kv.get_json_or_default(DAILY_CONFIRMATIONS).await;
        map.insert(format_date(date), confirmed);
        self.kv.set_json(DAILY_CONFIRMATIONS, &map).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use stockbook_core::{SystemClock, UuidIds};
    use stockbook_store::MemoryKv;

    fn test_store() -> InventoryStore<MemoryKv> {
        InventoryStore::new(
            Arc::new(MemoryKv::new()),
            Arc::new(UuidIds),
            Arc::new(SystemClock),
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_days_start_unconfirmed() {
        let store = test_store();
        assert!(!store.is_day_confirmed(day(1)).await);
    }

    #[tokio::test]
    async fn test_set_and_clear_one_day() {
        let store = test_store();
        store.set_day_confirmed(day(1), true).await.unwrap();
        store.set_day_confirmed(day(2), true).await.unwrap();

        assert!(store.is_day_confirmed(day(1)).await);
        assert!(store.is_day_confirmed(day(2)).await);
        assert!(!store.is_day_confirmed(day(3)).await);

        store.set_day_confirmed(day(1), false).await.unwrap();
        assert!(!store.is_day_confirmed(day(1)).await);
        assert!(store.is_day_confirmed(day(2)).await);
    }

    #[tokio::test]
    async fn test_corrupt_map_reads_unconfirmed() {
        let store = test_store();
        store
            .kv
            .set(DAILY_CONFIRMATIONS, b"not a json object")
            .await
            .unwrap();
        assert!(!store.is_day_confirmed(day(1)).await);

        // Writing repairs the key.
        store.set_day_confirmed(day(1), true).await.unwrap();
        assert!(store.is_day_confirmed(day(1)).await);
    }
}

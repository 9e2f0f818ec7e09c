//! Per-key async locks.
//!
//! Every mutation of a date bucket is a read-modify-write of one storage
//! key, so two concurrent writers to the same bucket can lose updates.
//! [`KeyedLocks`] hands out one lock per key: writers to the same bucket
//! queue up, writers to different buckets proceed in parallel, and readers
//! never touch the registry at all.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// A registry of async locks, one per key.
///
/// Lock entries are created on first use and kept for the lifetime of the
/// registry. The expected key space is small (one entry per active date),
/// so entries are never reaped.
pub struct KeyedLocks<K> {
    registry: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Acquires the lock for `key`, waiting if another task holds it.
    ///
    /// The registry itself is only held long enough to look up or insert
    /// the per-key entry, so contention on one key never blocks another.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let entry = {
            let mut registry = self.registry.lock().await;
            registry.entry(key).or_default().clone()
        };
        entry.lock_owned().await
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_serializes() {
        let locks = Arc::new(KeyedLocks::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("2024-05-01").await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_keys_run_in_parallel() {
        let locks = Arc::new(KeyedLocks::new());

        let guard_a = locks.acquire("a").await;

        // A second key must be acquirable while the first is held.
        let locks2 = locks.clone();
        let other = tokio::time::timeout(Duration::from_millis(100), async move {
            locks2.acquire("b").await
        })
        .await;
        assert!(other.is_ok());

        drop(guard_a);
    }

    #[tokio::test]
    async fn test_reacquire_after_release() {
        let locks = KeyedLocks::new();
        let guard = locks.acquire(1u32).await;
        drop(guard);
        let _again = locks.acquire(1u32).await;
    }
}

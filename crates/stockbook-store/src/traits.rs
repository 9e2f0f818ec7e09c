//! Kv trait: the abstract interface for key-value persistence.
//!
//! This trait keeps the domain crates storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// One key that failed inside a batch operation, with a displayable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFailure {
    pub key: String,
    pub reason: String,
}

/// Outcome of `multi_get`: the values that were found plus the keys that
/// failed. Absent keys are neither; they simply do not appear.
#[derive(Debug, Default)]
pub struct MultiGet {
    pub found: HashMap<String, Bytes>,
    pub failed: Vec<KeyFailure>,
}

/// Outcome of `multi_set` / `multi_delete`: how many entries were applied
/// and which keys failed.
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    pub applied: usize,
    pub failed: Vec<KeyFailure>,
}

impl BatchOutcome {
    /// True when every entry was applied.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The Kv trait: async interface for string-keyed byte storage.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, `spawn_blocking` is used internally to avoid blocking the
/// runtime.
///
/// # Design Notes
///
/// - **Absent is not an error**: `get` on a missing key returns `Ok(None)`,
///   `delete` on a missing key returns `Ok(())`.
/// - **Per-key independence**: the `multi_*` operations apply each key on
///   its own and report failures in the outcome value; the outer `Result`
///   fails only on store-level faults.
/// - **Opaque values**: values are bytes. The JSON convenience methods live
///   on [`KvExt`], not here.
#[async_trait]
pub trait Kv: Send + Sync {
    /// Get the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Store `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// List all keys starting with `prefix`, sorted ascending. An empty
    /// prefix lists every key.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Get many keys at once. Each key succeeds or fails independently.
    async fn multi_get(&self, keys: &[String]) -> Result<MultiGet> {
        let mut outcome = MultiGet::default();
        for key in keys {
            match self.get(key).await {
                Ok(Some(value)) => {
                    outcome.found.insert(key.clone(), value);
                }
                Ok(None) => {}
                Err(e) => outcome.failed.push(KeyFailure {
                    key: key.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        Ok(outcome)
    }

    /// Set many entries at once. Each entry succeeds or fails independently.
    async fn multi_set(&self, entries: &[(String, Vec<u8>)]) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        for (key, value) in entries {
            match self.set(key, value).await {
                Ok(()) => outcome.applied += 1,
                Err(e) => outcome.failed.push(KeyFailure {
                    key: key.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        Ok(outcome)
    }

    /// Delete many keys at once. Each key succeeds or fails independently.
    async fn multi_delete(&self, keys: &[String]) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        for key in keys {
            match self.delete(key).await {
                Ok(()) => outcome.applied += 1,
                Err(e) => outcome.failed.push(KeyFailure {
                    key: key.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        Ok(outcome)
    }
}

/// Extension trait for the JSON read/write patterns shared by the domain
/// crates.
pub trait KvExt: Kv {
    /// Read and decode a JSON value. `Ok(None)` when the key is absent;
    /// a value that does not decode is a `Serialization` error.
    fn get_json<T>(&self, key: &str) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned;

    /// Read and decode a JSON value, degrading to the type's default when
    /// the key is absent, unreadable, or corrupt. Faults are logged via
    /// `tracing`, never raised: this is the read policy for inventory
    /// buckets, the catalog, and the confirmation map.
    fn get_json_or_default<T>(&self, key: &str) -> impl Future<Output = T> + Send
    where
        T: DeserializeOwned + Default + Send;

    /// Encode a value as compact JSON and store it.
    fn set_json<T>(&self, key: &str, value: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync;
}

impl<S: Kv + ?Sized> KvExt for S {
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get(key).await? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::Serialization {
                        key: key.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn get_json_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default + Send,
    {
        match self.get_json(key).await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("Unreadable value at key {}: {}, treating as empty", key, e);
                T::default()
            }
        }
    }

    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.set(key, &bytes).await
    }
}

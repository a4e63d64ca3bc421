//! Memory Store Module
//!
//! In-process `Store`: one map keyed by physical key, each entry carrying its
//! own deadline. Expired entries are dropped lazily when touched, or in bulk by
//! [`MemoryStore::sweep_expired`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::expiry::current_timestamp_ms;
use crate::cache::Number;
use crate::error::Result;
use crate::store::{CacheEntry, IncrOutcome, Store, StoreStats};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    stats: StoreStats,
}

impl Inner {
    /// Looks up a live entry, dropping it first if it has expired.
    fn live_mut(&mut self, key: &str, now: u64) -> Option<&mut CacheEntry> {
        if self.entries.get(key).is_some_and(|e| e.is_expired_at(now)) {
            self.entries.remove(key);
            self.stats.record_expired(1);
        }
        self.entries.get_mut(key)
    }

    fn lookup(&mut self, key: &str, now: u64) -> Option<CacheEntry> {
        let found = self.live_mut(key, now).cloned();
        if found.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        found
    }
}

// == Memory Store ==
/// Thread-safe in-memory store. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Stats ==
    /// Returns current store statistics.
    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.read().await;
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - inner.entries.len();
        inner.stats.record_expired(removed);
        removed
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet reclaimed.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        // Write lock: lookups update stats and may drop an expired entry
        let mut inner = self.inner.write().await;
        Ok(inner.lookup(key, current_timestamp_ms()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, expires_at: Option<u64>) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(value, expires_at));
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: Vec<u8>,
        expires_at: Option<u64>,
    ) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if inner.live_mut(key, current_timestamp_ms()).is_some() {
            return Ok(false);
        }
        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(value, expires_at));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.entries.remove(key).is_some())
    }

    async fn incr_by(&self, key: &str, delta: Number) -> Result<IncrOutcome> {
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.live_mut(key, current_timestamp_ms()) else {
            return Ok(IncrOutcome::Missing);
        };
        let Some(current) = Number::parse(&entry.value) else {
            return Ok(IncrOutcome::NotNumeric);
        };
        let Some(updated) = current.checked_add(delta) else {
            return Ok(IncrOutcome::Overflow);
        };
        entry.value = updated.to_bytes()?;
        Ok(IncrOutcome::Updated(updated))
    }

    async fn expire(&self, key: &str, expires_at: Option<u64>) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.live_mut(key, current_timestamp_ms()) {
            Some(entry) => {
                entry.expires_at = expires_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_prefix(&self, prefix: &str) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - inner.entries.len())
    }

    async fn remove_expired(&self, key: &str, now: u64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if inner.entries.get(key).is_some_and(|e| e.is_expired_at(now)) {
            inner.entries.remove(key);
            inner.stats.record_expired(1);
            return Ok(true);
        }
        Ok(false)
    }

    // Batch primitives run under a single lock acquisition

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<CacheEntry>>> {
        let now = current_timestamp_ms();
        let mut inner = self.inner.write().await;
        Ok(keys.iter().map(|key| inner.lookup(key, now)).collect())
    }

    async fn set_many(&self, entries: Vec<(String, Vec<u8>)>, expires_at: Option<u64>) -> Result<()> {
        let mut inner = self.inner.write().await;
        for (key, value) in entries {
            inner.entries.insert(key, CacheEntry::new(value, expires_at));
        }
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let removed = keys
            .iter()
            .filter(|key| inner.entries.remove(key.as_str()).is_some())
            .count();
        debug!("MemoryStore: deleted {} of {} keys", removed, keys.len());
        Ok(removed)
    }
}

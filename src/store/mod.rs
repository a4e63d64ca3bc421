//! Store Module
//!
//! The narrow primitive interface the cache engine drives, plus the in-process
//! `MemoryStore` implementation.
//!
//! Stores deal only in physical keys and encoded bytes. They must make
//! `set_if_absent`, `incr_by`, `expire` and `remove_expired` atomic per key,
//! and must treat an expired entry as absent in every conditional primitive.

mod entry;
mod memory;
mod stats;

use async_trait::async_trait;

use crate::cache::Number;
use crate::error::Result;

pub use entry::CacheEntry;
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Increment Outcome ==
/// Result of the store's atomic increment primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IncrOutcome {
    /// No live entry under the key
    Missing,
    /// The stored payload is not a number; nothing was written
    NotNumeric,
    /// The new value, already persisted
    Updated(Number),
    /// The addition would overflow; nothing was written
    Overflow,
}

// == Store Trait ==
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Fetches an entry. Stores without native expiry may hand back expired
    /// entries; the engine filters them.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Unconditional write.
    async fn set(&self, key: &str, value: Vec<u8>, expires_at: Option<u64>) -> Result<()>;

    /// Writes only when no live entry exists. Returns whether it wrote.
    async fn set_if_absent(&self, key: &str, value: Vec<u8>, expires_at: Option<u64>)
        -> Result<bool>;

    /// Removes an entry. Returns whether one existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Adds `delta` to the numeric payload in place, keeping its deadline.
    async fn incr_by(&self, key: &str, delta: Number) -> Result<IncrOutcome>;

    /// Replaces the deadline of a live entry. Returns false if there is none.
    async fn expire(&self, key: &str, expires_at: Option<u64>) -> Result<bool>;

    /// Removes every entry whose key starts with `prefix`.
    async fn clear_prefix(&self, prefix: &str) -> Result<usize>;

    /// Removes the entry only if it is still expired at `now`.
    async fn remove_expired(&self, key: &str, now: u64) -> Result<bool>;

    // == Batch Primitives ==
    // Per-key fallbacks; stores with pipelining should override them.

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<CacheEntry>>> {
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            entries.push(self.get(key).await?);
        }
        Ok(entries)
    }

    async fn set_many(&self, entries: Vec<(String, Vec<u8>)>, expires_at: Option<u64>) -> Result<()> {
        for (key, value) in entries {
            self.set(&key, value, expires_at).await?;
        }
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize> {
        let mut removed = 0;
        for key in keys {
            if self.delete(key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

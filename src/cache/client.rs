//! Cache Client
//!
//! The semantics engine. Every operation resolves a physical key, makes one
//! round-trip to the store and treats absent and expired entries alike.
//!
//! Nothing is cached in-process. Atomicity is whatever the store's primitives
//! give: `add` rides on `set_if_absent`, `incr`/`decr` on `incr_by`, `touch`
//! on `expire`. `get_or_set` is not single-flighted; two callers missing at
//! once may both run the default and the last write wins.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::expiry::{current_timestamp_ms, is_live, stamp};
use crate::cache::{DefaultValue, KeyCodec, Number, Version};
use crate::codec::{Codec, JsonCodec};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::store::{CacheEntry, IncrOutcome, Store};
use crate::value::Value;

// == Cache ==
/// Handle to a namespaced, optionally versioned view of a store.
///
/// Cloning is cheap and clones share the store.
///
/// # Example
/// ```ignore
/// let cache = Cache::new(Arc::new(MemoryStore::new()), "app")?;
/// cache.set("greeting", "hello", Some(Duration::from_secs(60))).await?;
/// cache.version(2).set("greeting", "bonjour", None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Cache {
    pub(super) store: Arc<dyn Store>,
    pub(super) codec: Arc<dyn Codec>,
    pub(super) keys: KeyCodec,
    pub(super) version: Option<Version>,
}

impl Cache {
    // == Constructors ==
    /// Creates a cache over `store`, scoped to `namespace`, using `JsonCodec`.
    pub fn new(store: Arc<dyn Store>, namespace: impl Into<String>) -> Result<Self> {
        Ok(Self {
            store,
            codec: Arc::new(JsonCodec),
            keys: KeyCodec::new(namespace)?,
            version: None,
        })
    }

    pub fn from_config(store: Arc<dyn Store>, config: &CacheConfig) -> Result<Self> {
        Self::new(store, config.namespace.clone())
    }

    /// Swaps the serialization codec.
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    /// Returns a handle whose operations all target `version`.
    pub fn version(&self, version: impl Into<Version>) -> Self {
        Self {
            version: Some(version.into()),
            ..self.clone()
        }
    }

    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    pub fn current_version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    // == Helpers ==
    pub(super) fn physical_key(&self, key: &str) -> String {
        self.keys.encode(key, self.version.as_ref())
    }

    /// Numbers bypass the codec and are stored as decimal text, the form the
    /// store's increment primitive reads and writes.
    pub(super) fn encode_value(&self, value: &Value) -> Result<Vec<u8>> {
        match Number::from_value(value) {
            Some(number) => number.to_bytes(),
            None => self.codec.encode(value),
        }
    }

    pub(super) fn decode_value(&self, bytes: &[u8]) -> Result<Value> {
        match Number::parse(bytes) {
            Some(number) => Ok(number.into()),
            None => self.codec.decode(bytes),
        }
    }

    /// Decodes an entry fetched under `physical_key`, or `None` if it is
    /// missing or no longer live.
    pub(super) async fn live_value(
        &self,
        physical_key: &str,
        entry: Option<CacheEntry>,
    ) -> Result<Option<Value>> {
        let Some(entry) = entry else {
            return Ok(None);
        };
        let now = current_timestamp_ms();
        if !is_live(entry.expires_at, now) {
            self.purge_expired(physical_key, now).await;
            return Ok(None);
        }
        self.decode_value(&entry.value).map(Some)
    }

    /// Best-effort removal of an entry observed as expired.
    async fn purge_expired(&self, physical_key: &str, now: u64) {
        if let Err(err) = self.store.remove_expired(physical_key, now).await {
            warn!("Failed to remove expired key '{}': {}", physical_key, err);
        }
    }

    // == Get ==
    /// Returns the live value under `key`, or `None` on a miss.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let physical_key = self.physical_key(key);
        let entry = self.store.get(&physical_key).await?;
        let value = self.live_value(&physical_key, entry).await?;
        if value.is_none() {
            debug!("Cache miss for '{}'", physical_key);
        }
        Ok(value)
    }

    /// Like [`Cache::get`] but falls back to `default` on a miss.
    pub async fn get_or(&self, key: &str, default: impl Into<Value>) -> Result<Value> {
        Ok(self.get(key).await?.unwrap_or_else(|| default.into()))
    }

    // == Set ==
    /// Overwrites `key` unconditionally and restarts its TTL.
    pub async fn set(
        &self,
        key: &str,
        value: impl Into<Value>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let bytes = self.encode_value(&value.into())?;
        self.store
            .set(&self.physical_key(key), bytes, stamp(ttl))
            .await
    }

    // == Add ==
    /// Writes only if `key` has no live value. Returns whether it wrote.
    pub async fn add(
        &self,
        key: &str,
        value: impl Into<Value>,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let bytes = self.encode_value(&value.into())?;
        let added = self
            .store
            .set_if_absent(&self.physical_key(key), bytes, stamp(ttl))
            .await?;
        if !added {
            debug!("add skipped, '{}' already holds a live value", key);
        }
        Ok(added)
    }

    // == Get Or Set ==
    /// Returns the live value, or resolves `default`, stores it and returns it.
    ///
    /// Producers run only on a miss. The TTL is stamped after the producer
    /// finishes.
    pub async fn get_or_set(
        &self,
        key: &str,
        default: impl Into<DefaultValue>,
        ttl: Option<Duration>,
    ) -> Result<Value> {
        let physical_key = self.physical_key(key);
        let entry = self.store.get(&physical_key).await?;
        if let Some(value) = self.live_value(&physical_key, entry).await? {
            return Ok(value);
        }

        let value = default.into().resolve().await;
        let bytes = self.encode_value(&value)?;
        self.store.set(&physical_key, bytes, stamp(ttl)).await?;
        Ok(value)
    }

    // == Delete ==
    /// Removes `key`. Deleting a missing key is a no-op.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(&self.physical_key(key)).await?;
        Ok(())
    }

    // == Clear ==
    /// Removes every entry in this namespace, across all versions.
    pub async fn clear(&self) -> Result<()> {
        let removed = self.store.clear_prefix(&self.keys.prefix()).await?;
        info!(
            "Cleared namespace '{}': removed {} entries",
            self.namespace(),
            removed
        );
        Ok(())
    }

    // == Touch ==
    /// Replaces the TTL of a live entry; `None` makes it persistent.
    /// Returns false when there is nothing live to touch.
    pub async fn touch(&self, key: &str, ttl: Option<Duration>) -> Result<bool> {
        self.store
            .expire(&self.physical_key(key), stamp(ttl))
            .await
    }

    // == Incr / Decr ==
    /// Atomically adds `delta` to the stored number and returns the result.
    ///
    /// Fails with `InvalidOperand` when the key is missing or either operand
    /// is not numeric; the stored value is left untouched in that case.
    pub async fn incr(&self, key: &str, delta: impl Into<Value>) -> Result<Number> {
        let delta = numeric_delta(key, delta.into())?;
        self.apply_delta(key, delta).await
    }

    /// `incr` with the negated delta.
    pub async fn decr(&self, key: &str, delta: impl Into<Value>) -> Result<Number> {
        let delta = numeric_delta(key, delta.into())?;
        let negated = delta.checked_neg().ok_or_else(|| {
            CacheError::InvalidOperand(format!("Cannot negate delta {} for '{}'", delta, key))
        })?;
        self.apply_delta(key, negated).await
    }

    async fn apply_delta(&self, key: &str, delta: Number) -> Result<Number> {
        match self.store.incr_by(&self.physical_key(key), delta).await? {
            IncrOutcome::Updated(n) => Ok(n),
            IncrOutcome::Missing => Err(CacheError::InvalidOperand(format!(
                "Key '{}' does not exist",
                key
            ))),
            IncrOutcome::NotNumeric => Err(CacheError::InvalidOperand(format!(
                "Value of '{}' is not numeric",
                key
            ))),
            IncrOutcome::Overflow => Err(CacheError::InvalidOperand(format!(
                "Adding {} to '{}' overflows",
                delta, key
            ))),
        }
    }
}

fn numeric_delta(key: &str, delta: Value) -> Result<Number> {
    Number::from_value(&delta).ok_or_else(|| {
        CacheError::InvalidOperand(format!(
            "Delta for '{}' must be numeric, got {}",
            key,
            delta.kind()
        ))
    })
}

//! Batch Orchestrator
//!
//! Multi-key get/set/delete. Keys are resolved up front and shipped to the
//! store's batch primitives in one call. Batches are not transactional: a
//! failure part-way through leaves an unknown subset applied.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::expiry::stamp;
use crate::cache::Cache;
use crate::error::{CacheError, Result};
use crate::value::Value;

impl Cache {
    // == Get Many ==
    /// Looks up every key. Misses are present in the result as `None`.
    ///
    /// The result is keyed by logical key, so it holds one entry per distinct
    /// key: asking for `["a", "a"]` yields a map of size 1, not 2.
    pub async fn get_many<K: AsRef<str>>(
        &self,
        keys: &[K],
    ) -> Result<HashMap<String, Option<Value>>> {
        let physical_keys: Vec<String> = keys
            .iter()
            .map(|key| self.physical_key(key.as_ref()))
            .collect();
        let entries = self.store.get_many(&physical_keys).await?;
        if entries.len() != physical_keys.len() {
            return Err(CacheError::StoreUnavailable(format!(
                "Store returned {} entries for {} keys",
                entries.len(),
                physical_keys.len()
            )));
        }

        let mut values = HashMap::with_capacity(keys.len());
        for ((key, physical_key), entry) in keys.iter().zip(&physical_keys).zip(entries) {
            let value = self.live_value(physical_key, entry).await?;
            values.insert(key.as_ref().to_string(), value);
        }

        debug!(
            "get_many: {} of {} keys live",
            values.values().filter(|v| v.is_some()).count(),
            values.len()
        );
        Ok(values)
    }

    // == Set Many ==
    /// Writes every pair with one shared TTL.
    ///
    /// All values are encoded before anything is written, so a value that
    /// cannot be serialized aborts the batch with nothing stored.
    pub async fn set_many<I, K, V>(&self, entries: I, ttl: Option<Duration>) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let encoded = entries
            .into_iter()
            .map(|(key, value)| {
                let bytes = self.encode_value(&value.into())?;
                Ok::<_, CacheError>((self.physical_key(key.as_ref()), bytes))
            })
            .collect::<Result<Vec<_>>>()?;
        if encoded.is_empty() {
            return Ok(());
        }

        debug!("set_many: writing {} keys", encoded.len());
        self.store.set_many(encoded, stamp(ttl)).await
    }

    // == Delete Many ==
    /// Removes every key; missing ones are skipped silently.
    pub async fn delete_many<K: AsRef<str>>(&self, keys: &[K]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let physical_keys: Vec<String> = keys
            .iter()
            .map(|key| self.physical_key(key.as_ref()))
            .collect();
        let removed = self.store.delete_many(&physical_keys).await?;
        debug!("delete_many: removed {} of {} keys", removed, keys.len());
        Ok(())
    }
}

//! Configuration Module
//!
//! Handles loading cache client configuration from environment variables.

use std::env;

/// Cache client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Namespace folded into every physical key; `clear()` is scoped to it
    pub namespace: String,
    /// Interval in seconds between `MemoryStore` sweeps, 0 disables sweeping
    pub sweep_interval: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAMESPACE` - Key namespace (default: "cache")
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 0, disabled)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            namespace: env::var("CACHE_NAMESPACE")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.namespace),
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Returns true when a background sweeper should be started.
    pub fn sweeping_enabled(&self) -> bool {
        self.sweep_interval > 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: "cache".to_string(),
            sweep_interval: 0,
        }
    }
}

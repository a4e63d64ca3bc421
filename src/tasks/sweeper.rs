//! Expired Entry Sweeper
//!
//! Background task that periodically removes expired `MemoryStore` entries.
//! Purely space reclamation: reads already treat expired entries as absent.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::store::MemoryStore;

/// Spawns a background task that sweeps expired entries out of `store`.
///
/// The task loops forever, sleeping `sweep_interval_secs` between runs.
/// Abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let store = MemoryStore::new();
/// let sweeper = spawn_sweep_task(store.clone(), 30);
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweep_task(store: MemoryStore, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.sweep_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

/// Starts the sweeper if `config` enables it, returning its handle.
pub fn spawn_configured_sweeper(
    store: MemoryStore,
    config: &CacheConfig,
) -> Option<JoinHandle<()>> {
    if !config.sweeping_enabled() {
        debug!("Expiry sweeper disabled by configuration");
        return None;
    }
    Some(spawn_sweep_task(store, config.sweep_interval))
}

//! Invalidation Sweep Task
//!
//! Background task that periodically runs the cache's invalidation rules.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{PatientCache, Payload};

/// Spawns a background task that sweeps the cache with its invalidation
/// rules every `interval`.
///
/// The task holds only a weak reference, so it ends on its own once the
/// cache is dropped. [`PatientCache::cleanup`] aborts it explicitly.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(PatientCache::new(CacheConfig::default(), store));
/// let handle = spawn_invalidation_task(Arc::downgrade(&cache), Duration::from_secs(300));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_invalidation_task<T: Payload>(
    cache: Weak<PatientCache<T>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting invalidation sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        // Skip the first tick (which fires immediately)
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(cache) = cache.upgrade() else {
                debug!("Cache dropped, stopping invalidation sweep task");
                break;
            };

            let report = cache.apply_invalidation_rules().await;
            debug!(
                "Sweep finished: removed={}, refreshed={}, marked_stale={}",
                report.removed, report.refreshed, report.marked_stale
            );
        }
    })
}

//! Periodic reclamation of expired cache entries.

use super::GeocodeStore;
use crate::clock::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Sweeps `store` every `interval` until the task is aborted.
///
/// Expiry does not depend on this loop; reads already skip stale entries.
/// The sweep only returns memory held by keys nobody asks for anymore.
pub async fn sweep_loop(store: Arc<dyn GeocodeStore>, clock: Arc<dyn Clock>, interval: Duration) {
    cache_info!("(sweep_loop) sweeping every {:?}.", interval);

    let mut ticker = tokio::time::interval(interval);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let removed = store.sweep(clock.now()).await;
        if removed > 0 {
            cache_info!("(sweep_loop) reclaimed {} expired entries.", removed);
        } else {
            cache_debug!("(sweep_loop) nothing to reclaim.");
        }
    }
}

//! Background eviction of reassemblies that never complete.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};

use crate::reassembly::ChunkPool;

/// Sweep loop: evict, then sleep. The first sweep runs immediately; every
/// later one starts `gc_timeout` after the previous sweep finished, so a
/// slow sweep delays the next rather than stacking up.
///
/// Runs until the owning decoder signals shutdown.
pub(crate) async fn run(
    pool: Arc<Mutex<ChunkPool>>,
    chunk_timeout: Duration,
    gc_timeout: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let evicted = pool.lock().await.evict_expired(chunk_timeout);
        if evicted > 0 {
            tracing::debug!(evicted, "reaper sweep evicted stale reassemblies");
        }

        tokio::select! {
            _ = shutdown.recv() => {
                tracing::debug!("reaper shutting down");
                return;
            }
            _ = tokio::time::sleep(gc_timeout) => {}
        }
    }
}

//! TTL Cleanup Task
//!
//! Background task that periodically removes expired in-process entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ExpiringMap;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task loops forever, sleeping for `interval` between sweeps and taking
/// the write lock only for the sweep itself. It must be spawned from within a
/// tokio runtime.
///
/// # Returns
/// A JoinHandle for the spawned task. The owning store aborts it on close.
///
/// # Example
/// ```ignore
/// let entries = Arc::new(RwLock::new(ExpiringMap::new()));
/// let cleanup_handle = spawn_cleanup_task(entries.clone(), Duration::from_secs(300));
/// // Later, on close:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(entries: Arc<RwLock<ExpiringMap>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = entries.write().await;
                guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

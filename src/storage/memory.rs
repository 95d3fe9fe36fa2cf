//! In-process expiring storage.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::ExpiringMap;
use crate::config::MemoryStorageConfig;
use crate::error::Result;
use crate::storage::Storage;
use crate::tasks::spawn_cleanup_task;

// == Memory Storage ==
/// Storage backed by a process-local map with absolute expiry per entry.
///
/// Reads never return an expired entry. When a cleanup interval is configured
/// a sweep task also evicts expired entries in the background; the task is
/// aborted on `close` or when the store is dropped.
#[derive(Debug)]
pub struct MemoryStorage {
    entries: Arc<RwLock<ExpiringMap>>,
    ttl: Duration,
    cleanup: Mutex<Option<JoinHandle<()>>>,
}

impl MemoryStorage {
    /// Creates the store and, if configured, starts its sweep task.
    ///
    /// The sweep needs a tokio runtime. Outside one it is skipped with a
    /// warning; reads still honour expiry.
    pub fn new(config: MemoryStorageConfig) -> Self {
        let entries = Arc::new(RwLock::new(ExpiringMap::new()));

        let cleanup = config.cleanup_interval().and_then(|interval| {
            if Handle::try_current().is_err() {
                warn!("No tokio runtime available, periodic cleanup disabled");
                return None;
            }
            Some(spawn_cleanup_task(entries.clone(), interval))
        });

        Self {
            entries,
            ttl: config.ttl(),
            cleanup: Mutex::new(cleanup),
        }
    }

    /// Whether a sweep task is currently scheduled.
    pub fn has_cleanup_task(&self) -> bool {
        self.cleanup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn stop_cleanup(&self) {
        let handle = self
            .cleanup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("TTL cleanup task stopped");
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(MemoryStorageConfig::default())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.write().await.get(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries
            .write()
            .await
            .set(key.to_string(), value, self.ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.delete(key);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.stop_cleanup();
        Ok(())
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }
}

impl Drop for MemoryStorage {
    fn drop(&mut self) {
        self.stop_cleanup();
    }
}

//! Memoizer Module
//!
//! Caches the results of async generators under hashed identifiers, with
//! per-instance clear/cache rules and hit/miss statistics.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::key::{cache_key, canonicalize};
use crate::cache::{CacheStats, Rules};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::storage::{MemoryStorage, Storage};

// == Memoizer ==
/// Memoizes async computations over a [`Storage`] backend.
///
/// All methods take `&self`; share a memoizer between tasks with an `Arc`.
/// There is no single-flight protection: concurrent misses on the same
/// identifier each run their generator and each write the result.
pub struct Memoizer<S: Storage = MemoryStorage> {
    storage: S,
    rules: RwLock<Rules>,
    stats: Option<Mutex<CacheStats>>,
}

impl Memoizer<MemoryStorage> {
    /// Creates a memoizer over a fresh in-process store built from `config`.
    ///
    /// With a non-zero cleanup interval the store spawns its sweep task, so
    /// call this from within a tokio runtime.
    pub fn new(config: CacheConfig) -> Self {
        let storage = MemoryStorage::new(config.memory_storage());
        Self::with_storage(config, storage)
    }
}

impl<S: Storage> Memoizer<S> {
    /// Creates a memoizer that owns `storage`.
    ///
    /// `config.ttl_seconds` overrides the TTL the storage was configured with:
    /// it is written through [`Storage::set_ttl`] before the storage is first
    /// used. `config.cleanup_interval_minutes` is ignored here.
    pub fn with_storage(config: CacheConfig, mut storage: S) -> Self {
        storage.set_ttl(config.ttl());
        Self {
            storage,
            rules: RwLock::new(Rules::default()),
            stats: config.enable_stats.then(|| Mutex::new(CacheStats::new())),
        }
    }

    /// Returns the cached value for `identifier`, or runs `generator` and caches its result.
    ///
    /// In order:
    /// 1. If the clear rule matches, the stored entry is deleted and the
    ///    generator's result is returned without being stored.
    /// 2. If the cache rule rejects the identifier, storage is not touched.
    /// 3. Otherwise a stored value is returned as a hit, or the generator runs
    ///    and its result is stored.
    ///
    /// The generator runs at most once. Its error is returned unchanged and
    /// nothing is stored. Storage and encoding failures are converted into `E`.
    pub async fn cache<I, T, E, F, Fut>(
        &self,
        identifier: &I,
        generator: F,
    ) -> std::result::Result<T, E>
    where
        I: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let canonical = canonicalize(identifier)?;
        let rules = self.rules();

        if rules.should_clear(&canonical) {
            let key = cache_key(&canonical)?;
            self.storage.delete(&key).await?;
            debug!(key = %key, "cache cleared by rule");
            self.record_miss();
            return generator().await;
        }

        if !rules.should_cache(&canonical) {
            debug!("cache bypassed by rule");
            self.record_miss();
            return generator().await;
        }

        let key = cache_key(&canonical)?;
        if let Some(value) = self.storage.get(&key).await? {
            debug!(key = %key, "cache hit");
            self.record_hit();
            return Ok(decode(value)?);
        }

        debug!(key = %key, "cache miss");
        self.record_miss();

        let content = generator().await?;
        let encoded = serde_json::to_value(&content).map_err(CacheError::from)?;
        self.storage.set(&key, encoded).await?;

        Ok(content)
    }

    /// Deletes the stored entry for `identifier` regardless of rules.
    pub async fn clear<I: Serialize + ?Sized>(&self, identifier: &I) -> Result<()> {
        let key = self.key_for(identifier)?;
        self.storage.delete(&key).await
    }

    /// The storage key `identifier` maps to.
    pub fn key_for<I: Serialize + ?Sized>(&self, identifier: &I) -> Result<String> {
        cache_key(&canonicalize(identifier)?)
    }

    /// Replaces the clear rule for every subsequent call.
    pub fn set_rule_clear<P>(&self, rule: P)
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_clear(Arc::new(rule));
    }

    /// Replaces the cache rule for every subsequent call.
    pub fn set_rule_cache<P>(&self, rule: P)
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_cache(Arc::new(rule));
    }

    /// Snapshot of the counters, `None` when stats are disabled.
    pub fn stats(&self) -> Option<CacheStats> {
        self.stats
            .as_ref()
            .map(|stats| *stats.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Closes the owned storage.
    pub async fn close(&self) -> Result<()> {
        self.storage.close().await
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn rules(&self) -> Rules {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record_hit(&self) {
        if let Some(stats) = &self.stats {
            stats.lock().unwrap_or_else(PoisonError::into_inner).record_hit();
        }
    }

    fn record_miss(&self) {
        if let Some(stats) = &self.stats {
            stats.lock().unwrap_or_else(PoisonError::into_inner).record_miss();
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

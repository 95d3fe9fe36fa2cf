//! Expiring Map Module
//!
//! The synchronous key -> (value, expiry) map behind the in-process storage.
//! Expired entries are evicted lazily on read and in bulk by `cleanup_expired`.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::cache::CacheEntry;

// == Expiring Map ==
#[derive(Debug, Default)]
pub struct ExpiringMap {
    entries: HashMap<String, CacheEntry>,
}

impl ExpiringMap {
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a value that expires `ttl` from now, overwriting any prior entry.
    pub fn set(&mut self, key: String, value: Value, ttl: Duration) {
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// An entry found past its expiry is removed and reported as absent, whether
    /// or not a sweep has run.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the map.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Number of stored entries, counting expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn test_map_new() {
        let map = ExpiringMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_set_and_get() {
        let mut map = ExpiringMap::new();

        map.set("key1".to_string(), json!({"a": [1, 2]}), TTL);

        assert_eq!(map.get("key1"), Some(json!({"a": [1, 2]})));
        assert_eq!(map.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_get_nonexistent() {
        let mut map = ExpiringMap::new();
        assert!(map.get("nonexistent").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_delete() {
        let mut map = ExpiringMap::new();

        map.set("key1".to_string(), json!("value1"), TTL);
        assert!(map.delete("key1"));

        assert!(map.is_empty());
        assert!(map.get("key1").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_delete_nonexistent() {
        let mut map = ExpiringMap::new();
        assert!(!map.delete("nonexistent"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_overwrite_resets_expiry() {
        let mut map = ExpiringMap::new();

        map.set("key1".to_string(), json!("value1"), Duration::from_secs(2));
        tokio::time::advance(Duration::from_secs(1)).await;
        map.set("key1".to_string(), json!("value2"), Duration::from_secs(2));
        tokio::time::advance(Duration::from_millis(1500)).await;

        assert_eq!(map.get("key1"), Some(json!("value2")));
        assert_eq!(map.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_lazy_expiration() {
        let mut map = ExpiringMap::new();

        map.set("key1".to_string(), json!("value1"), Duration::from_secs(1));
        assert!(map.get("key1").is_some());

        tokio::time::advance(Duration::from_millis(1100)).await;

        // Still physically present until read
        assert_eq!(map.len(), 1);
        assert!(map.get("key1").is_none());
        assert_eq!(map.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_cleanup_expired() {
        let mut map = ExpiringMap::new();

        map.set("key1".to_string(), json!("value1"), Duration::from_secs(1));
        map.set("key2".to_string(), json!("value2"), Duration::from_secs(10));

        tokio::time::advance(Duration::from_millis(1100)).await;

        let removed = map.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(map.len(), 1);
        assert!(map.get("key2").is_some());
    }
}

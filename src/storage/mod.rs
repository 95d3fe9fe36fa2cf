//! Storage Module
//!
//! The backend contract the memoizer delegates to, and its two implementations:
//! an in-process expiring map and a Redis-backed store.

mod memory;
mod redis_store;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use self::memory::MemoryStorage;
pub use self::redis_store::{KeyValueClient, RedisStorage};

// == Storage Contract ==
/// Key/value storage with a per-store TTL.
///
/// Implementations must treat expired entries as absent, make `delete` of an
/// absent key succeed, and allow `close` on a store that was never used.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetches a live value.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores a value for this store's TTL, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes a value if present.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Releases background tasks and connections.
    async fn close(&self) -> Result<()>;

    /// Lifetime given to entries written by `set`.
    fn ttl(&self) -> Duration;

    fn set_ttl(&mut self, ttl: Duration);
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Box<S> {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }

    fn ttl(&self) -> Duration {
        (**self).ttl()
    }

    fn set_ttl(&mut self, ttl: Duration) {
        (**self).set_ttl(ttl)
    }
}

//! Redis-backed storage.
//!
//! Values are written as JSON text under `prefix + key` with `SET .. EX`, so the
//! server enforces expiry and nothing about it is tracked locally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RedisStorageConfig;
use crate::error::{CacheError, Result};
use crate::storage::Storage;

// == Client Interface ==
/// The subset of a remote key/value client the store needs.
///
/// Implemented for `redis::aio::ConnectionManager`; any other client that can
/// get, set with expiry and delete string values can stand in for it.
#[async_trait]
pub trait KeyValueClient: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` with a server-side expiry of `ttl_seconds`.
    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;

    async fn del(&self, key: &str) -> Result<()>;

    /// Ends the session with the server.
    async fn quit(&self) -> Result<()>;
}

#[async_trait]
impl KeyValueClient for ConnectionManager {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.clone();
        let value: Option<String> = AsyncCommands::get(&mut conn, key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.clone();
        let _: () = AsyncCommands::set_ex(&mut conn, key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.clone();
        let _: () = AsyncCommands::del(&mut conn, key).await?;
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        let mut conn = self.clone();
        let _: () = redis::cmd("QUIT").query_async(&mut conn).await?;
        Ok(())
    }
}

// == Redis Storage ==
/// Storage delegating to a remote Redis server.
///
/// The store owns its client: `close` quits the session, after which every
/// operation fails with [`CacheError::Closed`]. Connection failures always
/// surface as errors and are never reported as a missing value.
pub struct RedisStorage<C: KeyValueClient = ConnectionManager> {
    client: C,
    prefix: String,
    ttl: Duration,
    closed: AtomicBool,
}

impl RedisStorage<ConnectionManager> {
    /// Opens and connects a client for `config.url`.
    pub async fn connect(config: RedisStorageConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let manager = ConnectionManager::new(client).await?;
        debug!(url = %config.url, "Connected to Redis");
        Ok(Self::new(manager, config))
    }
}

impl<C: KeyValueClient> RedisStorage<C> {
    /// Wraps an already connected client. `config.url` is ignored.
    pub fn new(client: C, config: RedisStorageConfig) -> Self {
        let ttl = config.ttl();
        Self {
            client,
            prefix: config.prefix,
            ttl,
            closed: AtomicBool::new(false),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn remote_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Whole seconds for `EX`, rounded up. Redis rejects an expiry of 0.
    fn expiry_seconds(&self) -> u64 {
        let secs = self.ttl.as_secs();
        let secs = if self.ttl.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        };
        secs.max(1)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl<C: KeyValueClient> Storage for RedisStorage<C> {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.ensure_open()?;
        let remote_key = self.remote_key(key);
        let data = self.client.get(&remote_key).await.inspect_err(|e| {
            warn!(key = %remote_key, error = %e, "Redis GET error");
        })?;

        match data {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.ensure_open()?;
        let remote_key = self.remote_key(key);
        let text = serde_json::to_string(&value)?;
        self.client
            .set_ex(&remote_key, text, self.expiry_seconds())
            .await
            .inspect_err(|e| {
                warn!(key = %remote_key, error = %e, "Redis SET error");
            })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_open()?;
        let remote_key = self.remote_key(key);
        self.client.del(&remote_key).await.inspect_err(|e| {
            warn!(key = %remote_key, error = %e, "Redis DEL error");
        })
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.client.quit().await
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }
}

//! Configuration Module
//!
//! Configuration for the memoizer and its storage backends, loadable from
//! environment variables.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default entry lifetime in seconds, shared by every component.
pub const DEFAULT_TTL_SECONDS: u64 = 60;

/// Default key namespace for the Redis store.
pub const DEFAULT_REDIS_PREFIX: &str = "st:";

/// Default Redis endpoint used when the store builds its own client.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// == Memoizer Config ==
/// Memoizer configuration.
///
/// `ttl_seconds` is written onto whatever storage the memoizer owns, including
/// a caller-supplied one. `cleanup_interval_minutes` only applies to the
/// default in-process store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached value in seconds
    pub ttl_seconds: u64,
    /// Sweep interval of the default in-process store, 0 disables sweeping
    pub cleanup_interval_minutes: u64,
    /// Track hit/miss counters
    pub enable_stats: bool,
}

impl CacheConfig {
    /// Loads the memoizer configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_TTL_SECONDS` - Entry lifetime in seconds (default: 60)
    /// - `MEMO_CLEANUP_INTERVAL_MINUTES` - Sweep interval, 0 disables (default: 5)
    /// - `MEMO_ENABLE_STATS` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_seconds: env_or("MEMO_TTL_SECONDS", defaults.ttl_seconds),
            cleanup_interval_minutes: env_or(
                "MEMO_CLEANUP_INTERVAL_MINUTES",
                defaults.cleanup_interval_minutes,
            ),
            enable_stats: env_or("MEMO_ENABLE_STATS", defaults.enable_stats),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// The default in-process store built from this config.
    pub fn memory_storage(&self) -> MemoryStorageConfig {
        MemoryStorageConfig {
            ttl_seconds: self.ttl_seconds,
            cleanup_interval_minutes: self.cleanup_interval_minutes,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            cleanup_interval_minutes: 5,
            enable_stats: true,
        }
    }
}

// == In-Process Store Config ==
/// In-process expiring store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStorageConfig {
    /// Lifetime of an entry in seconds
    pub ttl_seconds: u64,
    /// Interval between expiry sweeps, 0 disables the sweep task
    pub cleanup_interval_minutes: u64,
}

impl MemoryStorageConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Returns `None` when sweeping is disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_minutes > 0)
            .then(|| Duration::from_secs(self.cleanup_interval_minutes.saturating_mul(60)))
    }
}

impl Default for MemoryStorageConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            cleanup_interval_minutes: 0,
        }
    }
}

// == Redis Store Config ==
/// Redis-backed store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisStorageConfig {
    /// Endpoint used only when the store opens its own connection
    pub url: String,
    /// Namespace prepended to every key
    pub prefix: String,
    /// Server-side expiry in seconds
    pub ttl_seconds: u64,
}

impl RedisStorageConfig {
    /// Loads the Redis store configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_REDIS_URL` - Redis endpoint (default: `redis://127.0.0.1:6379/`)
    /// - `MEMO_REDIS_PREFIX` - Key namespace (default: `st:`)
    /// - `MEMO_TTL_SECONDS` - Entry lifetime in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env::var("MEMO_REDIS_URL").unwrap_or(defaults.url),
            prefix: env::var("MEMO_REDIS_PREFIX").unwrap_or(defaults.prefix),
            ttl_seconds: env_or("MEMO_TTL_SECONDS", defaults.ttl_seconds),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for RedisStorageConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            prefix: DEFAULT_REDIS_PREFIX.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

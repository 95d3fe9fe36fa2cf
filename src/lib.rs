//! Memo Cache - A generic async memoization cache
//!
//! Memoizes the results of async generators under hashed identifiers, storing
//! them in a process-local expiring map or in Redis with server-side expiry.

pub mod cache;
pub mod config;
pub mod error;
pub mod storage;
pub mod tasks;

pub use cache::{hash_identifier, CacheStats, Memoizer};
pub use config::{CacheConfig, MemoryStorageConfig, RedisStorageConfig};
pub use error::{CacheError, Result};
pub use storage::{KeyValueClient, MemoryStorage, RedisStorage, Storage};

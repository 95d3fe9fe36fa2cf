//! Error types for the memoization cache
//!
//! Provides unified storage error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Failure raised by a storage backend or by value encoding.
///
/// Generator failures never pass through this type: `Memoizer::cache` returns the
/// caller's own error unchanged and only converts these variants into it.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Remote store I/O or protocol failure
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Identifier or value could not be encoded, or a stored payload could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation attempted on a storage that has already been closed
    #[error("Storage is closed")]
    Closed,

    /// Free-form failure reported by a third-party backend
    #[error("Storage error: {0}")]
    Storage(String),
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, CacheError>;

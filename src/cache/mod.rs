//! Cache Module
//!
//! The memoizer together with identifier hashing, rules, statistics and the
//! expiring map used by the in-process storage.

mod entry;
pub mod key;
mod memoizer;
mod rules;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::hash_identifier;
pub use memoizer::Memoizer;
pub use rules::{Rule, Rules};
pub use stats::CacheStats;
pub use store::ExpiringMap;

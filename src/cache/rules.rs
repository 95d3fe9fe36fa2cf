//! Cache Rules Module
//!
//! Per-call predicates deciding whether a memoized value is force-cleared or
//! bypassed. Predicates see the canonical form of the identifier.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A predicate over a canonical identifier.
pub type Rule = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

// == Rules ==
/// The clear/cache rule pair owned by one memoizer.
#[derive(Clone)]
pub struct Rules {
    clear: Rule,
    cache: Rule,
}

impl Rules {
    /// When true, the stored entry is evicted and the generator result is not stored.
    pub fn should_clear(&self, identifier: &Value) -> bool {
        (self.clear)(identifier)
    }

    /// When false, storage is bypassed entirely.
    pub fn should_cache(&self, identifier: &Value) -> bool {
        (self.cache)(identifier)
    }

    pub fn set_clear(&mut self, rule: Rule) {
        self.clear = rule;
    }

    pub fn set_cache(&mut self, rule: Rule) {
        self.cache = rule;
    }
}

impl Default for Rules {
    /// Never clear, always cache.
    fn default() -> Self {
        Self {
            clear: Arc::new(|_: &Value| false),
            cache: Arc::new(|_: &Value| true),
        }
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules").finish_non_exhaustive()
    }
}

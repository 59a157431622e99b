//! Compile cache for patterns supplied at validation time (`regex:<pattern>`).

use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// Maximum accepted pattern length, in bytes.
pub(crate) const MAX_PATTERN_LEN: usize = 1000;

/// Maximum number of compiled patterns kept (simple first-key eviction).
pub(crate) const MAX_CACHE_SIZE: usize = 100;

/// Bounded map from pattern source to compiled regex.
#[derive(Debug, Default)]
pub(crate) struct PatternCache {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl PatternCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled pattern, compiling and caching it on first use.
    ///
    /// Oversized or invalid patterns yield `None` and are never cached.
    pub(crate) fn get(&self, pattern: &str) -> Option<Regex> {
        if pattern.len() > MAX_PATTERN_LEN {
            warn!(
                len = pattern.len(),
                max = MAX_PATTERN_LEN,
                "regex rule pattern too long"
            );
            return None;
        }

        let mut cache = self.compiled.lock();
        if let Some(regex) = cache.get(pattern) {
            // Regex clones share the compiled program.
            return Some(regex.clone());
        }

        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(error) => {
                warn!(pattern, %error, "regex rule pattern does not compile");
                return None;
            }
        };

        if cache.len() >= MAX_CACHE_SIZE {
            if let Some(key) = cache.keys().next().cloned() {
                cache.remove(&key);
            }
        }
        cache.insert(pattern.to_owned(), regex.clone());
        Some(regex)
    }

    /// Number of cached patterns.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.compiled.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_compiled_patterns() {
        let cache = PatternCache::new();
        assert!(cache.get("^a+$").is_some_and(|re| re.is_match("aaa")));
        assert!(cache.get("^a+$").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalid_and_oversized_patterns_are_not_cached() {
        let cache = PatternCache::new();
        assert!(cache.get("(").is_none());
        assert!(cache.get(&"a".repeat(MAX_PATTERN_LEN + 1)).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn cache_is_bounded() {
        let cache = PatternCache::new();
        for i in 0..MAX_CACHE_SIZE + 10 {
            assert!(cache.get(&format!("pattern_{i}")).is_some());
        }
        assert!(cache.len() <= MAX_CACHE_SIZE);
    }
}

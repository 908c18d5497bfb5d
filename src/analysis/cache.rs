/*!
 * Analysis result caching.
 *
 * Results are keyed by the trimmed sentence text and its trimmed neighbours,
 * so the same sentence in a different context is analysed again.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

use crate::sentences::SentenceContext;
use super::AnalysisResult;

/// Cache key combining sentence text and context
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    prev: String,
    next: String,
}

impl CacheKey {
    fn new(context: &SentenceContext) -> Self {
        Self {
            text: context.text.trim().to_string(),
            prev: context.prev.trim().to_string(),
            next: context.next.trim().to_string(),
        }
    }
}

/// Shared cache of analysis results
pub struct AnalysisCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, AnalysisResult>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl AnalysisCache {
    /// Create a new analysis cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Get a result from the cache
    pub fn get(&self, context: &SentenceContext) -> Option<AnalysisResult> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(context);
        let cache = self.cache.read();

        match cache.get(&key) {
            Some(result) => {
                *self.hits.write() += 1;
                debug!("Analysis cache hit for '{}'", truncate_text(&key.text, 30));
                Some(result.clone())
            }
            None => {
                *self.misses.write() += 1;
                debug!("Analysis cache miss for '{}'", truncate_text(&key.text, 30));
                None
            }
        }
    }

    /// Store a result in the cache
    pub fn store(&self, context: &SentenceContext, result: &AnalysisResult) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(context);
        self.cache.write().insert(key, result.clone());
    }

    /// Get cache statistics: hits, misses and hit rate
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache and its counters
    pub fn clear(&self) {
        self.cache.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;
        debug!("Analysis cache cleared");
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl std::fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("entries", &self.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Clone for AnalysisCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}

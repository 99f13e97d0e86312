/*!
 * Per-resource localization cache.
 *
 * Each resource gets one `ResourceCache` holding a point-in-time copy of
 * its records, keyed by `"{key}.{culture}"`. Reads are lock-free; reloads
 * publish a complete new map atomically, and single-entry writes go
 * through copy-on-write, so readers never see a partially written map.
 */

use arc_swap::ArcSwap;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Build the cache key for a key and culture
pub fn cache_key(key: &str, culture: &str) -> String {
    format!("{}.{}", key, culture)
}

/// Cache of one resource's localized texts
pub struct ResourceCache {
    /// Resource this cache mirrors
    resource_key: String,

    /// Current entry map
    entries: ArcSwap<HashMap<String, String>>,

    /// Cache hit counter
    hits: AtomicU64,

    /// Cache miss counter
    misses: AtomicU64,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

impl ResourceCache {
    /// Create a cache for `resource_key` holding `entries`
    pub fn new(resource_key: impl Into<String>, entries: HashMap<String, String>) -> Self {
        Self {
            resource_key: resource_key.into(),
            entries: ArcSwap::from_pointee(entries),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn resource_key(&self) -> &str {
        &self.resource_key
    }

    /// Get the text for a key and culture
    pub fn lookup(&self, key: &str, culture: &str) -> Option<String> {
        let computed = cache_key(key, culture);

        match self.entries.load().get(&computed) {
            Some(text) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(text.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss for '{}' in resource '{}'", computed, self.resource_key);
                None
            }
        }
    }

    /// Replace the whole content with a freshly loaded map
    pub fn reload(&self, entries: HashMap<String, String>) {
        let count = entries.len();
        self.entries.store(Arc::new(entries));
        debug!("Reloaded resource '{}' with {} entries", self.resource_key, count);
    }

    /// Insert or overwrite one entry
    pub fn put(&self, key: &str, culture: &str, text: &str) {
        let computed = cache_key(key, culture);

        self.entries.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(computed.clone(), text.to_string());
            next
        });
    }

    /// Overwrite an entry only if it is already cached
    ///
    /// Returns whether the entry existed.
    pub fn update_existing(&self, key: &str, culture: &str, text: &str) -> bool {
        let computed = cache_key(key, culture);

        if !self.entries.load().contains_key(&computed) {
            return false;
        }

        let mut updated = false;
        self.entries.rcu(|current| {
            let mut next = HashMap::clone(current);
            updated = match next.get_mut(&computed) {
                Some(existing) => {
                    *existing = text.to_string();
                    true
                }
                // Removed by a concurrent reload
                None => false,
            };
            next
        });

        updated
    }

    /// Whether an entry is cached for the key and culture
    pub fn contains(&self, key: &str, culture: &str) -> bool {
        self.entries.load().contains_key(&cache_key(key, culture))
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("resource_key", &self.resource_key)
            .field("entries", &self.len())
            .finish()
    }
}

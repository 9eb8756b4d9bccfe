//! Bounded URL -> extracted-text cache

use std::collections::HashMap;
use std::sync::Mutex;

/// Caches article extraction results across runs
///
/// Empty strings are cached too, so a URL that yielded nothing is never
/// fetched twice. When the cache is full, roughly an eighth of the entries
/// are evicted; iteration order of the underlying map makes the victim set
/// arbitrary rather than least-recently-used.
pub struct ExtractionCache {
    entries: Mutex<HashMap<String, String>>,
    capacity: usize,
}

impl ExtractionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn get(&self, url: &str) -> Option<String> {
        self.entries.lock().unwrap().get(url).cloned()
    }

    pub fn insert(&self, url: &str, text: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= self.capacity && !entries.contains_key(url) {
            let victims: Vec<String> = entries
                .keys()
                .take(self.capacity / 8 + 1)
                .cloned()
                .collect();
            tracing::debug!("Extraction cache full, evicting {} entries", victims.len());
            for victim in victims {
                entries.remove(&victim);
            }
        }
        entries.insert(url.to_string(), text.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = ExtractionCache::new(16);
        cache.insert("https://example.com/a", "text a");
        assert_eq!(cache.get("https://example.com/a").as_deref(), Some("text a"));
        assert!(cache.get("https://example.com/b").is_none());
    }

    #[test]
    fn test_empty_results_are_cached() {
        let cache = ExtractionCache::new(16);
        cache.insert("https://example.com/empty", "");
        assert_eq!(cache.get("https://example.com/empty").as_deref(), Some(""));
    }

    #[test]
    fn test_eviction_keeps_cache_bounded() {
        let cache = ExtractionCache::new(8);
        for i in 0..100 {
            cache.insert(&format!("https://example.com/{i}"), "t");
        }
        assert!(cache.len() <= 8);
    }

    #[test]
    fn test_reinserting_existing_key_does_not_evict() {
        let cache = ExtractionCache::new(4);
        for i in 0..4 {
            cache.insert(&format!("https://example.com/{i}"), "t");
        }
        cache.insert("https://example.com/0", "updated");
        assert_eq!(cache.len(), 4);
        assert_eq!(
            cache.get("https://example.com/0").as_deref(),
            Some("updated")
        );
    }
}

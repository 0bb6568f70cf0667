//! TTL-bounded cache for detection results.
//!
//! Keys are the raw text when short, or a SHA-256 digest when long, so a
//! pathological caller cannot grow keys without bound. Expired entries are
//! treated as misses and purged lazily; compaction runs inline once the
//! entry count crosses the configured ceiling. There is no background task.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Cache interface shared by the real cache and the disabled no-op mode.
pub trait ResultCache<V>: Send + Sync
where
    V: Clone + Send + Sync,
{
    /// Look up a prior result for this text. Expired entries are misses.
    fn get(&self, text: &str) -> Option<V>;

    /// Store a result for this text.
    fn put(&self, text: &str, value: V);

    /// Current number of stored entries (including not-yet-purged expired ones).
    fn len(&self) -> usize;

    /// Drop every entry.
    fn clear(&self);
}

/// Disabled-cache mode: every lookup misses, every store is dropped.
pub struct NoopCache;

impl<V: Clone + Send + Sync> ResultCache<V> for NoopCache {
    fn get(&self, _text: &str) -> Option<V> {
        None
    }

    fn put(&self, _text: &str, _value: V) {}

    fn len(&self) -> usize {
        0
    }

    fn clear(&self) {}
}

struct Entry<V> {
    value: V,
    inserted: Instant,
}

/// In-memory TTL cache safe for concurrent `get`/`put`.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Duration,
    max_entries: usize,
    key_max_len: usize,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    /// Build a cache with the given TTL, compaction ceiling, and raw-key
    /// length threshold.
    pub fn new(ttl: Duration, max_entries: usize, key_max_len: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries,
            key_max_len,
        }
    }

    /// Raw text for short inputs, digest for long ones, to bound key memory.
    fn key(&self, text: &str) -> String {
        if text.len() <= self.key_max_len {
            text.to_string()
        } else {
            hex::encode(Sha256::digest(text.as_bytes()))
        }
    }

    /// Drop expired entries; if the map is still over the ceiling, evict the
    /// oldest entries until it fits.
    fn compact(map: &mut HashMap<String, Entry<V>>, ttl: Duration, max_entries: usize) {
        map.retain(|_, entry| entry.inserted.elapsed() < ttl);

        if map.len() > max_entries {
            let mut by_age: Vec<(String, Instant)> = map
                .iter()
                .map(|(k, e)| (k.clone(), e.inserted))
                .collect();
            by_age.sort_by_key(|(_, inserted)| *inserted);

            let excess = map.len() - max_entries;
            for (key, _) in by_age.into_iter().take(excess) {
                map.remove(&key);
            }
        }
    }
}

impl<V: Clone + Send + Sync> ResultCache<V> for TtlCache<V> {
    fn get(&self, text: &str) -> Option<V> {
        let key = self.key(text);

        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(&key) {
                Some(entry) if entry.inserted.elapsed() < self.ttl => {
                    return Some(entry.value.clone());
                }
                Some(_) => {} // expired, purge below
                None => return None,
            }
        }

        // Lazy purge of the expired entry under a write lock.
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries
            .get(&key)
            .is_some_and(|e| e.inserted.elapsed() >= self.ttl)
        {
            entries.remove(&key);
        }
        None
    }

    fn put(&self, text: &str, value: V) {
        let key = self.key(text);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());

        entries.insert(
            key,
            Entry {
                value,
                inserted: Instant::now(),
            },
        );

        if entries.len() > self.max_entries {
            Self::compact(&mut entries, self.ttl, self.max_entries);
        }
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_ms: u64, max_entries: usize) -> TtlCache<String> {
        TtlCache::new(Duration::from_millis(ttl_ms), max_entries, 64)
    }

    // ==================== Hit/Miss Tests ====================

    #[test]
    fn test_put_then_get() {
        let cache = cache(10_000, 100);
        cache.put("hello world", "en".to_string());
        assert_eq!(cache.get("hello world"), Some("en".to_string()));
        assert_eq!(cache.get("something else"), None);
    }

    #[test]
    fn test_expired_entry_is_a_miss_and_purged() {
        let cache = cache(20, 100);
        cache.put("hello", "en".to_string());
        std::thread::sleep(Duration::from_millis(40));

        assert_eq!(cache.get("hello"), None);
        assert_eq!(cache.len(), 0, "expired entry purged on access");
    }

    #[test]
    fn test_overwrite_refreshes_value() {
        let cache = cache(10_000, 100);
        cache.put("hello", "en".to_string());
        cache.put("hello", "es".to_string());
        assert_eq!(cache.get("hello"), Some("es".to_string()));
        assert_eq!(cache.len(), 1);
    }

    // ==================== Key Digest Tests ====================

    #[test]
    fn test_long_text_uses_digest_key() {
        let cache = cache(10_000, 100);
        let long_text = "a".repeat(500);
        cache.put(&long_text, "en".to_string());

        assert_eq!(cache.get(&long_text), Some("en".to_string()));
        // The stored key is the digest, not the text
        let entries = cache.entries.read().unwrap();
        let key = entries.keys().next().unwrap();
        assert_eq!(key.len(), 64, "SHA-256 hex digest");
    }

    #[test]
    fn test_short_text_uses_raw_key() {
        let cache = cache(10_000, 100);
        cache.put("short", "en".to_string());
        let entries = cache.entries.read().unwrap();
        assert!(entries.contains_key("short"));
    }

    // ==================== Compaction Tests ====================

    #[test]
    fn test_compaction_keeps_size_bounded() {
        let cache = cache(10_000, 10);
        for i in 0..50 {
            cache.put(&format!("text-{}", i), "en".to_string());
        }
        assert!(cache.len() <= 10, "len {} exceeds ceiling", cache.len());
    }

    #[test]
    fn test_compaction_drops_expired_first() {
        let cache = cache(30, 5);
        for i in 0..5 {
            cache.put(&format!("old-{}", i), "en".to_string());
        }
        std::thread::sleep(Duration::from_millis(60));

        cache.put("fresh", "es".to_string());
        // Over the ceiling now; compaction removes the expired entries
        cache.put("fresh-2", "es".to_string());

        assert_eq!(cache.get("fresh"), Some("es".to_string()));
        assert_eq!(cache.get("old-0"), None);
    }

    #[test]
    fn test_clear() {
        let cache = cache(10_000, 100);
        cache.put("a", "en".to_string());
        cache.put("b", "es".to_string());
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get("a"), None);
    }

    // ==================== No-op Mode Tests ====================

    #[test]
    fn test_noop_cache_never_hits() {
        let cache = NoopCache;
        ResultCache::<String>::put(&cache, "hello", "en".to_string());
        assert_eq!(ResultCache::<String>::get(&cache, "hello"), None);
        assert_eq!(ResultCache::<String>::len(&cache), 0);
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_concurrent_get_put() {
        use std::sync::Arc;

        let cache = Arc::new(cache(10_000, 1_000));
        let mut handles = Vec::new();

        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("text-{}-{}", t, i);
                    cache.put(&key, format!("v{}", i));
                    assert_eq!(cache.get(&key), Some(format!("v{}", i)));
                }
            }));
        }

        for handle in handles {
            handle.join().expect("no panics");
        }
        assert!(cache.len() <= 1_000 + 1);
    }
}

use crate::store::{StoreStats, TtlCache, TtlCacheConfig};
use std::time::Duration;

/// Fixed freshness window for cached map styles.
pub const STYLE_TTL: Duration = Duration::from_secs(30 * 60);

/// A handful of themes is all a session ever touches.
const STYLE_CAPACITY: usize = 20;

/// Cache for map style documents, keyed by style identifier.
///
/// Same expiry and eviction mechanics as [`TtlCache`], specialized: styles
/// are not request-shaped, so there is no per-entry TTL branching — every
/// entry lives [`STYLE_TTL`].
pub struct StyleCache<V> {
    inner: TtlCache<V>,
}

impl<V: Clone> StyleCache<V> {
    pub fn new() -> Self {
        Self {
            inner: TtlCache::new(TtlCacheConfig {
                default_ttl: STYLE_TTL,
                max_entries: STYLE_CAPACITY,
                eviction_fraction: 0.2,
            }),
        }
    }

    pub fn get(&self, style_id: &str) -> Option<V> {
        self.inner.get(style_id)
    }

    pub fn insert(&self, style_id: String, style: V) {
        self.inner.insert(style_id, style);
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn stats(&self) -> StoreStats {
        self.inner.stats()
    }
}

impl<V: Clone> Default for StyleCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_by_style_id() {
        let cache = StyleCache::new();
        cache.insert("streets-dark".into(), "{\"layers\":[]}".to_string());
        assert!(cache.get("streets-dark").is_some());
        assert!(cache.get("streets-light").is_none());
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = StyleCache::new();
        cache.insert("satellite".into(), "doc".to_string());
        cache.clear();
        assert!(cache.get("satellite").is_none());
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn stats_lists_cached_styles() {
        let cache = StyleCache::new();
        cache.insert("streets".into(), "a".to_string());
        cache.insert("outdoors".into(), "b".to_string());

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert!(stats.keys.contains(&"streets".to_string()));
        assert!(stats.keys.contains(&"outdoors".to_string()));
    }
}

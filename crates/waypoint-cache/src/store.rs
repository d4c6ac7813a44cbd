use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tuning knobs for a [`TtlCache`].
#[derive(Clone, Copy, Debug)]
pub struct TtlCacheConfig {
    pub default_ttl: Duration,
    pub max_entries: usize,
    /// Fraction of `max_entries` dropped (oldest first) when the store is
    /// full at insert time.
    pub eviction_fraction: f64,
}

impl Default for TtlCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(30 * 60),
            max_entries: 100,
            eviction_fraction: 0.2,
        }
    }
}

struct Entry<V> {
    value: V,
    created_at: Instant,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Snapshot of store contents and counters. `size` and `keys` reflect an
/// expiry sweep taken at the instant of the call.
#[derive(Clone, Debug, Default)]
pub struct StoreStats {
    pub size: usize,
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Inner<V> {
    map: HashMap<String, Entry<V>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Generic TTL-bounded, size-bounded key→value store.
///
/// Expiry is lazy: checked on read, swept on write and on `stats`. When an
/// insert finds the store full, the oldest-by-creation fraction of entries
/// is evicted first. Capacity sits around 100 entries, so the full-map
/// sweep on every write is fine; a larger deployment would want an
/// `expires_at` heap instead.
///
/// A single mutex guards the map — eviction scans and mutates the whole
/// key set, so finer-grained locking buys nothing at this size.
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    config: TtlCacheConfig,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(config: TtlCacheConfig) -> Self {
        assert!(config.max_entries > 0, "cache capacity must be > 0");
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::with_capacity(config.max_entries),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            config,
        }
    }

    /// Look up a key. An expired entry is removed on the spot and reported
    /// as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        // Clone out of the map first so the lookup borrow ends before the
        // removal below.
        let lookup = inner.map.get(key).map(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                Some(entry.value.clone())
            }
        });

        match lookup {
            Some(Some(value)) => {
                inner.hits += 1;
                Some(value)
            }
            Some(None) => {
                inner.map.remove(key);
                inner.misses += 1;
                None
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Insert with the store's default TTL.
    pub fn insert(&self, key: String, value: V) {
        self.insert_with_ttl(key, value, self.config.default_ttl);
    }

    /// Insert with an explicit TTL. Sweeps expired entries first, then
    /// evicts the oldest fraction if the store is still full, so the live
    /// entry count never exceeds `max_entries`.
    pub fn insert_with_ttl(&self, key: String, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        inner.map.retain(|_, entry| !entry.is_expired(now));

        if inner.map.len() >= self.config.max_entries {
            let batch = self.eviction_batch_size();
            let mut by_age: Vec<(String, Instant)> = inner
                .map
                .iter()
                .map(|(k, e)| (k.clone(), e.created_at))
                .collect();
            by_age.sort_by_key(|(_, created)| *created);
            for (old_key, _) in by_age.into_iter().take(batch) {
                inner.map.remove(&old_key);
                inner.evictions += 1;
            }
        }

        inner.map.insert(
            key,
            Entry {
                value,
                created_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Drop all entries immediately.
    pub fn clear(&self) {
        self.inner.lock().map.clear();
    }

    /// Number of entries, expired or not. Use [`TtlCache::stats`] for an
    /// expiry-accurate count.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sweep expired entries, then snapshot size, keys, and counters.
    pub fn stats(&self) -> StoreStats {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.map.retain(|_, entry| !entry.is_expired(now));
        StoreStats {
            size: inner.map.len(),
            keys: inner.map.keys().cloned().collect(),
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
        }
    }

    fn eviction_batch_size(&self) -> usize {
        let raw = (self.config.max_entries as f64 * self.config.eviction_fraction).ceil();
        (raw as usize).max(1)
    }
}

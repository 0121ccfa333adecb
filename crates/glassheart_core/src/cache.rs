//! Filter cache
//!
//! Generating a displacement filter means building and percent-encoding two
//! SVG documents, which is too much work to repeat on every hover or resize.
//! `FilterCache` memoizes the generated filter URI per `FilterParameters`.
//!
//! The cache is bounded two ways:
//!
//! - **Capacity**: never holds more than `capacity` entries; the oldest entry
//!   goes first
//! - **Age**: entries older than `max_age` are dropped lazily on lookup and in
//!   a sweep that runs once occupancy passes 80% of capacity
//!
//! Lookups do not refresh an entry, so eviction order is creation order. One
//! cache is meant to be shared by every bound element of an application (see
//! [`SharedFilterCache`]) so identically sized elements reuse the same filter.

use lru::LruCache;
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::CacheConfig;
use crate::params::{FilterKey, FilterParameters};

/// A filter cache shared between all elements of one application context
pub type SharedFilterCache = Rc<RefCell<FilterCache>>;

/// A cached filter URI and when it was generated
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: String,
    pub created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > max_age
    }
}

/// Counters describing cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
}

/// Bounded, age-limited memo of generated filters
pub struct FilterCache {
    entries: LruCache<FilterKey, CacheEntry>,
    capacity: usize,
    max_age: Duration,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl FilterCache {
    /// Create a cache with the default limits (100 entries, 5 minutes)
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with explicit limits
    ///
    /// A capacity of zero is raised to one.
    pub fn with_config(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            capacity: capacity.get(),
            max_age: config.max_age(),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Wrap this cache for sharing between bindings
    pub fn into_shared(self) -> SharedFilterCache {
        Rc::new(RefCell::new(self))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a filter, using the current time for expiry
    ///
    /// Callers that run on a virtual clock use [`get_at`](Self::get_at) with
    /// that clock instead.
    pub fn get(&mut self, params: &FilterParameters) -> Option<String> {
        self.get_at(params, Instant::now())
    }

    /// Store a filter, timestamped with the current time
    pub fn put(&mut self, params: &FilterParameters, value: String) {
        self.put_at(params, value, Instant::now());
    }

    /// Look up a filter as of `now`
    ///
    /// An entry older than `max_age` is removed and reported as a miss.
    pub fn get_at(&mut self, params: &FilterParameters, now: Instant) -> Option<String> {
        let key = params.cache_key();

        let expired = match self.entries.peek(&key) {
            Some(entry) => entry.is_expired(now, self.max_age),
            None => {
                self.misses += 1;
                tracing::trace!("filter cache miss: {}", key);
                return None;
            }
        };

        if expired {
            self.entries.pop(&key);
            self.evictions += 1;
            self.misses += 1;
            tracing::trace!("filter cache entry expired: {}", key);
            return None;
        }

        self.hits += 1;
        tracing::trace!("filter cache hit: {}", key);
        self.entries.peek(&key).map(|entry| entry.value.clone())
    }

    /// Store a filter generated at `now`
    ///
    /// Storing the same key again replaces the entry, so two elements racing
    /// to fill the same slot is harmless.
    pub fn put_at(&mut self, params: &FilterParameters, value: String, now: Instant) {
        let key = params.cache_key();
        let entry = CacheEntry {
            value,
            created_at: now,
        };

        // At capacity, push hands back the oldest entry
        if let Some((evicted, _)) = self.entries.push(key.clone(), entry) {
            if evicted != key {
                self.evictions += 1;
                tracing::trace!("filter cache full, evicted {}", evicted);
            }
        }

        if self.entries.len() * 5 > self.capacity * 4 {
            self.purge_expired(now);
        }
    }

    /// Look up a filter, generating and storing it on a miss
    pub fn get_or_insert_with<F>(&mut self, params: &FilterParameters, now: Instant, f: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(value) = self.get_at(params, now) {
            return value;
        }

        let value = f();
        self.put_at(params, value.clone(), now);
        value
    }

    /// Drop every entry older than `max_age` as of `now`
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        // Timestamps may come from different clocks, so check every entry
        let expired: Vec<FilterKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, self.max_age))
            .map(|(key, _)| key.clone())
            .collect();

        let removed = expired.len();
        for key in &expired {
            self.entries.pop(key);
        }

        if removed > 0 {
            self.evictions += removed as u64;
            tracing::debug!(
                "filter cache swept {} expired entries ({} remain)",
                removed,
                self.entries.len()
            );
        }

        removed
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.entries.len(),
        }
    }
}

impl Default for FilterCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: u32) -> FilterParameters {
        FilterParameters::new(width, 50, 25.0, 8.0, 100.0, 0.0)
    }

    fn small_cache(capacity: usize, max_age: Duration) -> FilterCache {
        FilterCache::with_config(CacheConfig::new(capacity, max_age))
    }

    #[test]
    fn test_put_then_get() {
        let mut cache = FilterCache::new();
        let now = Instant::now();

        cache.put_at(&params(200), "filter-a".to_string(), now);
        assert_eq!(cache.get_at(&params(200), now), Some("filter-a".to_string()));
    }

    #[test]
    fn test_never_inserted_is_absent() {
        let mut cache = FilterCache::new();
        assert_eq!(cache.get(&params(200)), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_wall_clock_roundtrip() {
        let mut cache = FilterCache::new();
        cache.put(&params(200), "filter-a".to_string());
        assert_eq!(cache.get(&params(200)), Some("filter-a".to_string()));
    }

    #[test]
    fn test_capacity_bound() {
        let mut cache = small_cache(10, Duration::from_secs(300));
        let now = Instant::now();

        for width in 1..=11 {
            cache.put_at(&params(width), format!("filter-{width}"), now);
        }

        assert_eq!(cache.len(), 10);
        // Oldest entry went first
        assert_eq!(cache.get_at(&params(1), now), None);
        assert!(cache.get_at(&params(11), now).is_some());
    }

    #[test]
    fn test_expired_entry_is_absent_and_removed() {
        let mut cache = small_cache(100, Duration::from_secs(300));
        let start = Instant::now();

        cache.put_at(&params(200), "filter-a".to_string(), start);
        let later = start + Duration::from_secs(300) + Duration::from_millis(1);

        assert_eq!(cache.get_at(&params(200), later), None);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_entry_at_exact_age_bound_is_kept() {
        let mut cache = small_cache(100, Duration::from_secs(300));
        let start = Instant::now();

        cache.put_at(&params(200), "filter-a".to_string(), start);
        let at_bound = start + Duration::from_secs(300);
        assert!(cache.get_at(&params(200), at_bound).is_some());
    }

    #[test]
    fn test_lookups_do_not_extend_lifetime() {
        let mut cache = small_cache(100, Duration::from_secs(10));
        let start = Instant::now();

        cache.put_at(&params(200), "filter-a".to_string(), start);
        assert!(cache.get_at(&params(200), start + Duration::from_secs(9)).is_some());
        assert!(cache.get_at(&params(200), start + Duration::from_secs(11)).is_none());
    }

    #[test]
    fn test_sweep_runs_past_eighty_percent() {
        let mut cache = small_cache(10, Duration::from_secs(1));
        let start = Instant::now();

        for width in 1..=5 {
            cache.put_at(&params(width), "old".to_string(), start);
        }

        let later = start + Duration::from_secs(2);
        for width in 6..=9 {
            cache.put_at(&params(width), "new".to_string(), later);
        }

        // Ninth entry crossed 80% and swept the five stale ones
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.stats().evictions, 5);
    }

    #[test]
    fn test_sweep_handles_out_of_order_timestamps() {
        let mut cache = small_cache(100, Duration::from_secs(60));
        let start = Instant::now();

        // A later timestamp stored first, then one from a clock running behind
        cache.put_at(&params(200), "ahead".to_string(), start + Duration::from_secs(30));
        cache.put_at(&params(300), "behind".to_string(), start);

        let now = start + Duration::from_secs(70);
        assert_eq!(cache.purge_expired(now), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at(&params(200), now), Some("ahead".to_string()));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_redundant_put_is_harmless() {
        let mut cache = small_cache(4, Duration::from_secs(300));
        let now = Instant::now();

        cache.put_at(&params(200), "filter-a".to_string(), now);
        cache.put_at(&params(200), "filter-a".to_string(), now);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get_at(&params(200), now), Some("filter-a".to_string()));
    }

    #[test]
    fn test_get_or_insert_with_generates_once() {
        let mut cache = FilterCache::new();
        let now = Instant::now();
        let mut generated = 0;

        for _ in 0..3 {
            let value = cache.get_or_insert_with(&params(200), now, || {
                generated += 1;
                params(200).build_filter()
            });
            assert!(value.ends_with("#displace"));
        }

        assert_eq!(generated, 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut cache = small_cache(0, Duration::from_secs(1));
        assert_eq!(cache.capacity(), 1);

        let now = Instant::now();
        cache.put_at(&params(1), "a".to_string(), now);
        cache.put_at(&params(2), "b".to_string(), now);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = FilterCache::new();
        cache.put(&params(200), "filter-a".to_string());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&params(200)), None);
    }
}

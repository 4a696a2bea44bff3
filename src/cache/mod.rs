//! Gram matrix cache
//!
//! Learners that revisit the same pairs of training samples keep a [`GramCache`]
//! indexed by sample position. Entries are evaluated lazily and the least recently
//! used ones are dropped once the capacity is reached. Kernel matrices are symmetric,
//! so only K(i, j) with i <= j is stored.

use crate::kernel::Kernel;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key for Gram entries, normalized so that i <= j
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    i: usize,
    j: usize,
}

impl CacheKey {
    fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { i, j }
        } else {
            Self { i: j, j: i }
        }
    }
}

/// LRU cache of Gram entries K(samples[i], samples[j])
///
/// The cache does not own the samples: callers pass the same kernel and sample list
/// on every access and must [`clear`](GramCache::clear) it when either changes.
#[derive(Debug, Clone)]
pub struct GramCache {
    cache: LruCache<CacheKey, f64>,
    hits: u64,
    misses: u64,
}

impl GramCache {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a cache with capacity based on memory size in bytes
    ///
    /// Counts 32 bytes per entry (key, value and list links).
    pub fn with_memory_limit(memory_bytes: usize) -> Self {
        Self::new((memory_bytes / 32).max(1))
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Raise the capacity to `capacity` entries, never lowering it
    ///
    /// No memory is reserved up front; the cache grows as entries are inserted.
    pub fn grow_to(&mut self, capacity: usize) {
        if let Some(capacity) = NonZeroUsize::new(capacity) {
            if capacity > self.cache.cap() {
                self.cache.resize(capacity);
            }
        }
    }

    /// Get a cached entry
    pub fn get(&mut self, i: usize, j: usize) -> Option<f64> {
        let key = CacheKey::new(i, j);
        if let Some(&value) = self.cache.get(&key) {
            self.hits += 1;
            Some(value)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Store an entry
    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        self.cache.put(CacheKey::new(i, j), value);
    }

    /// Kernel value K(samples[i], samples[j]), evaluated on a miss
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of range
    pub fn entry<T, K: Kernel<T> + ?Sized>(
        &mut self,
        kernel: &K,
        samples: &[T],
        i: usize,
        j: usize,
    ) -> f64 {
        if let Some(value) = self.get(i, j) {
            return value;
        }
        let value = if i == j {
            kernel.compute_self(&samples[i])
        } else {
            kernel.compute(&samples[i], &samples[j])
        };
        self.put(i, j, value);
        value
    }

    /// Mean of K over every ordered pair drawn from `indices`
    pub fn block_mean<T, K: Kernel<T> + ?Sized>(
        &mut self,
        kernel: &K,
        samples: &[T],
        indices: &[usize],
    ) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let mut sum = 0.0;
        for (a, &i) in indices.iter().enumerate() {
            sum += self.entry(kernel, samples, i, i);
            for &j in &indices[a + 1..] {
                sum += 2.0 * self.entry(kernel, samples, i, j);
            }
        }
        sum / (indices.len() * indices.len()) as f64
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.capacity(),
            size: self.cache.len(),
        }
    }

    /// Drop every entry and reset the statistics
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::DoubleLinear;
    use approx::assert_relative_eq;

    #[test]
    fn test_cache_key_normalization() {
        let key1 = CacheKey::new(1, 5);
        let key2 = CacheKey::new(5, 1);
        assert_eq!(key1, key2);
        assert_eq!(key1.i, 1);
        assert_eq!(key1.j, 5);
    }

    #[test]
    fn test_cache_put_get() {
        let mut cache = GramCache::new(10);

        assert_eq!(cache.get(0, 1), None);
        cache.put(0, 1, 0.5);

        // Symmetric access
        assert_eq!(cache.get(1, 0), Some(0.5));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_entry_evaluates_once() {
        let samples = vec![vec![1.0, 0.0], vec![2.0, 3.0], vec![0.0, 1.0]];
        let kernel = DoubleLinear;
        let mut cache = GramCache::new(3);

        assert_eq!(cache.entry(&kernel, &samples, 0, 1), 2.0);
        assert_eq!(cache.entry(&kernel, &samples, 1, 0), 2.0);
        assert_eq!(cache.entry(&kernel, &samples, 1, 1), 13.0);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 2, 2));
    }

    #[test]
    fn test_lru_eviction() {
        let samples = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let kernel = DoubleLinear;
        let mut cache = GramCache::new(2);

        cache.entry(&kernel, &samples, 0, 1);
        cache.entry(&kernel, &samples, 1, 2);
        cache.entry(&kernel, &samples, 2, 3); // Should evict (0,1)
        assert_eq!(cache.stats().size, 2);

        cache.entry(&kernel, &samples, 0, 1);
        assert_eq!(cache.stats().misses, 4);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_hit_rate_calculation() {
        let mut cache = GramCache::new(10);

        // No accesses yet
        assert_eq!(cache.hit_rate(), 0.0);

        cache.put(0, 1, 1.0);
        cache.get(0, 1);
        cache.get(1, 1);

        assert_eq!(cache.hit_rate(), 0.5);
    }

    #[test]
    fn test_capacity_grows_lazily() {
        let mut cache = GramCache::new(0);
        assert_eq!(cache.capacity(), 1);

        cache.grow_to(100);
        assert_eq!(cache.capacity(), 100);
        assert_eq!(cache.stats().size, 0);

        // Never shrinks
        cache.grow_to(10);
        assert_eq!(cache.capacity(), 100);
    }

    #[test]
    fn test_memory_limit() {
        let cache = GramCache::with_memory_limit(32 * 1024);
        assert_eq!(cache.capacity(), 1024);
    }

    #[test]
    fn test_block_mean_reuses_entries() {
        let samples = vec![vec![1.0], vec![2.0], vec![3.0]];
        let kernel = DoubleLinear;
        let mut cache = GramCache::new(6);

        // Mean of x_i * x_j over {1, 3}²: (1 + 3 + 3 + 9) / 4
        assert_relative_eq!(cache.block_mean(&kernel, &samples, &[0, 2]), 4.0);
        assert_eq!(cache.stats().misses, 3);

        // Growing the block only evaluates the new row
        assert_relative_eq!(cache.block_mean(&kernel, &samples, &[0, 2, 1]), 4.0);
        assert_eq!(cache.stats().misses, 6);
        assert_eq!(cache.stats().hits, 3);

        assert_eq!(cache.block_mean(&kernel, &samples, &[]), 0.0);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = GramCache::new(4);
        cache.put(0, 1, 1.0);
        cache.get(0, 1);

        cache.clear();

        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 0);
        assert_eq!(cache.stats().size, 0);
        assert_eq!(cache.capacity(), 4);
    }
}

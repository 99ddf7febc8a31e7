//! Memoizing order-key generator.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::PoisonError;

use lru::LruCache;

use crate::error::Result;
use crate::fractional;
use crate::key::OrderKey;

/// Default capacity of the generation cache, in boundary pairs.
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// Boundary pair used as the memoization cache key.
type BoundaryPair = (Option<String>, Option<String>);

/// Order-key generator with a bounded memoization cache.
///
/// The generator is an explicitly constructed, owned instance: create one at
/// process start and share it via `Arc` with whatever needs it. Repeated
/// requests for a key between the same two boundaries return the identical
/// key for as long as the pair stays resident in the cache, so bursts of
/// duplicate insert requests cannot drift apart. The cache is LRU-bounded;
/// idempotence is only needed for near-in-time duplicates.
pub struct KeyGenerator {
    cache: Mutex<LruCache<BoundaryPair, OrderKey>>,
}

impl KeyGenerator {
    /// Create a generator with the default cache capacity.
    pub fn new() -> Self {
        Self::with_cache_size(DEFAULT_CACHE_SIZE)
    }

    /// Create a generator with a specific cache capacity.
    pub fn with_cache_size(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// The fixed well-known key used when no ordering context exists.
    pub fn initial(&self) -> OrderKey {
        OrderKey::from_generated(fractional::INITIAL_KEY.to_string())
    }

    /// Generate a key sorting strictly after `prev`.
    pub fn after(&self, prev: Option<&OrderKey>) -> Result<OrderKey> {
        self.between(prev, None)
    }

    /// Generate a key sorting strictly before `next`.
    pub fn before(&self, next: Option<&OrderKey>) -> Result<OrderKey> {
        self.between(None, next)
    }

    /// Generate a key strictly between `prev` and `next`.
    ///
    /// Both bounds present requires `prev < next`. A `None` bound is open.
    /// Identical boundary inputs return the identical key while the pair is
    /// cached.
    pub fn between(&self, prev: Option<&OrderKey>, next: Option<&OrderKey>) -> Result<OrderKey> {
        let pair: BoundaryPair = (
            prev.map(|key| key.as_str().to_string()),
            next.map(|key| key.as_str().to_string()),
        );
        // a poisoned lock still holds a usable cache
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.get(&pair) {
            return Ok(cached.clone());
        }
        let generated = OrderKey::from_generated(fractional::key_between(
            pair.0.as_deref(),
            pair.1.as_deref(),
        )?);
        cache.put(pair, generated.clone());
        Ok(generated)
    }

    /// Number of boundary pairs currently cached.
    pub fn cached_pairs(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

//! Memoization for resolved color values.
//!
//! Resolution is deterministic for a given input string and literal option
//! set, so results are memoized in a bounded least-recently-used cache.
//! Failed parses are remembered too: a soft-invalid literal is cached as
//! [`CacheEntry::KnownInvalid`] so repeated lookups of the same bad input
//! skip the whole pipeline.
//!
//! Callback-based option sources cannot participate in cache keys; callers
//! that change what a callback returns must call [`clear_cache`].

use std::cell::RefCell;
use std::hash::Hash;

use indexmap::IndexMap;

/// A cached resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry<V> {
    Valid(V),
    /// The input was well-formed enough to try but resolved to nothing.
    KnownInvalid,
}

/// A bounded LRU map over insertion-ordered storage.
///
/// Recency is tracked by position: a hit moves the entry to the back, and
/// eviction removes the front. Both are O(n) moves on the underlying
/// [`IndexMap`], which is fine at the capacities used here.
#[derive(Debug)]
pub struct LruCache<K, V> {
    map: IndexMap<K, V>,
    capacity: usize,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// A cache holding at most `capacity` entries. A zero capacity caches
    /// nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Look up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = self.map.get_index_of(key)?;
        let last = self.map.len() - 1;
        self.map.move_index(index, last);
        self.map.get_index(last).map(|(_, v)| v)
    }

    /// Insert a key, evicting the least-recently-used entry when full.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(index) = self.map.get_index_of(&key) {
            self.map[index] = value;
            let last = self.map.len() - 1;
            self.map.move_index(index, last);
            return;
        }
        if self.map.len() == self.capacity {
            self.map.shift_remove_index(0);
        }
        self.map.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

/// Default capacity of the process-wide resolve cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

thread_local! {
    static RESOLVE_CACHE: RefCell<LruCache<String, CacheEntry<String>>> =
        RefCell::new(LruCache::new(DEFAULT_CACHE_CAPACITY));
}

/// Run `f` with mutable access to this thread's resolve cache.
pub fn with_cache<R>(f: impl FnOnce(&mut LruCache<String, CacheEntry<String>>) -> R) -> R {
    RESOLVE_CACHE.with(|cache| f(&mut cache.borrow_mut()))
}

/// Drop every memoized resolution on this thread.
pub fn clear_cache() {
    with_cache(LruCache::clear);
}

/// Memoize a string-producing operation under `key`.
///
/// Keys carry a function tag prefix so distinct entry points sharing an input
/// string never collide. `Ok(None)` outcomes are remembered as
/// [`CacheEntry::KnownInvalid`]; errors are never cached.
pub fn memoized<E>(
    key: String,
    f: impl FnOnce() -> Result<Option<String>, E>,
) -> Result<Option<String>, E> {
    match with_cache(|cache| cache.get(&key).cloned()) {
        Some(CacheEntry::Valid(value)) => return Ok(Some(value)),
        Some(CacheEntry::KnownInvalid) => return Ok(None),
        None => {}
    }
    let result = f()?;
    let entry = match &result {
        Some(value) => CacheEntry::Valid(value.clone()),
        None => CacheEntry::KnownInvalid,
    };
    with_cache(|cache| cache.insert(key, entry));
    Ok(result)
}

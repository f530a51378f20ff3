use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;

/// Memo table with hit/miss counters.
///
/// Keys are compared exactly: a formula together with the values of its free
/// variables determines its truth table.
pub struct Cache<K, V> {
    data: HashMap<K, V>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }
}

impl<K, V> Cache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Reset the cache.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<K: Eq + Hash, V: Clone> Cache<K, V> {
    /// Get the cached result.
    pub fn get(&self, key: &K) -> Option<V> {
        match self.data.get(key) {
            Some(value) => {
                self.hits.set(self.hits.get() + 1);
                Some(value.clone())
            }
            None => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    /// Insert a result into the cache.
    pub fn insert(&mut self, key: K, value: V) {
        self.data.insert(key, value);
    }
}

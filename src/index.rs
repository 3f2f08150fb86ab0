//! Fixed-capacity associative index with separate chaining
//!
//! This module provides [`ChainedIndex`], the generic key-value store used
//! both as the global file-name registry and as each file's version-id index.
//!
//! ## Overview
//!
//! The index allocates a fixed number of buckets at construction time and
//! never resizes. Each bucket is an ordered vector of `(key, value)` pairs;
//! colliding keys chain within their bucket and are found by linear scan.
//!
//! Keys locate their bucket through the [`BucketKey`] trait: integer keys
//! reduce modulo the bucket count, string keys run a djb2 polynomial hash
//! (accumulator 5381, multiplier 33) before the reduction.
//!
//! ## Capacity
//!
//! There is no growth strategy. With far more entries than buckets the
//! chains degrade toward linear scans; this is a deliberate, documented
//! limit of the structure, acceptable for a bounded-size file set. The
//! default capacity of [`DEFAULT_BUCKETS`] (a prime) keeps collisions rare
//! at the intended scale.
//!
//! ## Examples
//!
//! ```rust
//! use palimpsest::index::ChainedIndex;
//!
//! let mut index: ChainedIndex<String, u32> = ChainedIndex::with_buckets(64);
//! index.insert("a.txt".to_string(), 1);
//! index.insert("a.txt".to_string(), 2); // upsert
//!
//! assert_eq!(index.find(&"a.txt".to_string()), Some(&2));
//! assert_eq!(index.len(), 1);
//! ```

use tracing::trace;

/// Default bucket count for new indexes
///
/// A large prime, which keeps the modulo reduction well-distributed for
/// sequential integer keys as well as hashed string keys.
pub const DEFAULT_BUCKETS: usize = 10_007;

/// Maps a key to its bucket in a fixed-capacity index
pub trait BucketKey {
    /// Compute the bucket for this key given the index's bucket count
    ///
    /// `bucket_count` is always non-zero; implementations must return a
    /// value strictly less than it.
    fn bucket(&self, bucket_count: usize) -> usize;
}

impl BucketKey for u64 {
    fn bucket(&self, bucket_count: usize) -> usize {
        (*self % bucket_count as u64) as usize
    }
}

impl BucketKey for String {
    /// djb2 polynomial rolling hash reduced modulo the bucket count
    fn bucket(&self, bucket_count: usize) -> usize {
        let mut hash: u64 = 5381;
        for byte in self.as_bytes() {
            hash = hash.wrapping_mul(33).wrapping_add(u64::from(*byte));
        }
        (hash % bucket_count as u64) as usize
    }
}

/// Generic key-value store with a fixed bucket count and separate chaining
///
/// Insertion has upsert semantics: inserting a key that is already present
/// replaces its value in place. Lookups return `Option` so the absent case
/// is explicit at every call site.
#[derive(Debug, Clone)]
pub struct ChainedIndex<K, V> {
    /// Buckets of chained `(key, value)` pairs
    buckets: Vec<Vec<(K, V)>>,
    /// Count of live entries across all buckets
    len: usize,
}

impl<K: BucketKey + PartialEq, V> ChainedIndex<K, V> {
    /// Create an index with the given fixed bucket count
    ///
    /// # Panics
    ///
    /// Panics if `bucket_count` is zero.
    pub fn with_buckets(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "bucket count must be non-zero");
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Vec::new);
        Self { buckets, len: 0 }
    }

    /// Insert or replace the value for a key
    ///
    /// If the key is already present in its bucket the existing value is
    /// replaced; otherwise the pair is appended to the bucket's chain.
    pub fn insert(&mut self, key: K, value: V) {
        let bucket = key.bucket(self.buckets.len());
        let chain = &mut self.buckets[bucket];

        if let Some(entry) = chain.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
            return;
        }

        trace!(bucket, chain_len = chain.len(), "index insert");
        chain.push((key, value));
        self.len += 1;
    }

    /// Look up the value for a key
    pub fn find(&self, key: &K) -> Option<&V> {
        let bucket = key.bucket(self.buckets.len());
        self.buckets[bucket]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Look up the value for a key, mutably
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let bucket = key.bucket(self.buckets.len());
        self.buckets[bucket]
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Remove the entry for a key, reporting whether one was found
    pub fn erase(&mut self, key: &K) -> bool {
        let bucket = key.bucket(self.buckets.len());
        let chain = &mut self.buckets[bucket];

        if let Some(pos) = chain.iter().position(|(k, _)| k == key) {
            chain.remove(pos);
            self.len -= 1;
            true
        } else {
            false
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fixed bucket count chosen at construction
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl<K: BucketKey + PartialEq, V> Default for ChainedIndex<K, V> {
    fn default() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }
}

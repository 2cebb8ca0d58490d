//! Hash table engine: seeded open hashing with per-bucket entry vectors.
//!
//! Layout is a flat array of buckets, each bucket an ordered growable vector
//! of entries. An entry stores its key, its value, and the full 64-bit keyed
//! hash of the key; placement is always `stored_hash % bucket_count`, so a
//! resize never re-invokes `K: Hash`.
//!
//! Growth discipline:
//! - The bucket array doubles when `len == bucket_count`, checked before an
//!   insert commits (load-factor trigger).
//! - A bucket is materialized lazily on first insert and its capacity is
//!   reused monotonically (`clear` keeps storage).
//! - Every growth step goes through `try_reserve`; allocation failure is
//!   reported as [`AllocError`] and never leaves an entry lost, duplicated,
//!   or half-built. The resize reserves all destination space before moving
//!   the first entry, so migration itself cannot fail.

use crate::sip::SipBuildHasher;
use core::hash::{BuildHasher, Hash};
use core::mem;
use std::collections::TryReserveError;
use std::fmt;

/// Bucket-array capacity at construction.
pub(crate) const INITIAL_BUCKETS: usize = 32;

/// Entry capacity a bucket is first materialized with.
const BUCKET_INITIAL_CAP: usize = 4;

/// Growth could not acquire memory. The table is unchanged except possibly
/// for reserved-but-unused capacity.
#[derive(Debug)]
pub struct AllocError(TryReserveError);

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allocation failed while growing table: {}", self.0)
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<TryReserveError> for AllocError {
    fn from(err: TryReserveError) -> Self {
        AllocError(err)
    }
}

/// Distinct-insert failure: the key is already present, or growth failed.
#[derive(Debug)]
pub enum InsertError {
    DuplicateKey,
    Alloc(AllocError),
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => write!(f, "key is already present"),
            InsertError::Alloc(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for InsertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InsertError::DuplicateKey => None,
            InsertError::Alloc(err) => Some(err),
        }
    }
}

impl From<AllocError> for InsertError {
    fn from(err: AllocError) -> Self {
        InsertError::Alloc(err)
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    hash: u64,
    key: K,
    value: V,
}

/// Seeded open-hashing table from `K` to `V`.
pub struct HashTable<K, V> {
    buckets: Vec<Vec<Entry<K, V>>>,
    len: usize,
    hasher: SipBuildHasher,
    key_eq: Option<fn(&K, &K) -> bool>,
}

impl<K, V> HashTable<K, V>
where
    K: Hash + Eq,
{
    /// Empty table with a freshly drawn random seed.
    pub fn new() -> Self {
        Self::with_hasher(SipBuildHasher::default())
    }

    /// Empty table placing entries under the given seed carrier.
    pub fn with_hasher(hasher: SipBuildHasher) -> Self {
        let mut buckets = Vec::new();
        buckets.resize_with(INITIAL_BUCKETS, Vec::new);
        Self {
            buckets,
            len: 0,
            hasher,
            key_eq: None,
        }
    }

    /// Replace key equality with an injected comparison. Intended for use
    /// right after construction, before any insert. Placement still follows
    /// `K: Hash`, so the comparison must not consider keys equal that hash
    /// differently.
    pub fn with_key_eq(mut self, eq: fn(&K, &K) -> bool) -> Self {
        self.key_eq = Some(eq);
        self
    }

    /// Live entry count.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket-array capacity. `len() == bucket_count()` triggers a
    /// doubling before the next insert commits.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn slot(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn find_in_bucket(&self, idx: usize, hash: u64, key: &K) -> Option<usize> {
        self.buckets[idx].iter().position(|entry| match self.key_eq {
            Some(eq) => eq(&entry.key, key),
            None => entry.hash == hash && entry.key == *key,
        })
    }

    /// Insert `key -> value`. An existing equal key is overwritten in place
    /// and its previous value returned; `len` is unchanged in that case.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, AllocError> {
        if self.len == self.buckets.len() {
            self.grow()?;
        }
        let hash = self.hasher.hash_one(&key);
        let idx = self.slot(hash);
        if let Some(pos) = self.find_in_bucket(idx, hash, &key) {
            let old = mem::replace(&mut self.buckets[idx][pos].value, value);
            return Ok(Some(old));
        }
        let bucket = &mut self.buckets[idx];
        reserve_slot(bucket)?;
        bucket.push(Entry { hash, key, value });
        self.len += 1;
        Ok(None)
    }

    /// Insert rejecting duplicates instead of overwriting. Used by `Set`.
    pub(crate) fn insert_distinct(&mut self, key: K, value: V) -> Result<(), InsertError> {
        if self.len == self.buckets.len() {
            self.grow()?;
        }
        let hash = self.hasher.hash_one(&key);
        let idx = self.slot(hash);
        if self.find_in_bucket(idx, hash, &key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        let bucket = &mut self.buckets[idx];
        reserve_slot(bucket).map_err(InsertError::Alloc)?;
        bucket.push(Entry { hash, key, value });
        self.len += 1;
        Ok(())
    }

    /// Look up the value for `key`. No mutation, no resize.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hasher.hash_one(key);
        let idx = self.slot(hash);
        let pos = self.find_in_bucket(idx, hash, key)?;
        Some(&self.buckets[idx][pos].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hasher.hash_one(key);
        let idx = self.slot(hash);
        let pos = self.find_in_bucket(idx, hash, key)?;
        Some(&mut self.buckets[idx][pos].value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove the entry for `key`, returning the owned pair. Later entries
    /// in the bucket shift down, preserving their relative order.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hasher.hash_one(key);
        let idx = self.slot(hash);
        let pos = self.find_in_bucket(idx, hash, key)?;
        let entry = self.buckets[idx].remove(pos);
        self.len -= 1;
        Some((entry.key, entry.value))
    }

    /// Drop every entry, keeping bucket storage for reuse.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            outer: self.buckets.iter(),
            inner: [].iter(),
        }
    }

    /// Double the bucket array and migrate entries in place.
    ///
    /// `h % 2n` is either `h % n` or `h % n + n`, so an entry either stays
    /// in its bucket or moves to that bucket's image in the new upper half;
    /// walking sources low-to-high therefore examines each pre-existing
    /// entry exactly once. All destination capacity is reserved up front:
    /// after the first entry moves, nothing can fail.
    fn grow(&mut self) -> Result<(), AllocError> {
        let old_cap = self.buckets.len();
        let new_cap = old_cap * 2;

        self.buckets.try_reserve_exact(old_cap)?;
        self.buckets.resize_with(new_cap, Vec::new);

        for i in 0..old_cap {
            let movers = self.buckets[i]
                .iter()
                .filter(|entry| (entry.hash % new_cap as u64) as usize != i)
                .count();
            if movers == 0 {
                continue;
            }
            if let Err(err) = self.buckets[i + old_cap].try_reserve_exact(movers) {
                // No entry has moved yet; dropping the empty upper half
                // restores the previous state.
                self.buckets.truncate(old_cap);
                return Err(AllocError::from(err));
            }
        }

        let (low, high) = self.buckets.split_at_mut(old_cap);
        for (i, bucket) in low.iter_mut().enumerate() {
            // `j` is the next index to examine. `Vec::remove` compacts the
            // tail down, so after a move `j` already addresses the next
            // unexamined entry.
            let mut j = 0;
            while j < bucket.len() {
                let dest = (bucket[j].hash % new_cap as u64) as usize;
                if dest == i {
                    j += 1;
                    continue;
                }
                debug_assert_eq!(dest, i + old_cap);
                let entry = bucket.remove(j);
                high[dest - old_cap].push(entry);
            }
        }
        Ok(())
    }
}

fn reserve_slot<K, V>(bucket: &mut Vec<Entry<K, V>>) -> Result<(), AllocError> {
    if bucket.capacity() == 0 {
        bucket.try_reserve_exact(BUCKET_INITIAL_CAP)?;
    } else if bucket.len() == bucket.capacity() {
        // Geometric growth; Vec doubles from the reserved base.
        bucket.try_reserve(1)?;
    }
    Ok(())
}

impl<K, V> Default for HashTable<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(&K, &V)` in unspecified order.
pub struct Iter<'a, K, V> {
    outer: core::slice::Iter<'a, Vec<Entry<K, V>>>,
    inner: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.inner.next() {
                return Some((&entry.key, &entry.value));
            }
            self.inner = self.outer.next()?.iter();
        }
    }
}

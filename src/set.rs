//! Set: key-only specialization of the hash table engine.
//!
//! Shares the bucket/entry machinery of [`HashTable`] with a unit value per
//! entry. Unlike the table, inserting an already-present element is a
//! rejection, not an overwrite.

use crate::sip::SipBuildHasher;
use crate::table::{HashTable, InsertError};
use core::hash::Hash;

/// Deduplicating set over the seeded table engine.
pub struct Set<T> {
    table: HashTable<T, ()>,
}

impl<T> Set<T>
where
    T: Hash + Eq,
{
    /// Empty set with a freshly drawn random seed.
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Empty set placing elements under the given seed carrier.
    pub fn with_hasher(hasher: SipBuildHasher) -> Self {
        Self {
            table: HashTable::with_hasher(hasher),
        }
    }

    /// Replace element equality with an injected comparison; see
    /// [`HashTable::with_key_eq`] for the hashing caveat.
    pub fn with_eq(mut self, eq: fn(&T, &T) -> bool) -> Self {
        self.table = self.table.with_key_eq(eq);
        self
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Insert `value`; a present equal element is rejected as
    /// [`InsertError::DuplicateKey`] and the set is unchanged.
    pub fn insert(&mut self, value: T) -> Result<(), InsertError> {
        self.table.insert_distinct(value, ())
    }

    pub fn contains(&self, value: &T) -> bool {
        self.table.contains_key(value)
    }

    /// Remove `value`, returning the owned element if it was present.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        self.table.remove(value).map(|(element, ())| element)
    }

    /// Drop every element, keeping bucket storage for reuse.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.table.iter().map(|(element, _)| element)
    }
}

impl<T> Default for Set<T>
where
    T: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

//! LRU cache composed from two table instances and a recency list.
//!
//! Ownership layout:
//! - a slotmap arena owns the nodes (value payload + recency links); its
//!   generational keys are the minted per-node handles,
//! - the forward table maps caller key -> node handle,
//! - the reverse table maps node handle -> a copy of the caller key, used
//!   only to find the forward entry at eviction time,
//! - `head`/`tail` bound the intrusive doubly linked recency list, strictly
//!   most-recently-used at head to least at tail.
//!
//! The three views always agree: the set of linked nodes equals the set of
//! forward handles equals the set of reverse keys, and `len <= capacity`
//! holds after every completed operation. A `get` is itself a
//! recency-promoting operation, so it takes `&mut self`.

use crate::table::{AllocError, HashTable};
use core::hash::Hash;
use core::mem;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    struct NodeKey;
}

struct Node<V> {
    value: V,
    prev: Option<NodeKey>,
    next: Option<NodeKey>,
}

/// Outcome of [`LruCache::update`].
#[derive(Debug, PartialEq, Eq)]
pub enum Update<K, V> {
    /// The key was new and fit within capacity.
    Inserted,
    /// The key was present; its previous value is returned.
    Replaced(V),
    /// The key was new and inserting it evicted the least-recently-used
    /// entry, returned here.
    Evicted { key: K, value: V },
}

/// Bounded cache with least-recently-used eviction.
pub struct LruCache<K, V> {
    cap: usize,
    nodes: SlotMap<NodeKey, Node<V>>,
    lookup: HashTable<K, NodeKey>,
    reverse: HashTable<NodeKey, K>,
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Empty cache bounded by `capacity`.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "cache capacity must be at least 1");
        Self {
            cap: capacity,
            nodes: SlotMap::with_key(),
            lookup: HashTable::new(),
            reverse: HashTable::new(),
            head: None,
            tail: None,
        }
    }

    /// Replace key equality on the forward table with an injected
    /// comparison; see [`HashTable::with_key_eq`] for the hashing caveat.
    pub fn with_key_eq(mut self, eq: fn(&K, &K) -> bool) -> Self {
        let lookup = self.lookup;
        self.lookup = lookup.with_key_eq(eq);
        self
    }

    /// Live entry count; never exceeds [`LruCache::capacity`].
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Insert or refresh `key -> value` and mark it most recently used.
    ///
    /// A present key is overwritten in place (old value returned, no
    /// eviction). A new key may evict exactly the tail once `len` would
    /// exceed capacity; the evicted pair is returned to the caller.
    pub fn update(&mut self, key: K, value: V) -> Result<Update<K, V>, AllocError> {
        if let Some(&existing) = self.lookup.get(&key) {
            let old = mem::replace(&mut self.nodes[existing].value, value);
            self.detach(existing);
            self.prepend(existing);
            return Ok(Update::Replaced(old));
        }

        let node = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        // Reverse first, forward second; each failure unwinds what came
        // before it, leaving the cache exactly as it was.
        if let Err(err) = self.reverse.insert(node, key.clone()) {
            self.nodes.remove(node);
            return Err(err);
        }
        if let Err(err) = self.lookup.insert(key, node) {
            self.reverse.remove(&node);
            self.nodes.remove(node);
            return Err(err);
        }
        self.prepend(node);

        if self.lookup.len() > self.cap {
            let (evicted_key, evicted_value) = self.evict_tail();
            return Ok(Update::Evicted {
                key: evicted_key,
                value: evicted_value,
            });
        }
        Ok(Update::Inserted)
    }

    /// Look up `key`, promoting it to most recently used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let node = *self.lookup.get(key)?;
        self.detach(node);
        self.prepend(node);
        Some(&self.nodes[node].value)
    }

    /// Mutable variant of [`LruCache::get`]; also promotes.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = *self.lookup.get(key)?;
        self.detach(node);
        self.prepend(node);
        Some(&mut self.nodes[node].value)
    }

    /// Drop every entry, keeping table and arena storage for reuse.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.lookup.clear();
        self.reverse.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterate `(&K, &V)` in recency order, most recently used first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cache: self,
            cursor: self.head,
        }
    }

    fn evict_tail(&mut self) -> (K, V) {
        let tail = self
            .tail
            .expect("eviction requires a non-empty recency list");
        self.detach(tail);
        let (_, key) = self
            .reverse
            .remove(&tail)
            .expect("reverse entry exists for every linked node");
        self.lookup
            .remove(&key)
            .expect("forward entry exists for every linked node");
        let node = self
            .nodes
            .remove(tail)
            .expect("node arena holds every linked node");
        (key, node.value)
    }

    fn detach(&mut self, node: NodeKey) {
        let (prev, next) = {
            let n = &self.nodes[node];
            (n.prev, n.next)
        };
        if let Some(prev) = prev {
            self.nodes[prev].next = next;
        }
        if let Some(next) = next {
            self.nodes[next].prev = prev;
        }
        if self.head == Some(node) {
            self.head = next;
        }
        if self.tail == Some(node) {
            self.tail = prev;
        }
        let n = &mut self.nodes[node];
        n.prev = None;
        n.next = None;
    }

    fn prepend(&mut self, node: NodeKey) {
        match self.head {
            None => {
                self.head = Some(node);
                self.tail = Some(node);
            }
            Some(head) => {
                self.nodes[node].next = Some(head);
                self.nodes[head].prev = Some(node);
                self.head = Some(node);
            }
        }
    }
}

/// Recency-order iterator over an [`LruCache`], most recently used first.
pub struct Iter<'a, K, V> {
    cache: &'a LruCache<K, V>,
    cursor: Option<NodeKey>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        self.cursor = self.cache.nodes[node].next;
        let key = self
            .cache
            .reverse
            .get(&node)
            .expect("reverse entry exists for every linked node");
        Some((key, &self.cache.nodes[node].value))
    }
}

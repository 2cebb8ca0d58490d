//! siptable: a single-threaded, seeded open-hashing table with a set and an
//! LRU cache built on the same bucket/entry engine.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build the LRU cache from small, independently verifiable layers
//!   so each invariant can be reasoned about on its own.
//! - Layers:
//!   - sip: SipHash-1-2, a reduced-round keyed hash; placement is
//!     unpredictable without the per-instance 16-byte seed, resisting
//!     hash-flooding key choices.
//!   - entropy: explicit EntropySource drawing seeds from system entropy,
//!     with an observable degraded time/pid fallback and a keyed-hash
//!     counter-mode stretch.
//!   - table: HashTable<K, V>, a bucket array of growable entry vectors
//!     with a load-factor-triggered, in-place doubling resize; all growth
//!     is fallible via try_reserve.
//!   - set: Set<T>, the key-only specialization sharing the engine, with
//!     duplicate rejection.
//!   - lru: LruCache<K, V>, two HashTable instances (key -> node handle,
//!     node handle -> key copy) plus a slotmap node arena threaded into an
//!     intrusive recency list.
//!
//! Constraints
//! - Single-threaded, synchronous; callers serialize access externally.
//! - Entries store their full 64-bit hash; `K: Hash` is never re-invoked on
//!   resize, and placement is always `stored_hash % bucket_count`.
//! - Resize moves entries bucket-by-bucket in place, never via an auxiliary
//!   full-table copy, and reserves all destination capacity before the
//!   first entry moves so a partial resize is unobservable.
//! - Allocation failure on any growth path surfaces as `AllocError` with
//!   committed state intact; there is no internal retry.
//! - Displaced data is returned to the caller (overwrite returns the old
//!   value, removal returns the owned pair, eviction returns the evicted
//!   entry) instead of being passed to destructor callbacks.
//!
//! Why this split?
//! - Localize invariants: the table knows nothing about recency; the cache
//!   never touches buckets directly.
//! - The dual-index LRU state (forward table, reverse table, recency list)
//!   is mutated only through update/get/evict, each of which restores the
//!   three-way agreement before returning.
//!
//! Notes and non-goals
//! - No iteration-order guarantees except the LRU recency iterator.
//! - Not a cryptographic hash; the seed defends bucket placement, nothing
//!   else.
//! - The entropy fallback is deliberately weak (wall clock and pid) and
//!   flagged via `EntropySource::is_degraded` rather than hidden or fixed.

pub mod entropy;
pub mod sip;
pub mod table;

mod lru;
mod set;

// Public surface
pub use entropy::EntropySource;
pub use lru::{LruCache, Update};
pub use set::Set;
pub use sip::SipBuildHasher;
pub use table::{AllocError, HashTable, InsertError};

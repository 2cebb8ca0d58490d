//! Keyed hash function: SipHash-1-2.
//!
//! A reduced-round SipHash variant (one compression round per 8-byte block,
//! two finalization rounds), keyed with a 16-byte per-instance seed so that
//! an adversary who does not know the seed cannot choose keys that pile into
//! one bucket. This is a DoS-resistant pseudorandom function, not a
//! cryptographic hash.
//!
//! Two entry points over the same permutation:
//! - [`siphash13`]: one-shot over a byte slice.
//! - [`SipHasher13`]: streaming [`Hasher`], fed by `Hash` impls; writing the
//!   same bytes in any chunking yields the same result as the one-shot.
//!
//! [`SipBuildHasher`] carries the seed and mints hashers for the table
//! layers. The seed is fixed for the life of a table instance, so a key's
//! hash is stable across resize recomputation.

use crate::entropy::EntropySource;
use core::hash::{BuildHasher, Hasher};

#[derive(Clone, Copy)]
struct State {
    v0: u64,
    v1: u64,
    v2: u64,
    v3: u64,
}

impl State {
    fn new(k0: u64, k1: u64) -> Self {
        Self {
            v0: 0x736f6d6570736575 ^ k0,
            v1: 0x646f72616e646f6d ^ k1,
            v2: 0x6c7967656e657261 ^ k0,
            v3: 0x7465646279746573 ^ k1,
        }
    }

    #[inline]
    fn round(&mut self) {
        self.v0 = self.v0.wrapping_add(self.v1);
        self.v1 = self.v1.rotate_left(13);
        self.v1 ^= self.v0;
        self.v0 = self.v0.rotate_left(32);
        self.v2 = self.v2.wrapping_add(self.v3);
        self.v3 = self.v3.rotate_left(16);
        self.v3 ^= self.v2;
        self.v0 = self.v0.wrapping_add(self.v3);
        self.v3 = self.v3.rotate_left(21);
        self.v3 ^= self.v0;
        self.v2 = self.v2.wrapping_add(self.v1);
        self.v1 = self.v1.rotate_left(17);
        self.v1 ^= self.v2;
        self.v2 = self.v2.rotate_left(32);
    }

    // One compression round per message block (the "1" in 1-2).
    #[inline]
    fn compress(&mut self, m: u64) {
        self.v3 ^= m;
        self.round();
        self.v0 ^= m;
    }

    // Two finalization rounds (the "2" in 1-2). `b` carries the trailing
    // bytes with the low byte of the total length in the top byte.
    #[inline]
    fn finalize(mut self, b: u64) -> u64 {
        self.compress(b);
        self.v2 ^= 0xff;
        self.round();
        self.round();
        self.v0 ^ self.v1 ^ self.v2 ^ self.v3
    }
}

fn seed_words(seed: &[u8; 16]) -> (u64, u64) {
    let mut k0 = [0u8; 8];
    let mut k1 = [0u8; 8];
    k0.copy_from_slice(&seed[..8]);
    k1.copy_from_slice(&seed[8..]);
    (u64::from_le_bytes(k0), u64::from_le_bytes(k1))
}

/// One-shot SipHash-1-2 of `data` under `seed`.
pub fn siphash13(data: &[u8], seed: &[u8; 16]) -> u64 {
    let (k0, k1) = seed_words(seed);
    let mut state = State::new(k0, k1);

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        state.compress(u64::from_le_bytes(buf));
    }

    let mut b = (data.len() as u64) << 56;
    for (i, &byte) in chunks.remainder().iter().enumerate() {
        b |= u64::from(byte) << (8 * i);
    }
    state.finalize(b)
}

/// Streaming SipHash-1-2 implementing [`Hasher`].
///
/// Buffers at most 7 trailing bytes between writes; everything else is
/// folded into the running state immediately.
#[derive(Clone)]
pub struct SipHasher13 {
    state: State,
    length: usize,
    tail: u64,
    ntail: usize,
}

impl SipHasher13 {
    /// Hasher keyed by a 16-byte seed.
    pub fn from_seed(seed: &[u8; 16]) -> Self {
        let (k0, k1) = seed_words(seed);
        Self::new_with_keys(k0, k1)
    }

    fn new_with_keys(k0: u64, k1: u64) -> Self {
        Self {
            state: State::new(k0, k1),
            length: 0,
            tail: 0,
            ntail: 0,
        }
    }
}

impl Hasher for SipHasher13 {
    fn write(&mut self, mut msg: &[u8]) {
        self.length = self.length.wrapping_add(msg.len());

        if self.ntail > 0 {
            let take = (8 - self.ntail).min(msg.len());
            for &byte in &msg[..take] {
                self.tail |= u64::from(byte) << (8 * self.ntail);
                self.ntail += 1;
            }
            msg = &msg[take..];
            if self.ntail < 8 {
                return;
            }
            self.state.compress(self.tail);
            self.tail = 0;
            self.ntail = 0;
        }

        let mut chunks = msg.chunks_exact(8);
        for chunk in &mut chunks {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            self.state.compress(u64::from_le_bytes(buf));
        }
        for &byte in chunks.remainder() {
            self.tail |= u64::from(byte) << (8 * self.ntail);
            self.ntail += 1;
        }
    }

    fn finish(&self) -> u64 {
        let b = ((self.length as u64) << 56) | self.tail;
        self.state.finalize(b)
    }
}

/// Seed carrier implementing [`BuildHasher`]; one per table/set/cache
/// instance. Copyable so composed structures can share a drawn seed.
#[derive(Clone, Copy, Debug)]
pub struct SipBuildHasher {
    k0: u64,
    k1: u64,
}

impl SipBuildHasher {
    /// Build from a fixed 16-byte seed (deterministic; used by tests and by
    /// anything that needs reproducible placement).
    pub fn from_seed(seed: [u8; 16]) -> Self {
        let (k0, k1) = seed_words(&seed);
        Self { k0, k1 }
    }

    /// Draw a fresh seed from an entropy source.
    pub fn from_entropy(source: &mut EntropySource) -> Self {
        Self::from_seed(source.seed16())
    }
}

impl Default for SipBuildHasher {
    fn default() -> Self {
        Self::from_entropy(&mut EntropySource::new())
    }
}

impl BuildHasher for SipBuildHasher {
    type Hasher = SipHasher13;

    fn build_hasher(&self) -> SipHasher13 {
        SipHasher13::new_with_keys(self.k0, self.k1)
    }
}

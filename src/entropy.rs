//! Random seed source.
//!
//! Each table, set, and cache draws its 16-byte hash seed from an
//! [`EntropySource`] at construction. The source is an explicit value rather
//! than process-global state: callers who care can build one, inspect
//! whether it is degraded, and hand out seeds from it.
//!
//! The primary path reads system entropy via `getrandom`. If that fails, the
//! source falls back to a seed mixed from the wall clock and the process id.
//! The fallback has materially weaker entropy than the primary path; it is
//! kept for behavioral fidelity with environments where no entropy device is
//! available, and [`EntropySource::is_degraded`] reports which path was
//! taken. Either way, output bytes are stretched from the internal key with
//! a keyed-hash counter-mode stream, so repeated draws from one source never
//! repeat.

use crate::sip::siphash13;
use std::time::{SystemTime, UNIX_EPOCH};

/// Stream generator for hash seeds.
pub struct EntropySource {
    key: [u8; 16],
    counter: u64,
    degraded: bool,
}

impl EntropySource {
    /// Build a source keyed from system entropy, degrading to
    /// [`EntropySource::fallback`] if the system source is unavailable.
    pub fn new() -> Self {
        let mut key = [0u8; 16];
        match getrandom::getrandom(&mut key) {
            Ok(()) => Self {
                key,
                counter: 0,
                degraded: false,
            },
            Err(_) => Self::fallback(),
        }
    }

    /// Low-entropy fallback: wall clock mixed with the process id. Weak by
    /// construction; only suitable when no system entropy exists.
    pub fn fallback() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let pid = u64::from(std::process::id());
        let lo = (now.as_nanos() as u64) ^ pid.wrapping_mul(0x9e3779b97f4a7c15);
        let hi = now.subsec_nanos() as u64 ^ pid.rotate_left(32) ^ lo.rotate_left(17);

        let mut key = [0u8; 16];
        key[..8].copy_from_slice(&lo.to_le_bytes());
        key[8..].copy_from_slice(&hi.to_le_bytes());
        Self {
            key,
            counter: 0,
            degraded: true,
        }
    }

    /// Deterministic source for tests and reproducible placement.
    pub fn from_seed(key: [u8; 16]) -> Self {
        Self {
            key,
            counter: 0,
            degraded: false,
        }
    }

    /// True when this source was keyed via the weak time/pid path.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Fill `buf` from the keyed counter-mode stream. The counter advances
    /// one step per 8-byte block, so successive calls produce fresh bytes.
    pub fn fill(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let block = siphash13(&self.counter.to_le_bytes(), &self.key);
            self.counter = self.counter.wrapping_add(1);
            chunk.copy_from_slice(&block.to_le_bytes()[..chunk.len()]);
        }
    }

    /// Draw one 16-byte hash seed.
    pub fn seed16(&mut self) -> [u8; 16] {
        let mut seed = [0u8; 16];
        self.fill(&mut seed);
        seed
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: a seeded source replays the same stream.
    #[test]
    fn seeded_source_is_deterministic() {
        let mut a = EntropySource::from_seed([7; 16]);
        let mut b = EntropySource::from_seed([7; 16]);
        assert_eq!(a.seed16(), b.seed16());
        assert_eq!(a.seed16(), b.seed16());
    }

    /// Invariant: the counter advances, so draws from one source differ.
    #[test]
    fn successive_draws_differ() {
        let mut src = EntropySource::from_seed([7; 16]);
        assert_ne!(src.seed16(), src.seed16());
    }

    /// Invariant: partial trailing blocks are filled, not skipped.
    #[test]
    fn fill_handles_unaligned_lengths() {
        let mut src = EntropySource::from_seed([3; 16]);
        for len in [1usize, 7, 8, 9, 15, 16, 17] {
            let mut buf = vec![0u8; len];
            src.fill(&mut buf);
            // A run of all zeros from a keyed PRF of this length is
            // vanishingly unlikely with a fixed test seed.
            assert!(buf.iter().any(|&b| b != 0), "len={len}");
        }
    }

    /// Invariant: the degraded path is observable and still usable.
    #[test]
    fn fallback_is_flagged_and_fills() {
        let mut src = EntropySource::fallback();
        assert!(src.is_degraded());
        let first = src.seed16();
        let second = src.seed16();
        assert_ne!(first, second);
    }

    #[test]
    fn primary_path_not_flagged() {
        let src = EntropySource::new();
        assert!(!src.is_degraded());
    }
}

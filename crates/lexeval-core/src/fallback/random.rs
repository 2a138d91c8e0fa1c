//! Randomness sources for fallback selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks an index into a non-empty pool.
///
/// Injected into [`FallbackContent`](super::FallbackContent) so tests can
/// make selection deterministic.
pub trait RandomSource {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Uniform selection from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Uniform selection from a seeded generator, reproducible across runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

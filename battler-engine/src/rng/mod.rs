//! Deterministic random number generation for battles.
//!
//! Every random decision in a battle draws from one generator seeded at construction, so a
//! battle replays exactly for the same seed and the same choices.

pub mod rand_util;

use std::any::Any;

use rand::Rng;

/// A pseudo-random number generator that can be deterministically replayed.
pub trait PseudoRandomNumberGenerator: Send + Sync {
    /// Returns the initial seed the generator was created with.
    fn initial_seed(&self) -> u64;

    /// Returns the next integer in the sequence.
    fn next(&mut self) -> u64;

    /// Mutable cast to [`Any`] for tests that swap in a controlled generator.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Linear congruential generator used by default.
pub struct RealPseudoRandomNumberGenerator {
    initial_seed: u64,
    seed: u64,
}

impl RealPseudoRandomNumberGenerator {
    /// Creates a new generator, drawing a fresh seed when none is given.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            initial_seed: seed,
            seed,
        }
    }

    fn next_seed(seed: u64) -> u64 {
        // Generation V and VI constants.
        const A: u64 = 0x5D588B656C078965;
        const C: u64 = 0x0000000000269EC3;
        seed.wrapping_mul(A).wrapping_add(C)
    }
}

impl PseudoRandomNumberGenerator for RealPseudoRandomNumberGenerator {
    fn initial_seed(&self) -> u64 {
        self.initial_seed
    }

    fn next(&mut self) -> u64 {
        self.seed = Self::next_seed(self.seed);
        // Lower bits are predictable.
        self.seed >> 32
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Factory for the generator a battle uses.
pub type RngFactory = fn(seed: Option<u64>) -> Box<dyn PseudoRandomNumberGenerator>;

/// The default [`RngFactory`].
pub fn real_rng_factory(seed: Option<u64>) -> Box<dyn PseudoRandomNumberGenerator> {
    Box::new(RealPseudoRandomNumberGenerator::new(seed))
}

//! Entropy for unseeded construction
//!
//! The only non-deterministic input the generator ever takes is the starting
//! seed of an unseeded sampler. It comes through [`EntropySource`], so tests
//! can substitute a seeded RNG.

use rand::Rng;

/// A source of uniform integers in an inclusive range
pub trait EntropySource {
    /// Uniform integer in `min..=max`
    ///
    /// Callers guarantee `min <= max`.
    fn random_in(&mut self, min: u64, max: u64) -> u64;
}

impl<R: Rng + ?Sized> EntropySource for R {
    fn random_in(&mut self, min: u64, max: u64) -> u64 {
        self.gen_range(min..=max)
    }
}

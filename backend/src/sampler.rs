//! Full-cycle range sampler
//!
//! Draws integers from an inclusive range `[min, max]` so that every value is
//! produced exactly once before any value repeats.
//!
//! # Algorithm
//!
//! The sampler owns a [`ShiftRegister`] just wide enough to hold `max` and
//! steps it until the register value falls inside the range. The register
//! visits every value in `1..=2^N - 1` once per period and the range sits
//! inside that domain, so the filtered sequence visits every value in range
//! once per period too.
//!
//! Reducing the register value modulo the range size would be cheaper but
//! collides distinct register states onto the same output before the period
//! ends, so it cannot keep the no-repeat guarantee.
//!
//! # Cost
//!
//! A draw takes `(2^N - 1) / (max - min + 1)` steps on average and at most
//! `2^N - 1 - (max - min)` steps. Because `2^(N-1) <= max`, wide ranges
//! starting near 1 average fewer than two steps per draw. Narrow ranges high in
//! a wide register are slow (`min == max == 2^63` walks the whole 64-bit
//! period per draw) but never incorrect, so no step limit is imposed.
//!
//! # Critical Invariants
//!
//! - **Positive range**: `0 < min <= max`
//! - **Covering width**: `max <= 2^bits - 1`
//! - **Full cycle**: `max - min + 1` consecutive draws are a permutation of the range

use crate::entropy::EntropySource;
use crate::error::SequenceError;
use crate::lfsr::{max_register, required_bits, RegisterState, ShiftRegister};
use serde::{Deserialize, Serialize};

/// Exported sampler position
///
/// Persisting all four fields and feeding them back through
/// [`RangeSampler::from_state`] resumes the exact sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SamplerState {
    pub min: u64,
    pub max: u64,
    pub bits: u32,
    pub register: u64,
}

impl SamplerState {
    pub fn register_state(&self) -> RegisterState {
        RegisterState {
            bits: self.bits,
            register: self.register,
        }
    }
}

impl From<SamplerState> for (u64, u64, u32, u64) {
    fn from(state: SamplerState) -> Self {
        (state.min, state.max, state.bits, state.register)
    }
}

impl From<(u64, u64, u32, u64)> for SamplerState {
    fn from((min, max, bits, register): (u64, u64, u32, u64)) -> Self {
        SamplerState {
            min,
            max,
            bits,
            register,
        }
    }
}

/// Full-cycle pseudo-random sampler over `[min, max]`
///
/// # Example
/// ```
/// use randsn_core::RangeSampler;
///
/// let mut sampler = RangeSampler::with_seed(1, 7, 1).unwrap();
/// let mut cycle: Vec<u64> = (0..7).map(|_| sampler.next_value()).collect();
/// cycle.sort();
/// assert_eq!(cycle, vec![1, 2, 3, 4, 5, 6, 7]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSampler {
    min: u64,
    max: u64,
    lfsr: ShiftRegister,
}

impl RangeSampler {
    /// Create a sampler with a seed drawn from the thread RNG
    ///
    /// # Errors
    /// - [`SequenceError::ZeroMinimum`] if `min == 0`
    /// - [`SequenceError::InvertedRange`] if `max < min`
    pub fn new(min: u64, max: u64) -> Result<Self, SequenceError> {
        Self::with_entropy(min, max, &mut rand::thread_rng())
    }

    /// Create a sampler with a seed drawn uniformly from `[min, max]`
    pub fn with_entropy<E>(min: u64, max: u64, entropy: &mut E) -> Result<Self, SequenceError>
    where
        E: EntropySource + ?Sized,
    {
        validate_range(min, max)?;
        let seed = entropy.random_in(min, max);
        Self::with_seed(min, max, seed)
    }

    /// Create a sampler starting from a known seed
    ///
    /// The seed is the register's starting value: it is produced last in
    /// each cycle, after every other value in range.
    ///
    /// # Errors
    /// As [`RangeSampler::new`], plus [`SequenceError::SeedOutOfRange`] when
    /// `seed` is outside `[min, max]`.
    pub fn with_seed(min: u64, max: u64, seed: u64) -> Result<Self, SequenceError> {
        validate_range(min, max)?;
        if !(min..=max).contains(&seed) {
            return Err(SequenceError::SeedOutOfRange { seed, min, max });
        }
        let lfsr = ShiftRegister::new(seed, required_bits(max))?;
        Ok(Self { min, max, lfsr })
    }

    /// Optional-seed constructor mirroring the persisted configuration
    pub fn with_optional_seed(min: u64, max: u64, seed: Option<u64>) -> Result<Self, SequenceError> {
        match seed {
            Some(seed) => Self::with_seed(min, max, seed),
            None => Self::new(min, max),
        }
    }

    /// Rebuild a sampler at a previously exported position
    ///
    /// # Errors
    /// - range errors as [`RangeSampler::new`]
    /// - [`SequenceError::InvalidStateWidth`] if `bits` has no tap entry
    /// - [`SequenceError::WidthTooNarrow`] if the register cannot hold `max`
    /// - [`SequenceError::RegisterOutOfRange`] unless `0 < register < 2^bits`
    pub fn from_state(state: SamplerState) -> Result<Self, SequenceError> {
        validate_range(state.min, state.max)?;
        let lfsr = ShiftRegister::from_state(state.register_state())?;
        if max_register(lfsr.bits()) < state.max {
            return Err(SequenceError::WidthTooNarrow {
                bits: state.bits,
                max: state.max,
                required: required_bits(state.max),
            });
        }
        Ok(Self {
            min: state.min,
            max: state.max,
            lfsr,
        })
    }

    /// Draw the next value in the cycle
    pub fn next_value(&mut self) -> u64 {
        loop {
            let value = self.lfsr.step();
            if (self.min..=self.max).contains(&value) {
                return value;
            }
        }
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn bits(&self) -> u32 {
        self.lfsr.bits()
    }

    /// Number of draws before the sequence repeats (`max - min + 1`)
    pub fn period(&self) -> u64 {
        self.max - self.min + 1
    }

    pub fn state(&self) -> SamplerState {
        let register = self.lfsr.state();
        SamplerState {
            min: self.min,
            max: self.max,
            bits: register.bits,
            register: register.register,
        }
    }

    /// Restore a previously exported position
    ///
    /// On error the sampler keeps its current position.
    pub fn set_state(&mut self, state: SamplerState) -> Result<(), SequenceError> {
        *self = Self::from_state(state)?;
        Ok(())
    }
}

/// The sequence cycles forever; callers decide when to stop.
impl Iterator for RangeSampler {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

fn validate_range(min: u64, max: u64) -> Result<(), SequenceError> {
    if min == 0 {
        return Err(SequenceError::ZeroMinimum);
    }
    if max < min {
        return Err(SequenceError::InvertedRange { min, max });
    }
    Ok(())
}

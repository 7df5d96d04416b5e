//! Errors raised by the shift register and range sampler
//!
//! The generator has no I/O, so every failure is a deterministic rejection of
//! the caller's arguments. Nothing here is retryable.

use std::ops::RangeInclusive;
use thiserror::Error;

/// Errors from constructing or restoring a generator
///
/// Variants fall into two classes:
/// - **Configuration**: the requested register width has no tap entry.
/// - **Validation**: a seed, range or restored state breaks an invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Unsupported register width {bits}, choose a width in {}..={}", .supported.start(), .supported.end())]
    UnsupportedWidth {
        bits: u32,
        supported: RangeInclusive<u32>,
    },

    #[error("Seed must be nonzero")]
    ZeroSeed,

    #[error("Seed {seed} does not fit in a {bits}-bit register")]
    SeedTooWide { seed: u64, bits: u32 },

    #[error("Seed {seed} outside range {min}..={max}")]
    SeedOutOfRange { seed: u64, min: u64, max: u64 },

    #[error("Range minimum must be greater than 0")]
    ZeroMinimum,

    #[error("Range minimum {min} exceeds maximum {max}")]
    InvertedRange { min: u64, max: u64 },

    #[error("Register value {register} invalid for {bits} bits, expected 1..={max_register}")]
    RegisterOutOfRange {
        register: u64,
        bits: u32,
        max_register: u64,
    },

    #[error("Restored width {bits} is not a supported register width")]
    InvalidStateWidth { bits: u32 },

    #[error("A {bits}-bit register cannot reach maximum {max}, at least {required} bits needed")]
    WidthTooNarrow { bits: u32, max: u64, required: u32 },
}

impl SequenceError {
    /// True when the requested width has no tap configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, SequenceError::UnsupportedWidth { .. })
    }

    /// True when an argument or restored state failed validation
    pub fn is_validation(&self) -> bool {
        !self.is_configuration()
    }
}

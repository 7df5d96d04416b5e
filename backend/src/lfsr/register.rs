//! Fibonacci linear-feedback shift register
//!
//! ```text
//! 8 bits, taps 8, 6, 5, 4
//!
//!   bit     7 6 5 4 3 2 1 0
//!   tap     1 2 3 4 5 6 7 8
//!   read          x x x   x
//!
//!   next = (register >> 1) | (parity(read bits) << 7)
//! ```
//!
//! Tap t reads bit `N - t`: taps count down from the most significant end of
//! the register, so tap N (the width) reads bit 0.
//!
//! # Determinism
//!
//! The next value depends only on `(bits, register)`, so a saved
//! [`RegisterState`] resumes the sequence exactly.

use super::taps::{max_register, supported_widths, taps_for};
use crate::error::SequenceError;
use serde::{Deserialize, Serialize};

/// Exported register configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterState {
    /// Register width in bits
    pub bits: u32,
    /// Register contents, always in `1..=2^bits - 1`
    pub register: u64,
}

impl From<RegisterState> for (u32, u64) {
    fn from(state: RegisterState) -> Self {
        (state.bits, state.register)
    }
}

impl From<(u32, u64)> for RegisterState {
    fn from((bits, register): (u32, u64)) -> Self {
        RegisterState { bits, register }
    }
}

/// Maximal-length shift register over a supported width
///
/// # Example
/// ```
/// use randsn_core::ShiftRegister;
///
/// let mut lfsr = ShiftRegister::new(1, 3).unwrap();
/// let sequence: Vec<u64> = (0..7).map(|_| lfsr.step()).collect();
/// assert_eq!(sequence, vec![4, 2, 5, 6, 7, 3, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRegister {
    bits: u32,
    register: u64,
    taps: &'static [u32],
    /// One bit set per tap, at the position the tap reads
    feedback_mask: u64,
}

impl ShiftRegister {
    /// Create a register of `bits` width starting at `seed`
    ///
    /// # Errors
    /// - [`SequenceError::UnsupportedWidth`] if `bits` has no tap entry
    /// - [`SequenceError::ZeroSeed`] if `seed` is 0
    /// - [`SequenceError::SeedTooWide`] if `seed` needs more than `bits` bits
    pub fn new(seed: u64, bits: u32) -> Result<Self, SequenceError> {
        let taps = taps_for(bits)?;
        if seed == 0 {
            return Err(SequenceError::ZeroSeed);
        }
        if seed > max_register(bits) {
            return Err(SequenceError::SeedTooWide { seed, bits });
        }

        Ok(Self {
            bits,
            register: seed,
            taps,
            feedback_mask: feedback_mask(bits, taps),
        })
    }

    /// Rebuild a register from an exported state
    pub fn from_state(state: RegisterState) -> Result<Self, SequenceError> {
        validate_state(state)?;
        Self::new(state.register, state.bits)
    }

    /// Advance one step and return the new register value
    ///
    /// The feedback bit is the parity of the tapped bits of the current
    /// value. It enters at the top as everything shifts one place down.
    pub fn step(&mut self) -> u64 {
        let feedback = u64::from((self.register & self.feedback_mask).count_ones() & 1);
        self.register = (self.register >> 1) | (feedback << (self.bits - 1));
        self.register
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn register(&self) -> u64 {
        self.register
    }

    /// Tap positions in use, counted from the most significant end
    pub fn taps(&self) -> &'static [u32] {
        self.taps
    }

    /// Number of steps before the register returns to its current value
    pub fn period(&self) -> u64 {
        max_register(self.bits)
    }

    pub fn state(&self) -> RegisterState {
        RegisterState {
            bits: self.bits,
            register: self.register,
        }
    }

    /// Restore a previously exported state
    ///
    /// On error the register keeps its current configuration.
    ///
    /// # Errors
    /// - [`SequenceError::InvalidStateWidth`] if `bits` has no tap entry
    /// - [`SequenceError::RegisterOutOfRange`] unless `0 < register < 2^bits`
    pub fn set_state(&mut self, state: RegisterState) -> Result<(), SequenceError> {
        *self = Self::from_state(state)?;
        Ok(())
    }
}

fn feedback_mask(bits: u32, taps: &[u32]) -> u64 {
    taps.iter().fold(0, |mask, &tap| mask | (1u64 << (bits - tap)))
}

fn validate_state(state: RegisterState) -> Result<(), SequenceError> {
    if !supported_widths().contains(&state.bits) {
        return Err(SequenceError::InvalidStateWidth { bits: state.bits });
    }
    let max_register = max_register(state.bits);
    if state.register == 0 || state.register > max_register {
        return Err(SequenceError::RegisterOutOfRange {
            register: state.register,
            bits: state.bits,
            max_register,
        });
    }
    Ok(())
}

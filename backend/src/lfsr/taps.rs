//! Maximal-length tap table
//!
//! Each entry lists the exponents of a primitive feedback polynomial over
//! GF(2), numbered 1..=N with N the register width (the constant term is
//! implied). A Fibonacci register tapped this way cycles through all
//! `2^N - 1` nonzero states before repeating.
//!
//! # Critical Invariants
//!
//! - **Dense**: widths start at [`MIN_BITS`] and run without gaps to [`MAX_BITS`]
//! - **Primitive**: every entry yields a period of exactly `2^N - 1`
//! - **Leading tap**: every entry starts with N itself, so the bit shifted out
//!   of the register always feeds back

use crate::error::SequenceError;
use std::ops::RangeInclusive;

/// Smallest supported register width
pub const MIN_BITS: u32 = 2;

/// Largest supported register width
pub const MAX_BITS: u32 = 64;

/// Tap positions indexed by `width - MIN_BITS`
static TAP_TABLE: [&[u32]; (MAX_BITS - MIN_BITS + 1) as usize] = [
    &[2, 1],
    &[3, 2],
    &[4, 3],
    &[5, 3],
    &[6, 5],
    &[7, 6],
    &[8, 6, 5, 4],
    &[9, 5],
    &[10, 7],
    &[11, 9],
    &[12, 6, 4, 1],
    &[13, 4, 3, 1],
    &[14, 5, 3, 1],
    &[15, 14],
    &[16, 15, 13, 4],
    &[17, 14],
    &[18, 11],
    &[19, 6, 2, 1],
    &[20, 17],
    &[21, 19],
    &[22, 21],
    &[23, 18],
    &[24, 23, 22, 17],
    &[25, 22],
    &[26, 6, 2, 1],
    &[27, 5, 2, 1],
    &[28, 25],
    &[29, 27],
    &[30, 6, 4, 1],
    &[31, 28],
    &[32, 22, 2, 1],
    &[33, 20],
    &[34, 27, 2, 1],
    &[35, 33],
    &[36, 25],
    &[37, 5, 4, 3, 2, 1],
    &[38, 6, 5, 1],
    &[39, 35],
    &[40, 38, 21, 19],
    &[41, 38],
    &[42, 41, 20, 19],
    &[43, 42, 38, 37],
    &[44, 43, 18, 17],
    &[45, 44, 42, 41],
    &[46, 45, 26, 25],
    &[47, 42],
    &[48, 47, 21, 20],
    &[49, 40],
    &[50, 49, 24, 23],
    &[51, 50, 36, 35],
    &[52, 49],
    &[53, 52, 38, 37],
    &[54, 53, 18, 17],
    &[55, 31],
    &[56, 55, 35, 34],
    &[57, 50],
    &[58, 39],
    &[59, 58, 38, 37],
    &[60, 59],
    &[61, 60, 46, 45],
    &[62, 61, 6, 5],
    &[63, 62],
    &[64, 63, 61, 60],
];

/// Range of register widths with a tap entry
pub fn supported_widths() -> RangeInclusive<u32> {
    MIN_BITS..=MAX_BITS
}

/// Look up the tap positions for a register width
///
/// # Errors
/// Returns [`SequenceError::UnsupportedWidth`] when `bits` has no entry.
///
/// # Example
/// ```
/// use randsn_core::lfsr::taps_for;
///
/// assert_eq!(taps_for(3).unwrap(), &[3, 2]);
/// assert!(taps_for(65).is_err());
/// ```
pub fn taps_for(bits: u32) -> Result<&'static [u32], SequenceError> {
    if !supported_widths().contains(&bits) {
        return Err(SequenceError::UnsupportedWidth {
            bits,
            supported: supported_widths(),
        });
    }
    Ok(TAP_TABLE[(bits - MIN_BITS) as usize])
}

/// Largest value a register of `bits` width can hold (`2^bits - 1`)
pub fn max_register(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Smallest supported width whose register can hold `max`
///
/// This is the bit length of `max`, floored at [`MIN_BITS`].
///
/// # Example
/// ```
/// use randsn_core::lfsr::required_bits;
///
/// assert_eq!(required_bits(1), 2);
/// assert_eq!(required_bits(7), 3);
/// assert_eq!(required_bits(8), 4);
/// assert_eq!(required_bits(u64::MAX), 64);
/// ```
pub fn required_bits(max: u64) -> u32 {
    (u64::BITS - max.leading_zeros()).max(MIN_BITS)
}

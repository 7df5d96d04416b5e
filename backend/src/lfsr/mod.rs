//! Linear-feedback shift register engine
//!
//! A register of width N steps through every nonzero N-bit value exactly once
//! per period of `2^N - 1` steps. Zero is never entered.

mod register;
mod taps;

pub use register::{RegisterState, ShiftRegister};
pub use taps::{max_register, required_bits, supported_widths, taps_for, MAX_BITS, MIN_BITS};

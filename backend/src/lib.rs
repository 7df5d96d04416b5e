//! RandSN Core - full-cycle serial number generation
//!
//! Hands out non-sequential, non-repeating serial numbers from a fixed range
//! without storing the set of serials already used.
//!
//! # Architecture
//!
//! - **lfsr**: Maximal-length shift register and its tap table
//! - **sampler**: Rejection sampler restricting the register to `[min, max]`
//! - **entropy**: Seed source for unseeded samplers
//! - **config**: Persisted range, prefix and resume seed
//! - **batch**: Batch planning, code formatting and issuing
//!
//! # Critical Invariants
//!
//! 1. Every value in `[min, max]` is drawn exactly once before any repeats
//! 2. Generation is deterministic given `(min, max, bits, register)`
//! 3. The generator is not cryptographically secure: past serials predict future ones
//!
//! # Example
//!
//! ```
//! use randsn_core::RangeSampler;
//!
//! let mut first = RangeSampler::with_seed(50, 100, 75).unwrap();
//! first.next_value();
//!
//! let mut resumed = RangeSampler::from_state(first.state()).unwrap();
//! assert_eq!(resumed.next_value(), first.next_value());
//! ```

// Module declarations
pub mod batch;
pub mod config;
pub mod entropy;
pub mod error;
pub mod lfsr;
pub mod sampler;

// Re-exports for convenience
pub use batch::{
    generate_batch, issue_to_file, issue_to_writer, write_batch, Batch, BatchError, Codes,
    SerialCode,
};
pub use config::{ConfigError, ConfigLocation, SerialConfig};
pub use entropy::EntropySource;
pub use error::SequenceError;
pub use lfsr::{RegisterState, ShiftRegister};
pub use sampler::{RangeSampler, SamplerState};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn randsn_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::sampler::PyRangeSampler>()?;
    Ok(())
}

//! PyO3 wrapper for RangeSampler

use pyo3::prelude::*;

use super::to_py_err;
use crate::sampler::{RangeSampler, SamplerState};

/// Python wrapper for Rust RangeSampler
///
/// # Example (from Python)
///
/// ```python
/// from randsn_core import FullCycleRandom
///
/// fcr = FullCycleRandom(1, 10000)
/// first = fcr.next()
///
/// state = fcr.get_state()
/// resumed = FullCycleRandom(1, 10)
/// resumed.set_state(*state)
/// assert resumed.next() == fcr.next()
/// ```
#[pyclass(name = "FullCycleRandom")]
pub struct PyRangeSampler {
    inner: RangeSampler,
}

#[pymethods]
impl PyRangeSampler {
    /// Create a sampler over `[min_int, max_int]`
    ///
    /// Raises ValueError if the range or seed is invalid.
    #[new]
    #[pyo3(signature = (min_int, max_int, seed=None))]
    fn new(min_int: u64, max_int: u64, seed: Option<u64>) -> PyResult<Self> {
        let inner = RangeSampler::with_optional_seed(min_int, max_int, seed).map_err(to_py_err)?;
        Ok(PyRangeSampler { inner })
    }

    /// Next value in the cycle
    fn next(&mut self) -> u64 {
        self.inner.next_value()
    }

    /// State as `(min_int, max_int, n_bits, register)`
    fn get_state(&self) -> (u64, u64, u32, u64) {
        self.inner.state().into()
    }

    /// Resume from a tuple produced by `get_state`
    fn set_state(&mut self, min_int: u64, max_int: u64, n_bits: u32, register: u64) -> PyResult<()> {
        let state = SamplerState::from((min_int, max_int, n_bits, register));
        self.inner.set_state(state).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        let state = self.inner.state();
        format!(
            "FullCycleRandom(min_int={}, max_int={}, n_bits={}, register={})",
            state.min, state.max, state.bits, state.register
        )
    }
}

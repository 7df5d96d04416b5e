//! Python bindings
//!
//! Exposes the range sampler to Python under the name the code generator
//! scripts already use (`FullCycleRandom`).

pub mod sampler;

use pyo3::prelude::*;

use crate::error::SequenceError;

/// Map a sequence error onto Python's `ValueError`
pub(crate) fn to_py_err(err: SequenceError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

//! Python-boundary helpers shared by the PyO3 classes in `lib.rs`.
//!
//! Conversions from arbitrary Python inputs into contiguous `f64` arrays, and
//! a generic bridge that runs the [`SimulationEngine`] for any [`Dgp`] and
//! hands the results to NumPy without copying.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Array → PyArray
    PyArray2,
    PyArray3,
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    dgp::traits::Dgp,
    simulation::{SimOptions, SimulationEngine},
};

/// Accept a 1-D NumPy array, a pandas Series, or a sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned θ vector from any 1-D Python input.
#[cfg(feature = "python-bindings")]
pub fn extract_theta<'py>(py: Python<'py>, raw_theta: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_theta)?;
    Ok(arr.as_array().to_owned())
}

/// One engine per Python call; `seed = None` draws from entropy.
#[cfg(feature = "python-bindings")]
fn engine(seed: Option<u64>) -> SimulationEngine {
    SimulationEngine::new(SimOptions { seed, ..SimOptions::default() })
}

/// `generate` for any DGP: `(data K × S × N, params S × nparams)` as NumPy arrays.
#[cfg(feature = "python-bindings")]
pub fn py_generate<'py, D: Dgp>(
    py: Python<'py>, dgp: &D, s: usize, seed: Option<u64>,
) -> PyResult<(Bound<'py, PyArray3<f64>>, Bound<'py, PyArray2<f64>>)> {
    let (data, params) = py.allow_threads(|| engine(seed).generate(dgp, s))?;
    Ok((data.into_pyarray(py), params.into_pyarray(py)))
}

/// `generate_at` for any DGP: `K × S × N` as a NumPy array.
#[cfg(feature = "python-bindings")]
pub fn py_generate_at<'py, D: Dgp>(
    py: Python<'py>, dgp: &D, raw_theta: &Bound<'py, PyAny>, s: usize, seed: Option<u64>,
) -> PyResult<Bound<'py, PyArray3<f64>>> {
    let theta = extract_theta(py, raw_theta)?;
    let data = py.allow_threads(|| engine(seed).generate_at(theta.view(), dgp, s))?;
    Ok(data.into_pyarray(py))
}

/// `priordraw` for any DGP: `S × nparams` as a NumPy array.
#[cfg(feature = "python-bindings")]
pub fn py_priordraw<'py, D: Dgp>(
    py: Python<'py>, dgp: &D, s: usize, seed: Option<u64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let params = engine(seed).priordraw(dgp, s)?;
    Ok(params.into_pyarray(py))
}

//! deep_simulated_moments — simulation-based inference with neural estimators.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the reference models and the layout helpers to Python via the
//! `_deep_simulated_moments` extension module.
//!
//! Key behaviors
//! -------------
//! - [`dgp`]: the data generating process contract, prior families, and the
//!   MA(2), logit, and GARCH(1,1) reference models.
//! - [`simulation`]: batched prior draws and dataset generation in the
//!   canonical `nfeatures × S × N` layout, in parallel and reproducibly.
//! - [`layout`]: conversions to the convolutional and sequence layouts
//!   (`tabular2conv` / `tabular2rnn` in Python).
//! - [`network`]: temporal blocks and the TCN estimator.
//! - [`inference`]: the SMM criterion for any statistic map.
//! - With the `python-bindings` feature, `#[pyclass]` wrappers and the
//!   `#[pymodule]` initializer.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue and error mapping.
//! - Errors are subsystem enums classified by [`errors::ErrorKind`] and
//!   converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. Construct a model, e.g. `Ma2::new(100)?`, or implement [`dgp::Dgp`].
//!   2. `SimulationEngine::seeded(seed).generate(&dgp, s)?` for
//!      `(data, params)`.
//!   3. `to_conv_layout(data.view())` and `Tcn::for_dgp(&dgp, ..)?.forward(..)`
//!      for a `nparams × S` batch of estimates.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; integration tests under `tests/`
//!   run the full pipeline, a user-defined model, and network properties.

pub mod dgp;
pub mod errors;
pub mod inference;
pub mod layout;
pub mod network;
pub mod numerical_stability;
pub mod simulation;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2, PyArray3, PyArray4, PyReadonlyArray3};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    dgp::{Dgp, Garch, Logit, Ma2},
    layout::{to_conv_layout, to_sequence_layout},
    utils::{py_generate, py_generate_at, py_priordraw},
};

/// One `#[pymethods]` block per DGP class: the given constructor plus the
/// shape queries and simulation methods shared by every class.
#[cfg(feature = "python-bindings")]
macro_rules! py_dgp_methods {
    ($ty:ty, { $($ctor:tt)* }) => {
        #[pymethods]
        impl $ty {
            $($ctor)*

            /// Dimension of one observation.
            #[getter]
            pub fn nfeatures(&self) -> usize {
                self.inner.nfeatures()
            }

            /// Dimension of θ.
            #[getter]
            pub fn nparams(&self) -> usize {
                self.inner.nparams()
            }

            /// Observations per dataset.
            #[getter]
            pub fn nobs(&self) -> usize {
                self.inner.nobs()
            }

            /// `S × nparams` prior draws.
            #[pyo3(signature = (s, seed = None))]
            pub fn priordraw<'py>(
                &self, py: Python<'py>, s: usize, seed: Option<u64>,
            ) -> PyResult<Bound<'py, PyArray2<f64>>> {
                py_priordraw(py, &self.inner, s, seed)
            }

            /// `(data, params)` with data `nfeatures × S × N`, params `S × nparams`.
            #[pyo3(signature = (s, seed = None))]
            pub fn generate<'py>(
                &self, py: Python<'py>, s: usize, seed: Option<u64>,
            ) -> PyResult<(Bound<'py, PyArray3<f64>>, Bound<'py, PyArray2<f64>>)> {
                py_generate(py, &self.inner, s, seed)
            }

            /// `nfeatures × S × N` datasets simulated at a fixed θ.
            #[pyo3(signature = (theta, s, seed = None))]
            pub fn generate_at<'py>(
                &self, py: Python<'py>, theta: &Bound<'py, PyAny>, s: usize, seed: Option<u64>,
            ) -> PyResult<Bound<'py, PyArray3<f64>>> {
                py_generate_at(py, &self.inner, theta, s, seed)
            }
        }
    };
}

/// MA2 — Python-facing MA(2) reference model.
///
/// Constructed from Python via `MA2(n)`; θ = (θ₁, θ₂), prior uniform over
/// the invertibility triangle.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "MA2", module = "deep_simulated_moments.dgp")]
pub struct PyMa2 {
    inner: Ma2,
}

#[cfg(feature = "python-bindings")]
py_dgp_methods!(PyMa2, {
    #[new]
    pub fn new(n: usize) -> PyResult<Self> {
        Ok(PyMa2 { inner: Ma2::new(n)? })
    }
});

/// Logit — Python-facing logistic-regression reference model.
///
/// Constructed from Python via `Logit(n, k)`; features are the `k`
/// covariates (intercept first) followed by the binary outcome.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "Logit", module = "deep_simulated_moments.dgp")]
pub struct PyLogit {
    inner: Logit,
}

#[cfg(feature = "python-bindings")]
py_dgp_methods!(PyLogit, {
    #[new]
    pub fn new(n: usize, k: usize) -> PyResult<Self> {
        Ok(PyLogit { inner: Logit::new(n, k)? })
    }
});

/// GARCH — Python-facing GARCH(1,1) reference model.
///
/// Constructed from Python via `GARCH(n, burn_in=100)`; θ =
/// (long-run variance, persistence, share of persistence on the lagged
/// variance).
#[cfg(feature = "python-bindings")]
#[pyclass(name = "GARCH", module = "deep_simulated_moments.dgp")]
pub struct PyGarch {
    inner: Garch,
}

#[cfg(feature = "python-bindings")]
py_dgp_methods!(PyGarch, {
    #[new]
    #[pyo3(signature = (n, burn_in = dgp::DEFAULT_BURN_IN))]
    pub fn new(n: usize, burn_in: usize) -> PyResult<Self> {
        Ok(PyGarch { inner: Garch::with_burn_in(n, burn_in)? })
    }
});

/// `K × S × T` → `1 × T × K × S` convolutional layout.
#[cfg(feature = "python-bindings")]
#[pyfunction]
pub fn tabular2conv<'py>(
    py: Python<'py>, data: PyReadonlyArray3<'py, f64>,
) -> Bound<'py, PyArray4<f64>> {
    to_conv_layout(data.as_array()).into_pyarray(py)
}

/// `K × S × T` → list of `T` arrays of shape `K × S`, one per time step.
#[cfg(feature = "python-bindings")]
#[pyfunction]
pub fn tabular2rnn<'py>(
    py: Python<'py>, data: PyReadonlyArray3<'py, f64>,
) -> Vec<Bound<'py, PyArray2<f64>>> {
    to_sequence_layout(data.as_array()).into_iter().map(|step| step.into_pyarray(py)).collect()
}

/// Module initializer for `_deep_simulated_moments`.
///
/// Creates the `dgp` and `layout` submodules, attaches them to the parent
/// module, and registers them in `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _deep_simulated_moments<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let dgp_mod = PyModule::new(py, "dgp")?;
    dgp_mod.add_class::<PyMa2>()?;
    dgp_mod.add_class::<PyLogit>()?;
    dgp_mod.add_class::<PyGarch>()?;
    m.add_submodule(&dgp_mod)?;

    let layout_mod = PyModule::new(py, "layout")?;
    layout_mod.add_function(wrap_pyfunction!(tabular2conv, &layout_mod)?)?;
    layout_mod.add_function(wrap_pyfunction!(tabular2rnn, &layout_mod)?)?;
    m.add_submodule(&layout_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    let modules = py.import("sys")?.getattr("modules")?;
    modules.set_item("deep_simulated_moments.dgp", dgp_mod)?;
    modules.set_item("deep_simulated_moments.layout", layout_mod)?;
    Ok(())
}

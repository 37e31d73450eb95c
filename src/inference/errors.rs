//! Unified error handling for SMM criterion evaluation.
//!
//! This module defines `InferenceError`, the error type of
//! [`crate::inference::SmmEvaluator`]. It wraps simulation failures from the
//! DGP layer and adds the failure modes of the statistic map (wrong shape,
//! non-finite entries, user errors). An alias `InferenceResult<T>`
//! standardizes the return type.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{dgp::errors::DgpError, errors::ErrorKind};

/// Unified error type for SMM evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Configuration ----
    /// A covariance estimate needs at least two simulated datasets.
    TooFewSimulations { s: usize },

    // ---- Inputs ----
    /// Observed statistic contains a NaN or infinite entry.
    NonFiniteObserved { index: usize, value: f64 },

    // ---- Statistic map ----
    /// The statistic map returned a matrix that is not `P × S`.
    StatisticShape { expected: (usize, usize), actual: (usize, usize) },

    /// The statistic map returned a non-finite entry.
    NonFiniteStatistic { row: usize, column: usize, value: f64 },

    /// The statistic map itself failed.
    Statistic(String),

    // ---- Simulation ----
    Dgp(DgpError),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl InferenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InferenceError::TooFewSimulations { .. } => ErrorKind::Configuration,
            InferenceError::NonFiniteObserved { .. } | InferenceError::Statistic(_) => {
                ErrorKind::InvalidArgument
            }
            InferenceError::StatisticShape { .. } => ErrorKind::DimensionMismatch,
            InferenceError::NonFiniteStatistic { .. } => ErrorKind::Numerical,
            InferenceError::Dgp(err) => err.kind(),
        }
    }
}

impl From<DgpError> for InferenceError {
    fn from(err: DgpError) -> Self {
        InferenceError::Dgp(err)
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InferenceError::Dgp(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            InferenceError::TooFewSimulations { s } => {
                write!(f, "Inference Error: at least 2 simulations are required; got {s}")
            }

            // ---- Inputs ----
            InferenceError::NonFiniteObserved { index, value } => {
                write!(f, "Inference Error: observed statistic at index {index} is not finite ({value})")
            }

            // ---- Statistic map ----
            InferenceError::StatisticShape { expected, actual } => write!(
                f,
                "Inference Error: statistic matrix has shape {actual:?}; expected {expected:?}"
            ),
            InferenceError::NonFiniteStatistic { row, column, value } => write!(
                f,
                "Inference Error: statistic {row} of simulation {column} is not finite ({value})"
            ),
            InferenceError::Statistic(msg) => write!(f, "Inference Error: statistic failed: {msg}"),

            // ---- Simulation ----
            InferenceError::Dgp(err) => write!(f, "Inference Error: {err}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<InferenceError> for PyErr {
    fn from(err: InferenceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

//! Errors for data generating processes and batched simulation.
//!
//! This module defines [`DgpError`], the single error type returned by DGP
//! constructors, prior draws, parameter validation, and the simulation
//! engine, together with the [`DgpResult`] alias.
//!
//! ## Conventions
//! - **Indices are 0-based.** Parameter indices refer to positions in θ;
//!   column indices refer to the sample axis `S` of a batch.
//! - Length problems are always reported as
//!   [`DgpError::ParamLengthMismatch`]; a mismatched θ is never truncated or
//!   padded.
//! - `statrs` distribution-construction failures are normalized into
//!   [`DgpError::InvalidPriorDistribution`].
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use statrs::distribution::{NormalError, UniformError};

use crate::errors::ErrorKind;

/// Result alias for DGP and simulation operations.
pub type DgpResult<T> = Result<T, DgpError>;

/// Unified error type for DGPs and the simulation engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DgpError {
    // ---- Call-time arguments ----
    /// The number of draws / datasets must be at least 1.
    InvalidSampleCount { s: usize },

    /// θ has the wrong length for the DGP.
    ParamLengthMismatch { expected: usize, actual: usize },

    /// θ contains a NaN or infinite coordinate.
    NonFiniteParam { index: usize, value: f64 },

    /// θ coordinate lies outside the DGP's parameter space.
    InvalidParam { index: usize, value: f64, reason: &'static str },

    // ---- Construction ----
    /// DGP configuration value is invalid.
    InvalidConfig { field: &'static str, value: usize, reason: &'static str },

    /// A prior marginal could not be constructed.
    InvalidPriorDistribution { family: &'static str, reason: String },

    // ---- Simulation ----
    /// A simulated dataset does not have shape `N × nfeatures`.
    SimulationShape { column: usize, expected: (usize, usize), actual: (usize, usize) },

    /// A simulated dataset contains a non-finite value.
    NonFiniteSimulation { column: usize, row: usize, feature: usize, value: f64 },
}

impl DgpError {
    /// Coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DgpError::InvalidSampleCount { .. }
            | DgpError::NonFiniteParam { .. }
            | DgpError::InvalidParam { .. } => ErrorKind::InvalidArgument,
            DgpError::ParamLengthMismatch { .. } | DgpError::SimulationShape { .. } => {
                ErrorKind::DimensionMismatch
            }
            DgpError::InvalidConfig { .. } | DgpError::InvalidPriorDistribution { .. } => {
                ErrorKind::Configuration
            }
            DgpError::NonFiniteSimulation { .. } => ErrorKind::Numerical,
        }
    }
}

impl std::error::Error for DgpError {}

impl std::fmt::Display for DgpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Call-time arguments ----
            DgpError::InvalidSampleCount { s } => {
                write!(f, "Number of samples must be at least 1; got: {s}")
            }
            DgpError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector length mismatch: expected {expected}, got {actual}")
            }
            DgpError::NonFiniteParam { index, value } => {
                write!(f, "Parameter at index {index} must be finite; got: {value}")
            }
            DgpError::InvalidParam { index, value, reason } => {
                write!(f, "Parameter at index {index} is outside the parameter space ({value}). {reason}")
            }
            // ---- Construction ----
            DgpError::InvalidConfig { field, value, reason } => {
                write!(f, "Invalid DGP configuration: {field} = {value}. {reason}")
            }
            DgpError::InvalidPriorDistribution { family, reason } => {
                write!(f, "Invalid {family} prior marginal: {reason}")
            }
            // ---- Simulation ----
            DgpError::SimulationShape { column, expected, actual } => {
                write!(
                    f,
                    "Simulated dataset for column {column} has shape {actual:?}; expected {expected:?}"
                )
            }
            DgpError::NonFiniteSimulation { column, row, feature, value } => {
                write!(
                    f,
                    "Simulated dataset for column {column} is non-finite at row {row}, feature {feature}: {value}"
                )
            }
        }
    }
}

impl From<NormalError> for DgpError {
    fn from(err: NormalError) -> DgpError {
        DgpError::InvalidPriorDistribution { family: "normal", reason: err.to_string() }
    }
}

impl From<UniformError> for DgpError {
    fn from(err: UniformError) -> DgpError {
        DgpError::InvalidPriorDistribution { family: "uniform", reason: err.to_string() }
    }
}

/// Convert a [`DgpError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<DgpError> for PyErr {
    fn from(err: DgpError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Each variant reports the documented error kind.
    //
    // Given
    // -----
    // - One instance of every variant.
    //
    // Expect
    // ------
    // - Sample-count and domain errors are InvalidArgument, length/shape
    //   errors are DimensionMismatch, construction errors are Configuration.
    fn kind_classifies_every_variant() {
        assert_eq!(DgpError::InvalidSampleCount { s: 0 }.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            DgpError::ParamLengthMismatch { expected: 2, actual: 3 }.kind(),
            ErrorKind::DimensionMismatch
        );
        assert_eq!(
            DgpError::NonFiniteParam { index: 0, value: f64::NAN }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            DgpError::InvalidParam { index: 1, value: 1.5, reason: "" }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            DgpError::InvalidConfig { field: "n", value: 0, reason: "" }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            DgpError::SimulationShape { column: 0, expected: (1, 1), actual: (2, 1) }.kind(),
            ErrorKind::DimensionMismatch
        );
        assert_eq!(
            DgpError::NonFiniteSimulation { column: 0, row: 0, feature: 0, value: f64::INFINITY }
                .kind(),
            ErrorKind::Numerical
        );
    }

    #[test]
    fn display_embeds_payload() {
        let msg = DgpError::ParamLengthMismatch { expected: 3, actual: 2 }.to_string();
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn statrs_errors_convert_into_prior_errors() {
        let err: DgpError = statrs::distribution::Uniform::new(1.0, 0.0).unwrap_err().into();
        assert!(matches!(err, DgpError::InvalidPriorDistribution { family: "uniform", .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}

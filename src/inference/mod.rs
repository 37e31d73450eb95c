//! inference — simulated method of moments on top of the simulation engine.
//!
//! Purpose
//! -------
//! Provide the classical counterpart of the neural estimator: an SMM
//! criterion that compares statistics of observed data with statistics of
//! data simulated at a candidate θ. Any statistic map can be plugged in,
//! including a trained [`crate::network::Tcn`], which turns the network's
//! outputs into moments.
//!
//! Key behaviors
//! -------------
//! - [`SmmEvaluator`] simulates `S` datasets at θ, applies the statistic
//!   map, and returns the criterion with its mean, covariance, and weight
//!   matrix in an [`SmmEvaluation`].
//! - [`symmetric_pseudo_inverse`] computes the eigenvalue-truncated inverse
//!   used for the weight matrix.
//! - [`InferenceError`] / [`InferenceResult`] cover statistic-map failures
//!   and wrap simulation errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Statistic matrices are `P × S` with one column per simulated dataset.
//! - The evaluator never minimizes; optimization over θ is out of scope.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the pseudoinverse on full-rank and rank-deficient
//!   matrices, the zero/quadratic behavior of the criterion, and every
//!   error path. Integration tests feed TCN outputs as statistics.

pub mod errors;
pub mod smm;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::smm::{SmmEvaluation, SmmEvaluator, symmetric_pseudo_inverse};

//! numerical_stability — numerically robust scalar transforms and tolerances.
//!
//! Purpose
//! -------
//! Collect the small numerical helpers shared by the DGP layer and the
//! inference layer so that they agree on tolerances and on how overflow-prone
//! transforms are evaluated.
//!
//! Key behaviors
//! -------------
//! - Provide a stable logistic transform (`safe_logistic`) used by the
//!   logistic-regression DGP to turn log-odds into success probabilities.
//! - Centralize the eigenvalue truncation tolerance (`EIGEN_EPS`) used by the
//!   SMM weighting matrix pseudoinverse.
//!
//! Conventions
//! -----------
//! - Pure functions on `f64`; no I/O, no logging, no global state.
//! - Domain validation happens upstream in the DGP and inference layers.

pub mod transformations;

pub use self::transformations::{EIGEN_EPS, safe_logistic};

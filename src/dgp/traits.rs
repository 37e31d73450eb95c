//! The data generating process contract.
//!
//! Purpose
//! -------
//! Define [`Dgp`], the capability set every parametric model exposes to the
//! rest of the crate: shape queries, prior draws, parameter validation, and
//! single-dataset simulation. Batch generation lives in
//! [`crate::simulation::SimulationEngine`] and is written once against this
//! trait.
//!
//! Key behaviors
//! -------------
//! - `nfeatures`, `nparams`, `nobs` are pure functions of the configuration
//!   fixed at construction; they never depend on draws or data.
//! - `simulate` is the single unit of simulation. Both batch paths
//!   (random θ per column and fixed θ for every column) call it with the
//!   same signature, so datasets produced at the same θ are identically
//!   distributed by construction.
//! - `priordraw` stacks `S` independent calls to `draw_prior` into an
//!   `S × nparams` matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Implementors hold configuration only, never accumulated simulation
//!   state; `&self` methods may be called from many threads at once.
//! - Randomness always comes from the caller-supplied RNG, which the
//!   caller owns exclusively for the duration of the call.
//! - `simulate` returns an `nobs × nfeatures` array (one row per
//!   observation). The engine checks this and rejects anything else.
//!
//! Conventions
//! -----------
//! - θ is an `ndarray` view of length `nparams`; implementors call
//!   [`check_theta_length_and_finite`] (directly or through the default
//!   `validate_theta`) before using it.
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;

use crate::dgp::errors::{DgpError, DgpResult};

/// Parametric statistical model that can be sampled and simulated.
pub trait Dgp: Send + Sync {
    /// Short human-readable model name (used in logs and error context).
    fn name(&self) -> &'static str;

    /// Dimension of one observation, including any modeled outcome.
    fn nfeatures(&self) -> usize;

    /// Dimension of the parameter vector θ.
    fn nparams(&self) -> usize;

    /// Number of observations `N` in one simulated dataset.
    fn nobs(&self) -> usize;

    /// Draw a single parameter vector from the prior.
    fn draw_prior<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64>;

    /// Simulate one `nobs × nfeatures` dataset at θ.
    ///
    /// Implementations may assume θ already passed [`Dgp::validate_theta`].
    fn simulate<R: Rng + ?Sized>(
        &self, theta: ArrayView1<f64>, rng: &mut R,
    ) -> DgpResult<Array2<f64>>;

    /// Validate a caller-supplied θ.
    ///
    /// The default checks length and finiteness. Models with a restricted
    /// parameter space override this and add their domain checks.
    ///
    /// # Errors
    /// - [`DgpError::ParamLengthMismatch`] if `theta.len() != nparams()`.
    /// - [`DgpError::NonFiniteParam`] for NaN/±∞ coordinates.
    fn validate_theta(&self, theta: ArrayView1<f64>) -> DgpResult<()> {
        check_theta_length_and_finite(theta, self.nparams())
    }

    /// Draw `s` i.i.d. parameter vectors, returned as an `s × nparams` matrix.
    ///
    /// # Errors
    /// [`DgpError::InvalidSampleCount`] if `s == 0`.
    fn priordraw<R: Rng + ?Sized>(&self, s: usize, rng: &mut R) -> DgpResult<Array2<f64>> {
        validate_sample_count(s)?;
        let mut draws = Array2::zeros((s, self.nparams()));
        for mut row in draws.rows_mut() {
            let draw = self.draw_prior(rng);
            if draw.len() != row.len() {
                return Err(DgpError::ParamLengthMismatch { expected: row.len(), actual: draw.len() });
            }
            row.assign(&draw);
        }
        Ok(draws)
    }
}

/// Reject a zero batch size.
pub fn validate_sample_count(s: usize) -> DgpResult<()> {
    if s == 0 {
        return Err(DgpError::InvalidSampleCount { s });
    }
    Ok(())
}

/// Check θ length against `expected` and reject non-finite coordinates.
pub fn check_theta_length_and_finite(theta: ArrayView1<f64>, expected: usize) -> DgpResult<()> {
    if theta.len() != expected {
        return Err(DgpError::ParamLengthMismatch { expected, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(DgpError::NonFiniteParam { index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn sample_count_zero_is_rejected() {
        assert_eq!(validate_sample_count(0), Err(DgpError::InvalidSampleCount { s: 0 }));
        assert!(validate_sample_count(1).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Length is checked before finiteness and never coerced.
    //
    // Given
    // -----
    // - A length-3 θ against an expected length of 2, and a length-2 θ
    //   holding a NaN.
    //
    // Expect
    // ------
    // - ParamLengthMismatch for the first, NonFiniteParam at index 1 for the
    //   second.
    fn theta_checks_report_length_then_finiteness() {
        let long = array![0.1, 0.2, 0.3];
        assert_eq!(
            check_theta_length_and_finite(long.view(), 2),
            Err(DgpError::ParamLengthMismatch { expected: 2, actual: 3 })
        );
        let nan = array![0.1, f64::NAN];
        assert!(matches!(
            check_theta_length_and_finite(nan.view(), 2),
            Err(DgpError::NonFiniteParam { index: 1, .. })
        ));
        assert!(check_theta_length_and_finite(array![0.0, 1.0].view(), 2).is_ok());
    }
}

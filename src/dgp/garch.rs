//! GARCH(1,1) — conditionally heteroskedastic returns.
//!
//! Purpose
//! -------
//! Reference volatility model:
//! `r_t = √h_t · z_t`, `h_{t+1} = ω + α r_t² + β h_t`, `z_t ~ N(0, 1)` i.i.d.
//!
//! Key behaviors
//! -------------
//! - θ is expressed in a stationarity-respecting parameterization
//!   `(lrv, persistence, share)`:
//!   `ω = lrv · (1 − persistence)`, `β = share · persistence`,
//!   `α = persistence − β`. Every θ inside the box below is covariance
//!   stationary with unconditional variance `lrv`.
//! - The variance recursion starts at `h_0 = lrv` and runs through
//!   `burn_in` discarded observations before the `n` recorded ones.
//!
//! Invariants & assumptions
//! ------------------------
//! - Prior: `lrv ~ U(1e-4, 1)`, `persistence ~ U(0, 0.99)`, `share ~ U(0, 1)`.
//! - Fixed θ must satisfy `lrv > 0`, `0 ≤ persistence < 1`,
//!   `0 ≤ share ≤ 1`; anything else is an [`DgpError::InvalidParam`].
//!
//! Downstream usage
//! ----------------
//! - [`GarchParams::from_theta`] recovers the recursion coefficients, e.g.
//!   for reporting estimated models on the conventional scale.
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::dgp::{
    errors::{DgpError, DgpResult},
    prior::{Marginal, ProductPrior},
    traits::{Dgp, check_theta_length_and_finite},
};

/// Default number of discarded warm-up observations.
pub const DEFAULT_BURN_IN: usize = 100;

/// Recursion coefficients `(ω, α, β)` of a GARCH(1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GarchParams {
    pub omega: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl GarchParams {
    /// Map `(lrv, persistence, share)` to `(ω, α, β)`.
    ///
    /// No validation; pair with [`Dgp::validate_theta`] for caller input.
    pub fn from_theta(theta: ArrayView1<f64>) -> Self {
        debug_assert_eq!(theta.len(), 3, "GARCH(1,1) expects θ = (lrv, persistence, share)");
        let (lrv, persistence, share) = (theta[0], theta[1], theta[2]);
        let beta = share * persistence;
        GarchParams { omega: lrv * (1.0 - persistence), alpha: persistence - beta, beta }
    }

    /// `α + β`.
    pub fn persistence(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Unconditional variance `ω / (1 − α − β)`.
    pub fn unconditional_variance(&self) -> f64 {
        self.omega / (1.0 - self.persistence())
    }
}

/// GARCH(1,1) with `n` recorded observations after `burn_in` warm-up steps.
#[derive(Debug, Clone)]
pub struct Garch {
    n: usize,
    burn_in: usize,
    prior: ProductPrior,
}

impl Garch {
    /// GARCH(1,1) with [`DEFAULT_BURN_IN`] warm-up steps.
    ///
    /// # Errors
    /// [`DgpError::InvalidConfig`] if `n == 0`.
    pub fn new(n: usize) -> DgpResult<Self> {
        Garch::with_burn_in(n, DEFAULT_BURN_IN)
    }

    /// GARCH(1,1) with an explicit warm-up length (`0` is allowed).
    ///
    /// # Errors
    /// [`DgpError::InvalidConfig`] if `n == 0`.
    pub fn with_burn_in(n: usize, burn_in: usize) -> DgpResult<Self> {
        if n == 0 {
            return Err(DgpError::InvalidConfig {
                field: "n",
                value: n,
                reason: "A GARCH dataset needs at least one observation.",
            });
        }
        let prior = ProductPrior::new(vec![
            Marginal::uniform(1e-4, 1.0)?,
            Marginal::uniform(0.0, 0.99)?,
            Marginal::uniform(0.0, 1.0)?,
        ]);
        Ok(Garch { n, burn_in, prior })
    }

    /// Number of discarded warm-up observations.
    pub fn burn_in(&self) -> usize {
        self.burn_in
    }
}

impl Dgp for Garch {
    fn name(&self) -> &'static str {
        "GARCH"
    }

    fn nfeatures(&self) -> usize {
        1
    }

    fn nparams(&self) -> usize {
        3
    }

    fn nobs(&self) -> usize {
        self.n
    }

    fn draw_prior<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        self.prior.sample(rng)
    }

    fn validate_theta(&self, theta: ArrayView1<f64>) -> DgpResult<()> {
        check_theta_length_and_finite(theta, self.nparams())?;
        if theta[0] <= 0.0 {
            return Err(DgpError::InvalidParam {
                index: 0,
                value: theta[0],
                reason: "Long-run variance must be strictly positive.",
            });
        }
        if !(0.0..1.0).contains(&theta[1]) {
            return Err(DgpError::InvalidParam {
                index: 1,
                value: theta[1],
                reason: "Persistence must lie in [0, 1).",
            });
        }
        if !(0.0..=1.0).contains(&theta[2]) {
            return Err(DgpError::InvalidParam {
                index: 2,
                value: theta[2],
                reason: "Share of persistence on the lagged variance must lie in [0, 1].",
            });
        }
        Ok(())
    }

    fn simulate<R: Rng + ?Sized>(
        &self, theta: ArrayView1<f64>, rng: &mut R,
    ) -> DgpResult<Array2<f64>> {
        let GarchParams { omega, alpha, beta } = GarchParams::from_theta(theta);
        let mut h = theta[0];
        let mut out = Array2::zeros((self.n, 1));
        for t in 0..self.burn_in + self.n {
            let z: f64 = rng.sample(StandardNormal);
            let r = h.sqrt() * z;
            if t >= self.burn_in {
                out[[t - self.burn_in, 0]] = r;
            }
            h = omega + alpha * r * r + beta * h;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    // Purpose
    // -------
    // The reparameterization recovers conventional coefficients.
    //
    // Given
    // -----
    // - θ = (0.5, 0.9, 0.8).
    //
    // Expect
    // ------
    // - β = 0.72, α = 0.18, ω = 0.05, unconditional variance 0.5.
    fn from_theta_recovers_recursion_coefficients() {
        let p = GarchParams::from_theta(array![0.5, 0.9, 0.8].view());
        assert_relative_eq!(p.beta, 0.72, epsilon = 1e-12);
        assert_relative_eq!(p.alpha, 0.18, epsilon = 1e-12);
        assert_relative_eq!(p.omega, 0.05, epsilon = 1e-12);
        assert_relative_eq!(p.unconditional_variance(), 0.5, epsilon = 1e-12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "GARCH(1,1) expects θ = (lrv, persistence, share)")]
    fn simulate_with_short_theta_fails_loudly() {
        let dgp = Garch::new(5).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let _ = dgp.simulate(array![0.4, 0.5].view(), &mut rng);
    }

    #[test]
    fn prior_draws_respect_the_box() {
        let dgp = Garch::new(10).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let draws = dgp.priordraw(1000, &mut rng).unwrap();
        for row in draws.rows() {
            assert!(dgp.validate_theta(row).is_ok());
            assert!(row[1] <= 0.99);
        }
    }

    #[test]
    // Purpose
    // -------
    // Domain checks reject out-of-support coordinates with their index.
    //
    // Given
    // -----
    // - Non-positive lrv, persistence of 1, share above 1, wrong length.
    //
    // Expect
    // ------
    // - InvalidParam at indices 0, 1, 2; ParamLengthMismatch for the last.
    fn validate_theta_reports_offending_coordinate() {
        let dgp = Garch::new(10).unwrap();
        assert!(matches!(
            dgp.validate_theta(array![0.0, 0.5, 0.5].view()),
            Err(DgpError::InvalidParam { index: 0, .. })
        ));
        assert!(matches!(
            dgp.validate_theta(array![1.0, 1.0, 0.5].view()),
            Err(DgpError::InvalidParam { index: 1, .. })
        ));
        assert!(matches!(
            dgp.validate_theta(array![1.0, 0.5, 1.5].view()),
            Err(DgpError::InvalidParam { index: 2, .. })
        ));
        assert!(matches!(
            dgp.validate_theta(array![1.0, 0.5].view()),
            Err(DgpError::ParamLengthMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Sample variance of a long path matches the long-run variance.
    //
    // Given
    // -----
    // - θ = (0.4, 0.6, 0.7) (moderate persistence, finite fourth moment),
    //   N = 200_000.
    //
    // Expect
    // ------
    // - Sample variance within 5% of 0.4; mean near 0.
    fn long_path_variance_matches_lrv() {
        let dgp = Garch::new(200_000).unwrap();
        let mut rng = StdRng::seed_from_u64(23);
        let r = dgp.simulate(array![0.4, 0.6, 0.7].view(), &mut rng).unwrap();
        let r = r.column(0);
        let mean = r.mean().unwrap();
        let var = r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / r.len() as f64;
        assert!(mean.abs() < 0.01);
        assert_relative_eq!(var, 0.4, max_relative = 0.05);
    }
}

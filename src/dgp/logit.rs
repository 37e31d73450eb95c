//! Logit — logistic-regression reference model.
//!
//! Binary outcomes from linear-in-parameters log-odds:
//! `P(y_t = 1 | x_t) = σ(x_tᵀ θ)`, with covariates `x_t = (1, z_{t,2}, …,
//! z_{t,k})`, `z ~ N(0, 1)` i.i.d.
//!
//! ## Layout
//! - `nparams = k` (intercept plus `k − 1` slopes).
//! - `nfeatures = k + 1`: the `k` covariate columns followed by the outcome,
//!   so the constant column is part of the observation like any other
//!   covariate.
//!
//! ## Prior
//! Independent standard-normal coordinates.
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{
    dgp::{
        errors::{DgpError, DgpResult},
        prior::{Marginal, ProductPrior},
        traits::Dgp,
    },
    numerical_stability::safe_logistic,
};

/// Logistic regression with `n` observations and `k` covariates (incl. intercept).
#[derive(Debug, Clone)]
pub struct Logit {
    n: usize,
    k: usize,
    prior: ProductPrior,
}

impl Logit {
    /// Construct a logit DGP.
    ///
    /// # Errors
    /// [`DgpError::InvalidConfig`] if `n == 0` or `k == 0`.
    pub fn new(n: usize, k: usize) -> DgpResult<Self> {
        if n == 0 {
            return Err(DgpError::InvalidConfig {
                field: "n",
                value: n,
                reason: "A logit dataset needs at least one observation.",
            });
        }
        if k == 0 {
            return Err(DgpError::InvalidConfig {
                field: "k",
                value: k,
                reason: "A logit model needs at least the intercept covariate.",
            });
        }
        let prior = ProductPrior::new(vec![Marginal::standard_normal(); k]);
        Ok(Logit { n, k, prior })
    }

    /// Number of covariates, including the intercept.
    pub fn covariates(&self) -> usize {
        self.k
    }
}

impl Dgp for Logit {
    fn name(&self) -> &'static str {
        "Logit"
    }

    fn nfeatures(&self) -> usize {
        self.k + 1
    }

    fn nparams(&self) -> usize {
        self.k
    }

    fn nobs(&self) -> usize {
        self.n
    }

    fn draw_prior<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        self.prior.sample(rng)
    }

    fn simulate<R: Rng + ?Sized>(
        &self, theta: ArrayView1<f64>, rng: &mut R,
    ) -> DgpResult<Array2<f64>> {
        debug_assert_eq!(theta.len(), self.k, "Logit expects one coefficient per covariate");
        let k = self.k;
        let mut data = Array2::zeros((self.n, k + 1));
        for mut row in data.rows_mut() {
            row[0] = 1.0;
            for j in 1..k {
                row[j] = rng.sample(StandardNormal);
            }
            let log_odds = row.slice(ndarray::s![..k]).dot(&theta);
            let u: f64 = rng.gen();
            row[k] = if u < safe_logistic(log_odds) { 1.0 } else { 0.0 };
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn shape_queries_follow_configuration() {
        let dgp = Logit::new(50, 3).unwrap();
        assert_eq!(dgp.nfeatures(), 4);
        assert_eq!(dgp.nparams(), 3);
        assert_eq!(dgp.nobs(), 50);
        assert!(matches!(Logit::new(50, 0), Err(DgpError::InvalidConfig { field: "k", .. })));
        assert!(matches!(Logit::new(0, 2), Err(DgpError::InvalidConfig { field: "n", .. })));
    }

    #[test]
    // Purpose
    // -------
    // Simulated datasets carry an intercept column and a binary outcome.
    //
    // Given
    // -----
    // - k = 3, N = 500, θ = (0.5, -1.0, 2.0).
    //
    // Expect
    // ------
    // - Column 0 is all ones; the last column only holds 0.0 or 1.0.
    fn simulate_has_intercept_and_binary_outcome() {
        let dgp = Logit::new(500, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let data = dgp.simulate(array![0.5, -1.0, 2.0].view(), &mut rng).unwrap();
        assert_eq!(data.dim(), (500, 4));
        assert!(data.column(0).iter().all(|&v| v == 1.0));
        assert!(data.column(3).iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Logit expects one coefficient per covariate")]
    fn simulate_with_short_theta_fails_loudly() {
        let dgp = Logit::new(5, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let _ = dgp.simulate(array![0.5, 1.0].view(), &mut rng);
    }

    #[test]
    // Purpose
    // -------
    // The outcome frequency tracks the intercept-only success probability.
    //
    // Given
    // -----
    // - k = 1 (intercept only), θ = (1.2), N = 100_000.
    //
    // Expect
    // ------
    // - Mean outcome within 0.01 of σ(1.2) ≈ 0.7685.
    fn intercept_only_success_rate_matches_logistic() {
        let dgp = Logit::new(100_000, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let data = dgp.simulate(array![1.2].view(), &mut rng).unwrap();
        let rate = data.column(1).mean().unwrap();
        assert!((rate - safe_logistic(1.2)).abs() < 0.01);
    }
}

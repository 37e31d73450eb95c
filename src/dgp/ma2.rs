//! MA(2) — second-order moving-average reference process.
//!
//! Purpose
//! -------
//! Provide the simplest autocorrelated reference DGP:
//! `y_t = ε_t + θ₁ ε_{t−1} + θ₂ ε_{t−2}` with `ε_t ~ N(0, 1)` i.i.d.
//!
//! Key behaviors
//! -------------
//! - One feature (`y_t`), two parameters `(θ₁, θ₂)`.
//! - Prior: uniform over the invertibility triangle
//!   `{|θ₂| < 1, θ₁ + θ₂ > −1, θ₂ − θ₁ > −1}`, drawn by rejection from the
//!   box `[−2, 2] × [−1, 1]` (acceptance rate one half).
//! - Each dataset draws `N + 2` innovations so the first observation already
//!   has both lags; there is no start-up transient.
//!
//! Invariants & assumptions
//! ------------------------
//! - Any finite θ is accepted by `simulate`; invertibility is a property of
//!   the prior, not a requirement on fixed-θ evaluation.
//! - Autocovariances at θ are available in closed form via
//!   [`Ma2::autocovariances`].
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::dgp::{
    errors::{DgpError, DgpResult},
    prior::{Marginal, ProductPrior},
    traits::Dgp,
};

/// MA(2) process with `n` observations per dataset.
#[derive(Debug, Clone)]
pub struct Ma2 {
    n: usize,
    prior: ProductPrior,
}

impl Ma2 {
    /// Construct an MA(2) DGP producing `n` observations per dataset.
    ///
    /// # Errors
    /// [`DgpError::InvalidConfig`] if `n == 0`.
    pub fn new(n: usize) -> DgpResult<Self> {
        if n == 0 {
            return Err(DgpError::InvalidConfig {
                field: "n",
                value: n,
                reason: "An MA(2) dataset needs at least one observation.",
            });
        }
        let prior = ProductPrior::with_constraint(
            vec![Marginal::uniform(-2.0, 2.0)?, Marginal::uniform(-1.0, 1.0)?],
            Ma2::is_invertible,
        );
        Ok(Ma2 { n, prior })
    }

    /// Whether `(θ₁, θ₂)` lies strictly inside the invertibility triangle.
    pub fn is_invertible(theta: ArrayView1<f64>) -> bool {
        let (t1, t2) = (theta[0], theta[1]);
        t2.abs() < 1.0 && t1 + t2 > -1.0 && t2 - t1 > -1.0
    }

    /// Theoretical autocovariances `[γ₀, γ₁, γ₂]` at θ (unit innovation variance).
    ///
    /// `γ₀ = 1 + θ₁² + θ₂²`, `γ₁ = θ₁ (1 + θ₂)`, `γ₂ = θ₂`; all higher lags are 0.
    pub fn autocovariances(theta: ArrayView1<f64>) -> [f64; 3] {
        let (t1, t2) = (theta[0], theta[1]);
        [1.0 + t1 * t1 + t2 * t2, t1 * (1.0 + t2), t2]
    }
}

impl Dgp for Ma2 {
    fn name(&self) -> &'static str {
        "MA2"
    }

    fn nfeatures(&self) -> usize {
        1
    }

    fn nparams(&self) -> usize {
        2
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
        debug_assert_eq!(theta.len(), self.nparams(), "MA(2) expects θ = (θ₁, θ₂)");
        let (t1, t2) = (theta[0], theta[1]);
        let eps: Vec<f64> = (0..self.n + 2).map(|_| rng.sample(StandardNormal)).collect();
        let mut y = Array2::zeros((self.n, 1));
        for (t, w) in eps.windows(3).enumerate() {
            // w = [ε_{t−2}, ε_{t−1}, ε_t]
            y[[t, 0]] = w[2] + t1 * w[1] + t2 * w[0];
        }
        Ok(y)
    }
}

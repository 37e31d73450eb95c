//! Prior families for DGP parameter vectors.
//!
//! Purpose
//! -------
//! Describe the prior distribution a DGP draws its training parameters from,
//! as a product of independent one-dimensional marginals, optionally
//! restricted to a region of the product support by rejection.
//!
//! Key behaviors
//! -------------
//! - [`Marginal`] wraps a `statrs` distribution (uniform or normal) and draws
//!   from it through the `rand` `Distribution` implementation.
//! - [`ProductPrior`] samples each coordinate independently and, when built
//!   with [`ProductPrior::with_constraint`], repeats the joint draw until the
//!   constraint accepts it.
//!
//! Invariants & assumptions
//! ------------------------
//! - Marginals are constructed once, at DGP construction time; sampling is
//!   infallible afterwards.
//! - A constraint must have positive probability under the product of
//!   marginals, otherwise rejection never terminates. Reference DGPs only
//!   use constraints whose acceptance rate is at least one half.
//!
//! Conventions
//! -----------
//! - Coordinates are ordered exactly as the DGP's θ layout.
//! - Sampling takes `&self`; the RNG is supplied (and exclusively owned) by
//!   the caller.
use ndarray::{Array1, ArrayView1};
use rand::Rng;
use statrs::distribution::{Normal, Uniform};

use crate::dgp::errors::DgpResult;

/// One independent prior coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marginal {
    /// Continuous uniform on `[min, max]`.
    Uniform(Uniform),
    /// Normal with the given mean and standard deviation.
    Normal(Normal),
}

impl Marginal {
    /// Uniform marginal on `[min, max]`.
    ///
    /// # Errors
    /// [`crate::dgp::errors::DgpError::InvalidPriorDistribution`] if the
    /// bounds are non-finite or `min >= max`.
    pub fn uniform(min: f64, max: f64) -> DgpResult<Self> {
        Ok(Marginal::Uniform(Uniform::new(min, max)?))
    }

    /// Normal marginal with mean `mean` and standard deviation `sd`.
    ///
    /// # Errors
    /// [`crate::dgp::errors::DgpError::InvalidPriorDistribution`] if `mean`
    /// is NaN or `sd` is not strictly positive.
    pub fn normal(mean: f64, sd: f64) -> DgpResult<Self> {
        Ok(Marginal::Normal(Normal::new(mean, sd)?))
    }

    /// Standard normal marginal.
    pub fn standard_normal() -> Self {
        Marginal::Normal(Normal::standard())
    }

    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Marginal::Uniform(dist) => rng.sample(dist),
            Marginal::Normal(dist) => rng.sample(dist),
        }
    }
}

/// Joint-support restriction applied by rejection.
pub type Constraint = fn(ArrayView1<f64>) -> bool;

/// Product of independent marginals, optionally restricted to a region.
#[derive(Debug, Clone)]
pub struct ProductPrior {
    marginals: Vec<Marginal>,
    constraint: Option<Constraint>,
}

impl ProductPrior {
    /// Unrestricted product prior.
    pub fn new(marginals: Vec<Marginal>) -> Self {
        ProductPrior { marginals, constraint: None }
    }

    /// Product prior restricted to `{θ : constraint(θ)}`.
    pub fn with_constraint(marginals: Vec<Marginal>, constraint: Constraint) -> Self {
        ProductPrior { marginals, constraint: Some(constraint) }
    }

    /// Number of coordinates.
    pub fn dim(&self) -> usize {
        self.marginals.len()
    }

    /// The marginals in θ order.
    pub fn marginals(&self) -> &[Marginal] {
        &self.marginals
    }

    /// Draw one parameter vector.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        loop {
            let draw: Array1<f64> = self.marginals.iter().map(|m| m.sample(rng)).collect();
            match self.constraint {
                Some(accept) if !accept(draw.view()) => continue,
                _ => return draw,
            }
        }
    }
}

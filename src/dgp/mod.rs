//! dgp — data generating processes: contract, priors, and reference models.
//!
//! Purpose
//! -------
//! Define what a parametric statistical model must provide to take part in
//! simulation-based inference, and ship the reference models used to train
//! and validate neural estimators. Everything downstream (the simulation
//! engine, the SMM evaluator, the Python bindings) is written once against
//! the [`Dgp`] trait.
//!
//! Key behaviors
//! -------------
//! - [`Dgp`] declares shape queries (`nfeatures`, `nparams`, `nobs`), prior
//!   draws, θ validation, and single-dataset simulation, and provides
//!   `priordraw` for `S × nparams` parameter batches.
//! - [`prior`] builds priors as products of `statrs` marginals, optionally
//!   restricted by rejection.
//! - Reference models: [`Ma2`], [`Logit`], [`Garch`], plus the tagged union
//!   [`ReferenceDgp`] for callers that pick a model at runtime.
//!
//! Invariants & assumptions
//! ------------------------
//! - Models hold configuration only. All randomness flows through a
//!   caller-owned RNG, which keeps models `Send + Sync` and lets the engine
//!   simulate columns in parallel.
//! - `nfeatures`, `nparams`, `nobs` are ≥ 1 for every constructed model;
//!   constructors reject configurations that would violate this.
//!
//! Conventions
//! -----------
//! - θ layouts and prior families are part of each model's documented
//!   contract (see the model modules).
//! - Single datasets are time-major `nobs × nfeatures` arrays; the engine
//!   assembles them into the canonical `nfeatures × S × nobs` tensor.
//!
//! Downstream usage
//! ----------------
//! - User models implement [`Dgp`] (five required methods) and immediately
//!   work with [`crate::simulation::SimulationEngine`].
//!
//! Testing notes
//! -------------
//! - Each model module tests its shapes, prior support, and a moment of the
//!   simulated data against a closed form. Integration tests exercise a
//!   user-defined model through the engine.

pub mod errors;
pub mod garch;
pub mod logit;
pub mod ma2;
pub mod prior;
pub mod traits;

use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DgpError, DgpResult};
pub use self::garch::{DEFAULT_BURN_IN, Garch, GarchParams};
pub use self::logit::Logit;
pub use self::ma2::Ma2;
pub use self::prior::{Marginal, ProductPrior};
pub use self::traits::Dgp;

/// Runtime choice among the reference models.
#[derive(Debug, Clone)]
pub enum ReferenceDgp {
    Ma2(Ma2),
    Logit(Logit),
    Garch(Garch),
}

macro_rules! delegate {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            ReferenceDgp::Ma2($inner) => $body,
            ReferenceDgp::Logit($inner) => $body,
            ReferenceDgp::Garch($inner) => $body,
        }
    };
}

impl Dgp for ReferenceDgp {
    fn name(&self) -> &'static str {
        delegate!(self, d => d.name())
    }

    fn nfeatures(&self) -> usize {
        delegate!(self, d => d.nfeatures())
    }

    fn nparams(&self) -> usize {
        delegate!(self, d => d.nparams())
    }

    fn nobs(&self) -> usize {
        delegate!(self, d => d.nobs())
    }

    fn draw_prior<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        delegate!(self, d => d.draw_prior(rng))
    }

    fn validate_theta(&self, theta: ArrayView1<f64>) -> DgpResult<()> {
        delegate!(self, d => d.validate_theta(theta))
    }

    fn simulate<R: Rng + ?Sized>(
        &self, theta: ArrayView1<f64>, rng: &mut R,
    ) -> DgpResult<Array2<f64>> {
        delegate!(self, d => d.simulate(theta, rng))
    }
}

impl From<Ma2> for ReferenceDgp {
    fn from(d: Ma2) -> Self {
        ReferenceDgp::Ma2(d)
    }
}

impl From<Logit> for ReferenceDgp {
    fn from(d: Logit) -> Self {
        ReferenceDgp::Logit(d)
    }
}

impl From<Garch> for ReferenceDgp {
    fn from(d: Garch) -> Self {
        ReferenceDgp::Garch(d)
    }
}

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        Dgp, DgpError, DgpResult, Garch, GarchParams, Logit, Ma2, Marginal, ProductPrior,
        ReferenceDgp,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The tagged union forwards every query to the wrapped model.
    //
    // Given
    // -----
    // - One wrapped instance of each reference model.
    //
    // Expect
    // ------
    // - Names and shape queries match the unwrapped models; GARCH domain
    //   checks survive the wrapping.
    fn reference_dgp_delegates_to_variant() {
        let models: Vec<ReferenceDgp> = vec![
            Ma2::new(20).unwrap().into(),
            Logit::new(30, 2).unwrap().into(),
            Garch::new(40).unwrap().into(),
        ];
        let expected = [("MA2", 1, 2, 20), ("Logit", 3, 2, 30), ("GARCH", 1, 3, 40)];
        for (dgp, (name, k, p, n)) in models.iter().zip(expected) {
            assert_eq!(dgp.name(), name);
            assert_eq!(dgp.nfeatures(), k);
            assert_eq!(dgp.nparams(), p);
            assert_eq!(dgp.nobs(), n);
        }
        assert!(matches!(
            models[2].validate_theta(array![1.0, 1.2, 0.5].view()),
            Err(DgpError::InvalidParam { index: 1, .. })
        ));
    }
}

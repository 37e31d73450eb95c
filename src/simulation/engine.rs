//! SimulationEngine — batched prior draws and dataset generation.
//!
//! Purpose
//! -------
//! Turn any [`Dgp`] into training batches for a neural estimator: draw `S`
//! parameter vectors from the prior and simulate one dataset per vector, or
//! simulate `S` datasets at a fixed θ. The batch logic is written once here
//! against the trait, so every model (reference or user-defined) gets the
//! same shape guarantees and the same parallel execution.
//!
//! Key behaviors
//! -------------
//! - `generate` returns `(data, params)` with `data` of shape
//!   `nfeatures × S × nobs` (canonical layout, standard order) and `params`
//!   of shape `S × nparams`. Column `i` of `data` was simulated at row `i` of
//!   `params`.
//! - `generate_at` validates θ through [`Dgp::validate_theta`] and then runs
//!   the same per-column path with θ held fixed.
//! - Each column has its own `StdRng`, seeded from a seed drawn from the
//!   engine's master RNG before any column runs. Columns are therefore
//!   independent of execution order, and the rayon path reproduces the
//!   sequential path exactly.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every simulated dataset must be `nobs × nfeatures` and finite; anything
//!   else aborts the batch with [`DgpError::SimulationShape`] or
//!   [`DgpError::NonFiniteSimulation`]. When several columns fail, the error
//!   of the lowest column index is returned. No partial tensor is returned.
//! - The master RNG is owned by the engine and only touched through
//!   `&mut self`; repeated calls advance it, so they yield fresh draws.
//!
//! Conventions
//! -----------
//! - Logging uses `tracing` at `debug` for batch boundaries and `warn` for
//!   failed columns. The library never installs a subscriber.
use ndarray::{Array2, Array3, ArrayView1, Axis};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    dgp::{
        errors::{DgpError, DgpResult},
        traits::{Dgp, validate_sample_count},
    },
    simulation::options::SimOptions,
};

/// Batched simulator with an exclusively owned master RNG.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    rng: StdRng,
    opts: SimOptions,
}

impl SimulationEngine {
    /// Build an engine, seeding the master RNG from `opts.seed` or entropy.
    pub fn new(opts: SimOptions) -> SimulationEngine {
        let rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SimulationEngine { rng, opts }
    }

    /// Engine seeded with `seed`, parallel execution.
    pub fn seeded(seed: u64) -> SimulationEngine {
        SimulationEngine::new(SimOptions::seeded(seed))
    }

    pub fn options(&self) -> &SimOptions {
        &self.opts
    }

    /// Draw `s` prior parameter vectors as an `s × nparams` matrix.
    ///
    /// # Errors
    /// [`DgpError::InvalidSampleCount`] if `s == 0`.
    pub fn priordraw<D: Dgp>(&mut self, dgp: &D, s: usize) -> DgpResult<Array2<f64>> {
        dgp.priordraw(s, &mut self.rng)
    }

    /// Draw `s` parameter vectors and simulate one dataset for each.
    ///
    /// Returns `(data, params)` with `data` of shape `nfeatures × s × nobs`
    /// and `params` of shape `s × nparams`.
    ///
    /// # Errors
    /// - [`DgpError::InvalidSampleCount`] if `s == 0`.
    /// - Any error of [`Dgp::simulate`], or a shape / finiteness violation of
    ///   a simulated dataset (lowest failing column).
    pub fn generate<D: Dgp>(
        &mut self, dgp: &D, s: usize,
    ) -> DgpResult<(Array3<f64>, Array2<f64>)> {
        validate_sample_count(s)?;
        let params = dgp.priordraw(s, &mut self.rng)?;
        let data = self.simulate_columns(dgp, s, |i| params.row(i))?;
        Ok((data, params))
    }

    /// Simulate `s` datasets at the fixed parameter vector θ.
    ///
    /// Returns `data` of shape `nfeatures × s × nobs`.
    ///
    /// # Errors
    /// - [`DgpError::InvalidSampleCount`] if `s == 0`.
    /// - Whatever [`Dgp::validate_theta`] reports for θ (length mismatches as
    ///   [`DgpError::ParamLengthMismatch`]).
    /// - Simulation failures as for [`SimulationEngine::generate`].
    pub fn generate_at<D: Dgp>(
        &mut self, theta: ArrayView1<f64>, dgp: &D, s: usize,
    ) -> DgpResult<Array3<f64>> {
        validate_sample_count(s)?;
        dgp.validate_theta(theta)?;
        self.simulate_columns(dgp, s, |_| theta)
    }

    fn simulate_columns<'a, D, F>(&mut self, dgp: &D, s: usize, theta_of: F) -> DgpResult<Array3<f64>>
    where
        D: Dgp,
        F: Fn(usize) -> ArrayView1<'a, f64> + Sync,
    {
        let (k, n) = (dgp.nfeatures(), dgp.nobs());
        let parallel = self.opts.parallel;
        tracing::debug!(dgp = dgp.name(), s, n, k, parallel, "simulating batch");

        let seeds: Vec<u64> = (0..s).map(|_| self.rng.gen()).collect();
        let run = |column: usize| -> DgpResult<Array2<f64>> {
            let mut rng = StdRng::seed_from_u64(seeds[column]);
            let dataset = dgp.simulate(theta_of(column), &mut rng)?;
            check_dataset(column, &dataset, n, k)?;
            Ok(dataset)
        };
        let columns: Vec<DgpResult<Array2<f64>>> = if parallel {
            (0..s).into_par_iter().map(&run).collect()
        } else {
            (0..s).map(&run).collect()
        };

        let mut data = Array3::zeros((k, s, n));
        for (column, result) in columns.into_iter().enumerate() {
            match result {
                Ok(dataset) => data.index_axis_mut(Axis(1), column).assign(&dataset.t()),
                Err(err) => {
                    tracing::warn!(dgp = dgp.name(), column, error = %err, "simulation failed");
                    return Err(err);
                }
            }
        }
        tracing::debug!(dgp = dgp.name(), s, "batch complete");
        Ok(data)
    }
}

fn check_dataset(column: usize, dataset: &Array2<f64>, n: usize, k: usize) -> DgpResult<()> {
    if dataset.dim() != (n, k) {
        return Err(DgpError::SimulationShape { column, expected: (n, k), actual: dataset.dim() });
    }
    if let Some(((row, feature), &value)) = dataset.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(DgpError::NonFiniteSimulation { column, row, feature, value });
    }
    Ok(())
}

//! smm — simulated method of moments criterion at a candidate θ.
//!
//! Purpose
//! -------
//! Score a candidate parameter vector by how well statistics of data
//! simulated at θ match the same statistics computed on observed data.
//! The statistic map is arbitrary: hand-written moments, or the output of a
//! [`crate::network::Tcn`] applied to the simulated batch.
//!
//! Key behaviors
//! -------------
//! - Simulate `S` datasets at θ through a [`SimulationEngine`] and apply
//!   the statistic map, which must return a `P × S` matrix (one column per
//!   simulated dataset, `P = observed.len()`).
//! - Estimate the mean `m̄` and covariance `Σ` of the simulated statistics
//!   and form the weight `W = ((1 + 1/S) Σ)⁺`; the `1 + 1/S` factor
//!   accounts for simulation noise in `m̄`.
//! - Return `(m_obs − m̄)ᵀ W (m_obs − m̄)` together with its ingredients.
//!
//! Invariants & assumptions
//! ------------------------
//! - `S ≥ 2` (enforced at construction).
//! - The pseudoinverse uses a symmetric eigendecomposition and discards
//!   eigenvalues at or below [`EIGEN_EPS`], so collinear statistics reduce
//!   the rank instead of producing infinities.
//!
//! Conventions
//! -----------
//! - Criterion evaluation only; minimizing it over θ is left to callers.
//! - Emits one `tracing::debug!` event per evaluation.
use std::fmt::Display;

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, Array3, ArrayView1, Axis};

use crate::{
    dgp::traits::Dgp,
    inference::errors::{InferenceError, InferenceResult},
    numerical_stability::EIGEN_EPS,
    simulation::SimulationEngine,
};

/// Result of one criterion evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SmmEvaluation {
    /// `(m_obs − m̄)ᵀ W (m_obs − m̄)`.
    pub criterion: f64,
    /// Mean of the simulated statistics, length `P`.
    pub simulated_mean: Array1<f64>,
    /// Sample covariance of the simulated statistics, `P × P`.
    pub covariance: Array2<f64>,
    /// Weight matrix `((1 + 1/S) Σ)⁺`, `P × P`.
    pub weight: Array2<f64>,
    /// Number of eigenvalues kept by the pseudoinverse.
    pub rank: usize,
}

/// SMM criterion evaluator with a fixed number of simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmmEvaluator {
    simulations: usize,
}

impl SmmEvaluator {
    /// # Errors
    /// [`InferenceError::TooFewSimulations`] if `simulations < 2`.
    pub fn new(simulations: usize) -> InferenceResult<Self> {
        if simulations < 2 {
            return Err(InferenceError::TooFewSimulations { s: simulations });
        }
        Ok(SmmEvaluator { simulations })
    }

    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Evaluate the SMM criterion at θ.
    ///
    /// # Errors
    /// - [`InferenceError::NonFiniteObserved`] for a non-finite observed entry.
    /// - [`InferenceError::Dgp`] if θ is invalid or simulation fails.
    /// - [`InferenceError::Statistic`] if the statistic map fails.
    /// - [`InferenceError::StatisticShape`] / [`InferenceError::NonFiniteStatistic`]
    ///   for a malformed statistic matrix.
    pub fn evaluate<D, F, E>(
        &self, engine: &mut SimulationEngine, dgp: &D, theta: ArrayView1<f64>,
        observed: ArrayView1<f64>, statistic: F,
    ) -> InferenceResult<SmmEvaluation>
    where
        D: Dgp,
        F: Fn(&Array3<f64>) -> Result<Array2<f64>, E>,
        E: Display,
    {
        if let Some((index, &value)) = observed.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::NonFiniteObserved { index, value });
        }
        let s = self.simulations;
        let data = engine.generate_at(theta, dgp, s)?;
        let stats = statistic(&data).map_err(|e| InferenceError::Statistic(e.to_string()))?;

        let expected = (observed.len(), s);
        if stats.dim() != expected {
            return Err(InferenceError::StatisticShape { expected, actual: stats.dim() });
        }
        if let Some(((row, column), &value)) = stats.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::NonFiniteStatistic { row, column, value });
        }

        let simulated_mean = stats.sum_axis(Axis(1)) / s as f64;
        let centered = &stats - &simulated_mean.view().insert_axis(Axis(1));
        let covariance = centered.dot(&centered.t()) / (s - 1) as f64;
        let (weight, rank) = symmetric_pseudo_inverse(&(&covariance * (1.0 + 1.0 / s as f64)));
        let gap = &observed - &simulated_mean;
        let criterion = gap.dot(&weight.dot(&gap));

        tracing::debug!(dgp = dgp.name(), s, p = observed.len(), rank, criterion, "evaluated SMM criterion");
        Ok(SmmEvaluation { criterion, simulated_mean, covariance, weight, rank })
    }
}

/// Moore–Penrose pseudoinverse of a symmetric matrix and its numerical rank.
///
/// `M⁺ = Σ_{k: λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k` from the eigendecomposition
/// `M = Q Λ Qᵀ`.
pub fn symmetric_pseudo_inverse(m: &Array2<f64>) -> (Array2<f64>, usize) {
    let n = m.nrows();
    let mut m_nalg = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        for i in 0..n {
            m_nalg[(i, j)] = m[[i, j]];
        }
    }
    let eigen = m_nalg.symmetric_eigen();
    let q = eigen.eigenvectors;
    let mut pinv = Array2::zeros((n, n));
    let mut rank = 0;
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        rank += 1;
        for i in 0..n {
            for j in 0..n {
                pinv[[i, j]] += q[(i, k)] * q[(j, k)] / lambda;
            }
        }
    }
    (pinv, rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dgp::{DgpError, Ma2};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Sample autocovariances at lags 0..=2 of each simulated MA(2) path.
    fn autocovariances(data: &Array3<f64>) -> Result<Array2<f64>, String> {
        let (_, s, n) = data.dim();
        let mut out = Array2::zeros((3, s));
        for j in 0..s {
            let y = data.index_axis(Axis(0), 0);
            let y = y.row(j);
            let mean = y.sum() / n as f64;
            for lag in 0..3 {
                out[[lag, j]] =
                    (lag..n).map(|t| (y[t] - mean) * (y[t - lag] - mean)).sum::<f64>() / n as f64;
            }
        }
        Ok(out)
    }

    #[test]
    fn pseudo_inverse_of_rank_deficient_matrix() {
        let (pinv, rank) = symmetric_pseudo_inverse(&array![[1.0, 1.0], [1.0, 1.0]]);
        assert_eq!(rank, 1);
        for v in pinv.iter() {
            assert_abs_diff_eq!(*v, 0.25, epsilon = 1e-12);
        }
        let (inv, rank) = symmetric_pseudo_inverse(&array![[2.0, 0.0], [0.0, 4.0]]);
        assert_eq!(rank, 2);
        assert_abs_diff_eq!(inv[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(inv[[1, 1]], 0.25, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The criterion vanishes at the simulated mean and grows with distance.
    //
    // Given
    // -----
    // - MA(2) at θ = (0.4, 0.2), N = 200, S = 50, autocovariance statistics.
    // - Observed = simulated mean + c·δ for c = 0, 1, 2, with identically
    //   seeded engines so the simulated batch is the same each time.
    //
    // Expect
    // ------
    // - Criterion ≈ 0 at c = 0, strictly increasing in c, quadratic scaling.
    fn criterion_is_zero_at_mean_and_grows_with_gap() {
        let dgp = Ma2::new(200).unwrap();
        let theta = array![0.4, 0.2];
        let smm = SmmEvaluator::new(50).unwrap();
        let eval = |observed: ArrayView1<f64>| {
            let mut engine = SimulationEngine::seeded(12);
            smm.evaluate(&mut engine, &dgp, theta.view(), observed, autocovariances).unwrap()
        };
        let base = eval(array![1.2, 0.5, 0.2].view());
        assert_eq!(base.rank, 3);
        let mean = base.simulated_mean.clone();
        let delta = array![0.1, -0.05, 0.02];
        let c0 = eval(mean.view()).criterion;
        let c1 = eval((&mean + &delta).view()).criterion;
        let c2 = eval((&mean + &(&delta * 2.0)).view()).criterion;
        assert_abs_diff_eq!(c0, 0.0, epsilon = 1e-10);
        assert!(c1 > 0.0);
        assert_abs_diff_eq!(c2, 4.0 * c1, epsilon = 1e-8 * c2.max(1.0));
    }

    #[test]
    fn malformed_statistics_and_inputs_are_rejected() {
        let dgp = Ma2::new(20).unwrap();
        let theta = array![0.1, 0.1];
        let observed = array![1.0, 0.0, 0.0];
        let mut engine = SimulationEngine::seeded(3);
        assert_eq!(SmmEvaluator::new(1), Err(InferenceError::TooFewSimulations { s: 1 }));
        let smm = SmmEvaluator::new(4).unwrap();

        let wide = |_: &Array3<f64>| Ok::<_, String>(Array2::zeros((3, 5)));
        assert_eq!(
            smm.evaluate(&mut engine, &dgp, theta.view(), observed.view(), wide).unwrap_err(),
            InferenceError::StatisticShape { expected: (3, 4), actual: (3, 5) }
        );

        let nan = |_: &Array3<f64>| Ok::<_, String>(Array2::from_elem((3, 4), f64::NAN));
        assert!(matches!(
            smm.evaluate(&mut engine, &dgp, theta.view(), observed.view(), nan),
            Err(InferenceError::NonFiniteStatistic { row: 0, column: 0, .. })
        ));

        let failing = |_: &Array3<f64>| Err::<Array2<f64>, _>("no moments");
        assert_eq!(
            smm.evaluate(&mut engine, &dgp, theta.view(), observed.view(), failing).unwrap_err(),
            InferenceError::Statistic("no moments".to_string())
        );

        let err = smm
            .evaluate(&mut engine, &dgp, array![0.1].view(), observed.view(), autocovariances)
            .unwrap_err();
        assert_eq!(err, InferenceError::Dgp(DgpError::ParamLengthMismatch { expected: 2, actual: 1 }));
        assert_eq!(err.kind(), crate::errors::ErrorKind::DimensionMismatch);
    }
}

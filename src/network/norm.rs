//! Per-channel batch normalization and inverted dropout.
//!
//! Normalization acts on axis 0 of the working layout `channels × T × S`.
//! At evaluation time the running statistics are used; in training mode
//! the statistics of the current batch over `(time, sample)` are used
//! instead. Running statistics are never updated here: keeping them in sync
//! is the job of an external trainer.
use ndarray::{Array1, Array3, ArrayViewMut1, Axis, Zip};
use rand::Rng;

/// Batch normalization with learnable scale/shift and running statistics.
#[derive(Debug, Clone)]
pub struct BatchNorm {
    gamma: Array1<f64>,
    beta: Array1<f64>,
    running_mean: Array1<f64>,
    running_var: Array1<f64>,
    eps: f64,
}

impl BatchNorm {
    /// Identity-initialized normalization (`γ = 1`, `β = 0`, mean 0, var 1).
    pub fn new(channels: usize, eps: f64) -> Self {
        BatchNorm {
            gamma: Array1::ones(channels),
            beta: Array1::zeros(channels),
            running_mean: Array1::zeros(channels),
            running_var: Array1::ones(channels),
            eps,
        }
    }

    pub fn channels(&self) -> usize {
        self.gamma.len()
    }

    /// Learnable parameters (`γ`, `β`); running statistics are buffers.
    pub fn num_parameters(&self) -> usize {
        self.gamma.len() + self.beta.len()
    }

    /// Normalize in place with the running statistics.
    pub fn normalize(&self, x: &mut Array3<f64>) {
        self.apply(x, self.running_mean.view(), self.running_var.view());
    }

    /// Normalize in place with the batch statistics over `(time, sample)`.
    ///
    /// Uses the biased variance. `x` must be non-empty along time and sample.
    pub fn normalize_batch(&self, x: &mut Array3<f64>) {
        let per_channel = x.len_of(Axis(1)) * x.len_of(Axis(2));
        let count = per_channel.max(1) as f64;
        let mean: Array1<f64> = x.outer_iter().map(|c| c.sum() / count).collect();
        let var: Array1<f64> = x
            .outer_iter()
            .zip(mean.iter())
            .map(|(c, &m)| c.fold(0.0, |acc, &v| acc + (v - m) * (v - m)) / count)
            .collect();
        self.apply(x, mean.view(), var.view());
    }

    fn apply(&self, x: &mut Array3<f64>, mean: ndarray::ArrayView1<f64>, var: ndarray::ArrayView1<f64>) {
        Zip::from(x.outer_iter_mut())
            .and(&self.gamma)
            .and(&self.beta)
            .and(mean)
            .and(var)
            .for_each(|mut c, &g, &b, &m, &v| {
                let scale = g / (v + self.eps).sqrt();
                c.mapv_inplace(|z| (z - m) * scale + b);
            });
    }

    pub fn gamma_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.gamma.view_mut()
    }

    pub fn beta_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.beta.view_mut()
    }

    pub fn running_mean_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.running_mean.view_mut()
    }

    pub fn running_var_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.running_var.view_mut()
    }
}

/// Inverted dropout: zero each entry with probability `rate`, scale the
/// survivors by `1 / (1 − rate)`. No-op for `rate == 0`.
pub fn dropout<R: Rng + ?Sized>(x: &mut Array3<f64>, rate: f64, rng: &mut R) {
    if rate <= 0.0 {
        return;
    }
    let keep = 1.0 - rate;
    x.mapv_inplace(|v| if rng.gen::<f64>() < rate { 0.0 } else { v / keep });
}

//! Dilated 1-D convolution over the time axis and 1×1 channel projection.
//!
//! Both layers act on the working layout `channels × T × S` and preserve
//! `T`. Weights are He-normal initialized (`N(0, 2 / (in · k))`), biases
//! start at zero.
use ndarray::{Array1, Array3, ArrayView3, ArrayViewMut1, ArrayViewMut3, Axis, linalg::general_mat_mul};
use rand::Rng;
use rand_distr::Normal;

use crate::network::{
    errors::{NetworkError, NetworkResult},
    options::Padding,
};

/// Dilated convolution `in → out` along time.
///
/// `y[o, t, s] = b[o] + Σ_j Σ_c w[o, c, j] · x[c, t + j·d − pad_left, s]`,
/// with out-of-range inputs read as zero. Under [`Padding::Causal`] the last
/// tap (`j = k − 1`) reads time `t` and earlier taps read the past only.
#[derive(Debug, Clone)]
pub struct DilatedConv1d {
    weight: Array3<f64>,
    bias: Array1<f64>,
    dilation: usize,
    padding: Padding,
}

impl DilatedConv1d {
    pub fn new<R: Rng + ?Sized>(
        chan_in: usize, chan_out: usize, kernel_size: usize, dilation: usize, padding: Padding,
        rng: &mut R,
    ) -> NetworkResult<Self> {
        let weight = he_normal((chan_out, chan_in, kernel_size), rng)?;
        Ok(DilatedConv1d { weight, bias: Array1::zeros(chan_out), dilation, padding })
    }

    pub fn in_channels(&self) -> usize {
        self.weight.len_of(Axis(1))
    }

    pub fn out_channels(&self) -> usize {
        self.weight.len_of(Axis(0))
    }

    pub fn kernel_size(&self) -> usize {
        self.weight.len_of(Axis(2))
    }

    pub fn dilation(&self) -> usize {
        self.dilation
    }

    /// Time steps this layer looks across: `1 + (k − 1)·d`.
    pub fn receptive_field(&self) -> usize {
        1 + (self.kernel_size() - 1) * self.dilation
    }

    pub fn num_parameters(&self) -> usize {
        self.weight.len() + self.bias.len()
    }

    /// Weights, shape `out × in × k`.
    pub fn weight_mut(&mut self) -> ArrayViewMut3<'_, f64> {
        self.weight.view_mut()
    }

    pub fn bias_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.bias.view_mut()
    }

    /// Apply the convolution to `in × T × S`; callers check the channel axis.
    pub fn forward(&self, x: ArrayView3<f64>) -> Array3<f64> {
        let (_, t_len, s_len) = x.dim();
        let k = self.kernel_size();
        let pad_left = self.padding.left(k, self.dilation);
        let mut y = Array3::zeros((self.out_channels(), t_len, s_len));
        for (o, mut plane) in y.outer_iter_mut().enumerate() {
            plane.fill(self.bias[o]);
        }
        for j in 0..k {
            let w_j = self.weight.index_axis(Axis(2), j);
            let offset = j * self.dilation;
            for t in 0..t_len {
                // source index t + offset − pad_left, skipped when it falls in the padding
                let Some(src) = (t + offset).checked_sub(pad_left) else { continue };
                if src >= t_len {
                    continue;
                }
                let mut y_t = y.index_axis_mut(Axis(1), t);
                general_mat_mul(1.0, &w_j, &x.index_axis(Axis(1), src), 1.0, &mut y_t);
            }
        }
        y
    }
}

/// 1×1 convolution matching channel counts on the residual path.
#[derive(Debug, Clone)]
pub struct ChannelProjection {
    conv: DilatedConv1d,
}

impl ChannelProjection {
    pub fn new<R: Rng + ?Sized>(chan_in: usize, chan_out: usize, rng: &mut R) -> NetworkResult<Self> {
        Ok(ChannelProjection { conv: DilatedConv1d::new(chan_in, chan_out, 1, 1, Padding::Causal, rng)? })
    }

    pub fn forward(&self, x: ArrayView3<f64>) -> Array3<f64> {
        self.conv.forward(x)
    }

    pub fn num_parameters(&self) -> usize {
        self.conv.num_parameters()
    }

    /// Weights, shape `out × in × 1`.
    pub fn weight_mut(&mut self) -> ArrayViewMut3<'_, f64> {
        self.conv.weight_mut()
    }

    pub fn bias_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.conv.bias_mut()
    }
}

fn he_normal<R: Rng + ?Sized>(
    shape: (usize, usize, usize), rng: &mut R,
) -> NetworkResult<Array3<f64>> {
    let fan_in = (shape.1 * shape.2) as f64;
    let normal = Normal::new(0.0, (2.0 / fan_in).sqrt()).map_err(|_| NetworkError::InvalidOption {
        field: "fan_in",
        value: fan_in,
        reason: "Weight initialization needs a positive fan-in.",
    })?;
    Ok(Array3::from_shape_simple_fn(shape, || rng.sample(normal)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn conv(k: usize, d: usize, padding: Padding) -> DilatedConv1d {
        let mut rng = StdRng::seed_from_u64(0);
        DilatedConv1d::new(1, 1, k, d, padding, &mut rng).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Causal taps read the current step and the dilated past only.
    //
    // Given
    // -----
    // - k = 2, d = 3, weights (w0, w1) = (2, 1), bias 0.5, input x_t = t.
    //
    // Expect
    // ------
    // - y_t = 0.5 + 1·x_t + 2·x_{t−3}, with x_{t−3} = 0 for t < 3.
    fn causal_taps_read_dilated_past() {
        let mut c = conv(2, 3, Padding::Causal);
        c.weight_mut().assign(&ndarray::array![[[2.0, 1.0]]]);
        c.bias_mut().fill(0.5);
        let x = Array3::from_shape_fn((1, 6, 1), |(_, t, _)| t as f64);
        let y = c.forward(x.view());
        for t in 0..6 {
            let past = if t >= 3 { (t - 3) as f64 } else { 0.0 };
            assert_abs_diff_eq!(y[[0, t, 0]], 0.5 + t as f64 + 2.0 * past, epsilon = 1e-12);
        }
        assert_eq!(c.receptive_field(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Same padding centers the kernel and keeps the length.
    //
    // Given
    // -----
    // - k = 3, d = 1, weights (1, 10, 100), input a unit impulse at t = 2.
    //
    // Expect
    // ------
    // - Output length 5; y = [0, 100, 10, 1, 0].
    fn same_padding_centers_kernel() {
        let mut c = conv(3, 1, Padding::Same);
        c.weight_mut().assign(&ndarray::array![[[1.0, 10.0, 100.0]]]);
        let mut x = Array3::zeros((1, 5, 1));
        x[[0, 2, 0]] = 1.0;
        let y = c.forward(x.view());
        let got: Vec<f64> = y.iter().copied().collect();
        assert_eq!(got, vec![0.0, 100.0, 10.0, 1.0, 0.0]);
    }

    #[test]
    fn projection_mixes_channels_per_time_step() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = ChannelProjection::new(2, 1, &mut rng).unwrap();
        p.weight_mut().assign(&ndarray::array![[[1.0], [-1.0]]]);
        let x = Array3::from_shape_fn((2, 3, 2), |(c, t, s)| (c * 10 + t + s) as f64);
        let y = p.forward(x.view());
        assert_eq!(y.dim(), (1, 3, 2));
        assert!(y.iter().all(|&v| v == -10.0));
        assert_eq!(p.num_parameters(), 3);
    }
}

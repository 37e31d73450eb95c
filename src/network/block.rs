//! TemporalBlock — the residual building unit of a TCN.
//!
//! Purpose
//! -------
//! Map `chan_in × T × S` to `chan_out × T × S` through two dilated
//! convolutions, each followed by batch normalization, the activation, and
//! dropout; optionally add a skip connection from the input.
//!
//! Key behaviors
//! -------------
//! - Main path: `conv1 → BN → act → dropout → conv2 → BN → act → dropout`.
//! - With `residual`, the input is added to the main path (through a 1×1
//!   [`ChannelProjection`] when `chan_in ≠ chan_out`) and the activation is
//!   applied once more to the sum.
//! - `forward` is the evaluation pass: running statistics, dropout off.
//!   `forward_train` uses batch statistics and inverted dropout, drawing
//!   masks from the supplied RNG.
//!
//! Invariants & assumptions
//! ------------------------
//! - `T` is preserved by both padding modes. Under causal padding, output at
//!   time `t` depends on inputs at times `t − (receptive_field − 1) ..= t`.
//! - Evaluation takes `&self`; weights only change through the `*_mut`
//!   accessors, which hand out views and cannot resize anything.
use ndarray::{Array3, ArrayView3, ArrayViewMut1, ArrayViewMut3};
use rand::{Rng, RngCore};

use crate::network::{
    conv::{ChannelProjection, DilatedConv1d},
    errors::{NetworkError, NetworkResult},
    norm::{BatchNorm, dropout},
    options::BlockOptions,
};

#[derive(Debug, Clone)]
pub struct TemporalBlock {
    conv1: DilatedConv1d,
    bn1: BatchNorm,
    conv2: DilatedConv1d,
    bn2: BatchNorm,
    projection: Option<ChannelProjection>,
    opts: BlockOptions,
    chan_in: usize,
    chan_out: usize,
}

/// Selects statistics and dropout behavior of a pass.
enum Mode<'r> {
    Eval,
    Train(&'r mut dyn RngCore),
}

impl TemporalBlock {
    /// Build a block with freshly initialized weights drawn from `rng`.
    ///
    /// # Errors
    /// - [`NetworkError::ZeroChannels`] if `chan_in` (index 0) or `chan_out`
    ///   (index 1) is zero.
    /// - [`NetworkError::InvalidOption`] from [`BlockOptions::validate`].
    pub fn new<R: Rng + ?Sized>(
        chan_in: usize, chan_out: usize, opts: BlockOptions, rng: &mut R,
    ) -> NetworkResult<Self> {
        if chan_in == 0 {
            return Err(NetworkError::ZeroChannels { index: 0 });
        }
        if chan_out == 0 {
            return Err(NetworkError::ZeroChannels { index: 1 });
        }
        opts.validate()?;
        let (k, d) = (opts.kernel_size, opts.dilation);
        let conv1 = DilatedConv1d::new(chan_in, chan_out, k, d, opts.padding, rng)?;
        let conv2 = DilatedConv1d::new(chan_out, chan_out, k, d, opts.padding, rng)?;
        let projection = if opts.residual && chan_in != chan_out {
            Some(ChannelProjection::new(chan_in, chan_out, rng)?)
        } else {
            None
        };
        Ok(TemporalBlock {
            conv1,
            bn1: BatchNorm::new(chan_out, opts.bn_eps),
            conv2,
            bn2: BatchNorm::new(chan_out, opts.bn_eps),
            projection,
            opts,
            chan_in,
            chan_out,
        })
    }

    pub fn in_channels(&self) -> usize {
        self.chan_in
    }

    pub fn out_channels(&self) -> usize {
        self.chan_out
    }

    pub fn options(&self) -> &BlockOptions {
        &self.opts
    }

    pub fn has_projection(&self) -> bool {
        self.projection.is_some()
    }

    /// `1 + 2(k − 1)d`: two stacked convolutions at the same dilation.
    pub fn receptive_field(&self) -> usize {
        1 + 2 * (self.opts.kernel_size - 1) * self.opts.dilation
    }

    pub fn num_parameters(&self) -> usize {
        self.conv1.num_parameters()
            + self.bn1.num_parameters()
            + self.conv2.num_parameters()
            + self.bn2.num_parameters()
            + self.projection.as_ref().map_or(0, ChannelProjection::num_parameters)
    }

    /// Evaluation pass on `chan_in × T × S`.
    ///
    /// # Errors
    /// - [`NetworkError::InputChannels`] if axis 0 is not `chan_in`.
    /// - [`NetworkError::EmptyInput`] if `T == 0` or `S == 0`.
    pub fn forward(&self, x: ArrayView3<f64>) -> NetworkResult<Array3<f64>> {
        self.check_input(x)?;
        Ok(self.run(x, Mode::Eval))
    }

    /// Training-mode pass: batch statistics and inverted dropout.
    ///
    /// # Errors
    /// As for [`TemporalBlock::forward`].
    pub fn forward_train<R: Rng>(
        &self, x: ArrayView3<f64>, rng: &mut R,
    ) -> NetworkResult<Array3<f64>> {
        self.check_input(x)?;
        Ok(self.run(x, Mode::Train(rng)))
    }

    fn check_input(&self, x: ArrayView3<f64>) -> NetworkResult<()> {
        let (c, t, s) = x.dim();
        if c != self.chan_in {
            return Err(NetworkError::InputChannels { expected: self.chan_in, actual: c });
        }
        if t == 0 {
            return Err(NetworkError::EmptyInput { axis: "time" });
        }
        if s == 0 {
            return Err(NetworkError::EmptyInput { axis: "sample" });
        }
        Ok(())
    }

    fn run(&self, x: ArrayView3<f64>, mut mode: Mode<'_>) -> Array3<f64> {
        let h = self.conv1.forward(x);
        let h = self.post_conv(h, &self.bn1, &mut mode);
        let h = self.conv2.forward(h.view());
        let mut h = self.post_conv(h, &self.bn2, &mut mode);
        if self.opts.residual {
            match &self.projection {
                Some(projection) => h += &projection.forward(x),
                None => h += &x,
            }
            let act = self.opts.activation;
            h.mapv_inplace(|v| act.apply(v));
        }
        h
    }

    fn post_conv(&self, mut h: Array3<f64>, bn: &BatchNorm, mode: &mut Mode<'_>) -> Array3<f64> {
        match mode {
            Mode::Eval => bn.normalize(&mut h),
            Mode::Train(_) => bn.normalize_batch(&mut h),
        }
        let act = self.opts.activation;
        h.mapv_inplace(|v| act.apply(v));
        if let Mode::Train(rng) = mode {
            dropout(&mut h, self.opts.dropout_rate, &mut **rng);
        }
        h
    }

    // ---- Weight access ----

    pub fn conv1_weight_mut(&mut self) -> ArrayViewMut3<'_, f64> {
        self.conv1.weight_mut()
    }

    pub fn conv1_bias_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.conv1.bias_mut()
    }

    pub fn conv2_weight_mut(&mut self) -> ArrayViewMut3<'_, f64> {
        self.conv2.weight_mut()
    }

    pub fn conv2_bias_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.conv2.bias_mut()
    }

    pub fn bn1_mut(&mut self) -> &mut BatchNorm {
        &mut self.bn1
    }

    pub fn bn2_mut(&mut self) -> &mut BatchNorm {
        &mut self.bn2
    }

    pub fn projection_mut(&mut self) -> Option<&mut ChannelProjection> {
        self.projection.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::options::Padding;
    use rand::{SeedableRng, rngs::StdRng};

    fn block(chan_in: usize, chan_out: usize, opts: BlockOptions) -> TemporalBlock {
        let mut rng = StdRng::seed_from_u64(42);
        TemporalBlock::new(chan_in, chan_out, opts, &mut rng).unwrap()
    }

    fn input(c: usize, t: usize, s: usize) -> Array3<f64> {
        Array3::from_shape_fn((c, t, s), |(i, j, l)| ((i + 1) as f64 * 0.3 + j as f64 * 0.17 + l as f64).sin())
    }

    #[test]
    fn shapes_and_projection_follow_channels() {
        let b = block(2, 3, BlockOptions::default());
        assert!(b.has_projection());
        let y = b.forward(input(2, 11, 4).view()).unwrap();
        assert_eq!(y.dim(), (3, 11, 4));
        assert_eq!(b.num_parameters(), 21 + 6 + 30 + 6 + 9);

        assert!(!block(3, 3, BlockOptions::default()).has_projection());
        let plain = BlockOptions { residual: false, ..BlockOptions::default() };
        assert!(!block(2, 3, plain).has_projection());
    }

    #[test]
    // Purpose
    // -------
    // Causal blocks never look ahead and forget inputs beyond their field.
    //
    // Given
    // -----
    // - k = 3, d = 2 (receptive field 9), T = 20; one input perturbed at
    //   t = 6.
    //
    // Expect
    // ------
    // - Outputs at t < 6 and t ≥ 15 are unchanged; outputs at t = 6 and
    //   t = 14 change.
    fn causal_block_respects_receptive_field() {
        let opts = BlockOptions { dilation: 2, ..BlockOptions::default() };
        let b = block(2, 2, opts);
        assert_eq!(b.receptive_field(), 9);
        let x = input(2, 20, 1);
        let mut x2 = x.clone();
        x2[[0, 6, 0]] += 1.0;
        let y = b.forward(x.view()).unwrap();
        let y2 = b.forward(x2.view()).unwrap();
        let diff = |t: usize| (0..2).map(|c| (y[[c, t, 0]] - y2[[c, t, 0]]).abs()).sum::<f64>();
        for t in (0..6).chain(15..20) {
            assert_eq!(diff(t), 0.0, "output at t = {t} changed");
        }
        assert!(diff(6) > 0.0);
        assert!(diff(14) > 0.0);
    }

    #[test]
    fn same_padding_keeps_length_and_sees_future() {
        let opts = BlockOptions { padding: Padding::Same, ..BlockOptions::default() };
        let b = block(1, 2, opts);
        let x = input(1, 9, 2);
        let mut x2 = x.clone();
        x2[[0, 5, 0]] -= 2.0;
        let y = b.forward(x.view()).unwrap();
        let y2 = b.forward(x2.view()).unwrap();
        assert_eq!(y.dim(), (2, 9, 2));
        assert!((0..2).any(|c| y[[c, 4, 0]] != y2[[c, 4, 0]]));
    }

    #[test]
    // Purpose
    // -------
    // Training-mode passes leave weights untouched.
    //
    // Given
    // -----
    // - A block with dropout 0.3; one training pass between two
    //   evaluation passes on the same input.
    //
    // Expect
    // ------
    // - Training output has the evaluation shape; both evaluation outputs
    //   are identical.
    fn training_pass_is_shape_preserving_and_pure() {
        let opts = BlockOptions { dropout_rate: 0.3, ..BlockOptions::default() };
        let b = block(3, 4, opts);
        let x = input(3, 12, 5);
        let before = b.forward(x.view()).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let train = b.forward_train(x.view(), &mut rng).unwrap();
        let after = b.forward(x.view()).unwrap();
        assert_eq!(train.dim(), before.dim());
        assert_eq!(before, after);
    }

    #[test]
    fn invalid_construction_and_input_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            TemporalBlock::new(0, 2, BlockOptions::default(), &mut rng).unwrap_err(),
            NetworkError::ZeroChannels { index: 0 }
        );
        let bad = BlockOptions { kernel_size: 0, ..BlockOptions::default() };
        assert!(matches!(
            TemporalBlock::new(1, 2, bad, &mut rng),
            Err(NetworkError::InvalidOption { field: "kernel_size", .. })
        ));
        let b = block(2, 2, BlockOptions::default());
        assert_eq!(
            b.forward(input(3, 5, 1).view()).unwrap_err(),
            NetworkError::InputChannels { expected: 2, actual: 3 }
        );
        assert_eq!(
            b.forward(Array3::<f64>::zeros((2, 0, 1)).view()).unwrap_err(),
            NetworkError::EmptyInput { axis: "time" }
        );
    }
}

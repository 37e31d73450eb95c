//! Tcn — stacked temporal blocks with geometrically growing dilation.
//!
//! Purpose
//! -------
//! Map a batch of simulated datasets in convolutional layout
//! (`1 × T × C₀ × S`) to one output vector per dataset (`C_L × S`), e.g. a
//! parameter estimate per simulated sample.
//!
//! Key behaviors
//! -------------
//! - Layer `i` is `TemporalBlock(channels[i] → channels[i + 1])` with
//!   dilation `dilation_factor^i`.
//! - `forward_sequence` returns the full `C_L × T × S` output; `forward`
//!   returns its last time step, which under causal padding summarizes the
//!   whole receptive field ending at the final observation.
//! - Samples are independent at evaluation time, so the batch is split into
//!   sample chunks evaluated on the rayon pool. `forward_train` runs the
//!   whole batch at once, since batch statistics couple the samples.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one block; every channel count ≥ 1; block options validated
//!   at construction.
//! - Receptive field: `1 + 2(k − 1) · Σᵢ dilationᵢ`.
//! - Evaluation is a pure read of the weights.
use ndarray::{Array2, Array3, ArrayView3, ArrayView4, Axis, s};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    dgp::traits::Dgp,
    layout::from_conv_layout,
    network::{
        block::TemporalBlock,
        errors::{NetworkError, NetworkResult},
        options::TcnOptions,
    },
};

#[derive(Debug, Clone)]
pub struct Tcn {
    blocks: Vec<TemporalBlock>,
    channels: Vec<usize>,
    opts: TcnOptions,
    receptive_field: usize,
}

impl Tcn {
    /// Build a TCN over the channel sequence `channels`.
    ///
    /// # Errors
    /// - [`NetworkError::TooFewChannels`] if `channels.len() < 2`.
    /// - [`NetworkError::ZeroChannels`] for a zero entry (its index).
    /// - [`NetworkError::InvalidOption`] / [`NetworkError::DilationOverflow`]
    ///   from the per-layer options.
    /// - [`NetworkError::DilationOverflow`] if the total receptive field
    ///   overflows `usize` (the first layer that pushes it over).
    pub fn new(channels: &[usize], opts: TcnOptions) -> NetworkResult<Self> {
        if channels.len() < 2 {
            return Err(NetworkError::TooFewChannels { len: channels.len() });
        }
        if let Some(index) = channels.iter().position(|&c| c == 0) {
            return Err(NetworkError::ZeroChannels { index });
        }
        let mut rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let blocks = channels
            .windows(2)
            .enumerate()
            .map(|(layer, pair)| {
                TemporalBlock::new(pair[0], pair[1], opts.block_options(layer)?, &mut rng)
            })
            .collect::<NetworkResult<Vec<_>>>()?;
        let receptive_field = blocks.iter().enumerate().try_fold(1usize, |rf, (layer, block)| {
            block
                .options()
                .checked_receptive_field()
                .and_then(|block_rf| rf.checked_add(block_rf - 1))
                .ok_or(NetworkError::DilationOverflow { layer })
        })?;
        let tcn = Tcn { blocks, channels: channels.to_vec(), opts, receptive_field };
        tracing::debug!(
            layers = tcn.blocks.len(),
            receptive_field = tcn.receptive_field(),
            parameters = tcn.num_parameters(),
            "built TCN"
        );
        Ok(tcn)
    }

    /// TCN sized for a DGP: `[nfeatures, hidden × depth, nparams]`.
    ///
    /// # Errors
    /// As for [`Tcn::new`] (e.g. `hidden == 0` with `depth > 0`).
    pub fn for_dgp<D: Dgp>(
        dgp: &D, hidden: usize, depth: usize, opts: TcnOptions,
    ) -> NetworkResult<Self> {
        let channels: Vec<usize> = std::iter::once(dgp.nfeatures())
            .chain(std::iter::repeat(hidden).take(depth))
            .chain(std::iter::once(dgp.nparams()))
            .collect();
        Tcn::new(&channels, opts)
    }

    pub fn channels(&self) -> &[usize] {
        &self.channels
    }

    pub fn options(&self) -> &TcnOptions {
        &self.opts
    }

    pub fn blocks(&self) -> &[TemporalBlock] {
        &self.blocks
    }

    /// Mutable access to the blocks for weight updates; the layer structure
    /// itself cannot be changed.
    pub fn blocks_mut(&mut self) -> &mut [TemporalBlock] {
        &mut self.blocks
    }

    /// `1 + 2(k − 1) · Σᵢ dilationᵢ`, checked for overflow at construction.
    pub fn receptive_field(&self) -> usize {
        self.receptive_field
    }

    pub fn num_parameters(&self) -> usize {
        self.blocks.iter().map(TemporalBlock::num_parameters).sum()
    }

    /// Evaluate on `1 × T × C₀ × S`, returning the last time step (`C_L × S`).
    ///
    /// # Errors
    /// - [`NetworkError::Layout`] if the leading axis is not 1.
    /// - [`NetworkError::InputChannels`] if axis 2 is not `channels[0]`.
    /// - [`NetworkError::EmptyInput`] if `T == 0` or `S == 0`.
    pub fn forward(&self, x: ArrayView4<f64>) -> NetworkResult<Array2<f64>> {
        Ok(last_step(self.forward_sequence(x)?))
    }

    /// Evaluate on `1 × T × C₀ × S`, returning every time step (`C_L × T × S`).
    ///
    /// # Errors
    /// As for [`Tcn::forward`].
    pub fn forward_sequence(&self, x: ArrayView4<f64>) -> NetworkResult<Array3<f64>> {
        let h = self.working_input(x)?;
        let (_, t_len, n_samples) = h.dim();
        let chunk = n_samples.div_ceil(rayon::current_num_threads().max(1));
        let starts: Vec<usize> = (0..n_samples).step_by(chunk).collect();
        let parts = starts
            .into_par_iter()
            .map(|start| {
                let end = (start + chunk).min(n_samples);
                Ok((start, self.run_blocks(h.slice(s![.., .., start..end]))?))
            })
            .collect::<NetworkResult<Vec<(usize, Array3<f64>)>>>()?;

        let out_channels = self.channels[self.channels.len() - 1];
        let mut out = Array3::zeros((out_channels, t_len, n_samples));
        for (start, part) in parts {
            let end = start + part.len_of(Axis(2));
            out.slice_mut(s![.., .., start..end]).assign(&part);
        }
        Ok(out)
    }

    /// Training-mode analogue of [`Tcn::forward`]: batch statistics and
    /// inverted dropout in every block, masks drawn from `rng`.
    ///
    /// # Errors
    /// As for [`Tcn::forward`].
    pub fn forward_train<R: Rng>(&self, x: ArrayView4<f64>, rng: &mut R) -> NetworkResult<Array2<f64>> {
        let mut h = self.working_input(x)?;
        for block in &self.blocks {
            h = block.forward_train(h.view(), rng)?;
        }
        Ok(last_step(h))
    }

    /// `1 × T × C × S` → validated, owned `C × T × S`.
    fn working_input(&self, x: ArrayView4<f64>) -> NetworkResult<Array3<f64>> {
        let canonical = from_conv_layout(x)?;
        let (c, n_samples, t_len) = canonical.dim();
        if c != self.channels[0] {
            return Err(NetworkError::InputChannels { expected: self.channels[0], actual: c });
        }
        if t_len == 0 {
            return Err(NetworkError::EmptyInput { axis: "time" });
        }
        if n_samples == 0 {
            return Err(NetworkError::EmptyInput { axis: "sample" });
        }
        Ok(canonical.permuted_axes([0, 2, 1]).as_standard_layout().into_owned())
    }

    fn run_blocks(&self, x: ArrayView3<f64>) -> NetworkResult<Array3<f64>> {
        let mut h = x.to_owned();
        for block in &self.blocks {
            h = block.forward(h.view())?;
        }
        Ok(h)
    }
}

fn last_step(seq: Array3<f64>) -> Array2<f64> {
    let last = seq.len_of(Axis(1)) - 1;
    seq.index_axis_move(Axis(1), last)
}

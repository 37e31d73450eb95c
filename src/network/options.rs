//! Hyper-parameters of temporal blocks and TCNs.
//!
//! Purpose
//! -------
//! Collect the configuration of the convolutional estimator in plain option
//! structs with conservative defaults, validated once when a block or a
//! network is built.
//!
//! Key behaviors
//! -------------
//! - [`Padding`] chooses causal (left-only) or centered ("same") padding of
//!   the dilated convolutions. Both preserve the time length.
//! - [`Activation`] is applied elementwise after each normalization and on
//!   the residual sum.
//! - [`BlockOptions`] configures one [`crate::network::TemporalBlock`];
//!   [`TcnOptions`] configures a whole stack and derives per-layer
//!   [`BlockOptions`] via [`TcnOptions::block_options`].
//!
//! Conventions
//! -----------
//! - Defaults: kernel size 3, dilation factor 2, residual connections on,
//!   causal padding, no dropout, LeakyReLU(0.01), batch-norm ε = 1e-5.
use crate::network::errors::{NetworkError, NetworkResult};

/// Padding of the dilated convolutions along time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    /// `(k − 1)·d` zeros on the left; output at `t` sees inputs `≤ t` only.
    #[default]
    Causal,
    /// The same total padding split left/right (left gets the floor).
    /// Not causal.
    Same,
}

impl Padding {
    /// Left padding for a kernel of size `k` at dilation `d`.
    pub fn left(&self, kernel_size: usize, dilation: usize) -> usize {
        let total = (kernel_size - 1) * dilation;
        match self {
            Padding::Causal => total,
            Padding::Same => total / 2,
        }
    }
}

/// Elementwise nonlinearity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Relu,
    LeakyRelu(f64),
    Tanh,
}

impl Default for Activation {
    fn default() -> Self {
        Activation::LeakyRelu(0.01)
    }
}

impl Activation {
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Activation::Relu => x.max(0.0),
            Activation::LeakyRelu(slope) => {
                if x >= 0.0 {
                    x
                } else {
                    slope * x
                }
            }
            Activation::Tanh => x.tanh(),
        }
    }
}

/// Configuration of one temporal block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockOptions {
    pub dilation: usize,
    pub kernel_size: usize,
    pub residual: bool,
    pub padding: Padding,
    pub dropout_rate: f64,
    pub activation: Activation,
    pub bn_eps: f64,
}

impl Default for BlockOptions {
    fn default() -> Self {
        BlockOptions {
            dilation: 1,
            kernel_size: 3,
            residual: true,
            padding: Padding::Causal,
            dropout_rate: 0.0,
            activation: Activation::default(),
            bn_eps: 1e-5,
        }
    }
}

impl BlockOptions {
    /// `1 + 2(k − 1)d`, or `None` if `k == 0` or the value overflows `usize`.
    pub fn checked_receptive_field(&self) -> Option<usize> {
        self.kernel_size
            .checked_sub(1)?
            .checked_mul(self.dilation)?
            .checked_mul(2)?
            .checked_add(1)
    }

    /// Check every field against its domain.
    ///
    /// Bounding the receptive field also bounds the padding `(k − 1)d`, so
    /// no later padding or receptive-field arithmetic can overflow.
    ///
    /// # Errors
    /// [`NetworkError::InvalidOption`] naming the first offending field.
    pub fn validate(&self) -> NetworkResult<()> {
        if self.kernel_size == 0 {
            return Err(invalid("kernel_size", 0.0, "Kernel size must be at least 1."));
        }
        if self.dilation == 0 {
            return Err(invalid("dilation", 0.0, "Dilation must be at least 1."));
        }
        if self.checked_receptive_field().is_none() {
            return Err(invalid(
                "dilation",
                self.dilation as f64,
                "Receptive field 1 + 2(k − 1)·dilation overflows usize.",
            ));
        }
        validate_shared(self.dropout_rate, self.activation, self.bn_eps)
    }
}

/// Configuration of a TCN stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TcnOptions {
    pub kernel_size: usize,
    pub dilation_factor: usize,
    pub residual: bool,
    pub padding: Padding,
    pub dropout_rate: f64,
    pub activation: Activation,
    pub bn_eps: f64,
    /// Seed for weight initialization; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for TcnOptions {
    fn default() -> Self {
        TcnOptions {
            kernel_size: 3,
            dilation_factor: 2,
            residual: true,
            padding: Padding::Causal,
            dropout_rate: 0.0,
            activation: Activation::default(),
            bn_eps: 1e-5,
            seed: None,
        }
    }
}

impl TcnOptions {
    /// Options with a fixed initialization seed and defaults elsewhere.
    pub fn seeded(seed: u64) -> Self {
        TcnOptions { seed: Some(seed), ..TcnOptions::default() }
    }

    /// Block options for layer `layer` (dilation `dilation_factor^layer`).
    ///
    /// # Errors
    /// - [`NetworkError::InvalidOption`] if `dilation_factor == 0`.
    /// - [`NetworkError::DilationOverflow`] if the dilation or the layer's
    ///   receptive field overflows.
    pub fn block_options(&self, layer: usize) -> NetworkResult<BlockOptions> {
        if self.dilation_factor == 0 {
            return Err(invalid("dilation_factor", 0.0, "Dilation factor must be at least 1."));
        }
        let dilation = u32::try_from(layer)
            .ok()
            .and_then(|exp| self.dilation_factor.checked_pow(exp))
            .ok_or(NetworkError::DilationOverflow { layer })?;
        let opts = BlockOptions {
            dilation,
            kernel_size: self.kernel_size,
            residual: self.residual,
            padding: self.padding,
            dropout_rate: self.dropout_rate,
            activation: self.activation,
            bn_eps: self.bn_eps,
        };
        if opts.kernel_size > 0 && opts.checked_receptive_field().is_none() {
            return Err(NetworkError::DilationOverflow { layer });
        }
        opts.validate()?;
        Ok(opts)
    }
}

fn validate_shared(dropout_rate: f64, activation: Activation, bn_eps: f64) -> NetworkResult<()> {
    if !(0.0..1.0).contains(&dropout_rate) {
        return Err(invalid("dropout_rate", dropout_rate, "Dropout rate must lie in [0, 1)."));
    }
    if !(bn_eps.is_finite() && bn_eps > 0.0) {
        return Err(invalid("bn_eps", bn_eps, "Batch-norm epsilon must be finite and positive."));
    }
    if let Activation::LeakyRelu(slope) = activation {
        if !slope.is_finite() {
            return Err(invalid("activation", slope, "LeakyReLU slope must be finite."));
        }
    }
    Ok(())
}

fn invalid(field: &'static str, value: f64, reason: &'static str) -> NetworkError {
    NetworkError::InvalidOption { field, value, reason }
}

//! network — temporal convolutional estimator.
//!
//! Purpose
//! -------
//! Provide the neural estimator that maps simulated datasets to the
//! parameters that generated them: a stack of residual temporal blocks
//! with dilated causal convolutions (TCN).
//!
//! Key behaviors
//! -------------
//! - [`conv`]: dilated 1-D convolution along time and the 1×1 channel
//!   projection of the residual path.
//! - [`norm`]: per-channel batch normalization and inverted dropout.
//! - [`TemporalBlock`]: two conv/norm/activation/dropout stages plus an
//!   optional skip connection.
//! - [`Tcn`]: blocks with dilation `dilation_factor^i`, evaluated on the
//!   convolutional layout produced by [`crate::layout::to_conv_layout`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Working layout inside the network is `channels × T × S`; every layer
//!   preserves `T`.
//! - Evaluation never mutates weights. Training (losses, gradients,
//!   optimizer steps) is out of scope; `forward_train` and the `*_mut`
//!   weight views are the hooks an external trainer needs.
//!
//! Conventions
//! -----------
//! - Weight initialization draws from a seedable `StdRng`
//!   ([`TcnOptions::seed`]), so seeded networks are reproducible.
//! - Construction is logged at `debug` level through `tracing`.

pub mod block;
pub mod conv;
pub mod errors;
pub mod norm;
pub mod options;
pub mod tcn;

pub use self::block::TemporalBlock;
pub use self::conv::{ChannelProjection, DilatedConv1d};
pub use self::errors::{NetworkError, NetworkResult};
pub use self::norm::BatchNorm;
pub use self::options::{Activation, BlockOptions, Padding, TcnOptions};
pub use self::tcn::Tcn;

//! simulation — batched prior draws and dataset generation for any DGP.
//!
//! Purpose
//! -------
//! Host the [`SimulationEngine`], which turns a [`crate::dgp::Dgp`] into
//! `(data, params)` training batches in the canonical
//! `nfeatures × S × nobs` layout, and its configuration [`SimOptions`].
//!
//! Key behaviors
//! -------------
//! - Reproducible batches from a seeded master RNG; per-column RNGs make
//!   the rayon and sequential paths bit-identical.
//! - Shape and finiteness of every simulated dataset are checked before the
//!   batch is assembled.
//!
//! Downstream usage
//! ----------------
//! - Feed `data` through [`crate::layout::to_conv_layout`] into a
//!   [`crate::network::Tcn`], or into a statistic map for
//!   [`crate::inference::SmmEvaluator`].

pub mod engine;
pub mod options;

pub use self::engine::SimulationEngine;
pub use self::options::SimOptions;

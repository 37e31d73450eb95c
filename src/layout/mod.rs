//! layout — reshaping simulated data into network input layouts.
//!
//! The canonical tensor produced by [`crate::simulation::SimulationEngine`]
//! is `K × S × T` (feature, sample, time). [`to_conv_layout`] produces the
//! `1 × T × K × S` tensor consumed by [`crate::network::Tcn`];
//! [`to_sequence_layout`] produces `T` per-step `K × S` matrices for
//! recurrent consumers. Both have validated inverses and rank-checked
//! dynamic variants.

pub mod adapter;
pub mod errors;

pub use self::adapter::{
    from_conv_layout, from_sequence_layout, to_conv_layout, to_conv_layout_dyn,
    to_sequence_layout, to_sequence_layout_dyn,
};
pub use self::errors::{LayoutError, LayoutResult};

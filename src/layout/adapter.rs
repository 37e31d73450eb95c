//! Conversions between the canonical data tensor and network input layouts.
//!
//! Purpose
//! -------
//! The simulation engine emits datasets as a `K × S × T` tensor indexed
//! (feature, sample, time). Networks consume either a convolutional layout
//! `1 × T × K × S` (singleton leading axis, time, channels, samples) or a
//! sequence layout: `T` matrices of shape `K × S`, one per time step.
//!
//! Key behaviors
//! -------------
//! - `to_conv_layout` sets `out[0, t, k, s] = x[k, s, t]`.
//! - `to_sequence_layout` returns `T` steps with `step[t][k, s] = x[k, s, t]`.
//! - The inverses reassemble the canonical tensor and validate the layout.
//! - `_dyn` entry points accept arrays of unknown rank and reject anything
//!   that is not exactly 3-D.
//!
//! Conventions
//! -----------
//! - Outputs are freshly allocated, standard-layout arrays; inputs are never
//!   aliased.
use ndarray::{Array2, Array3, Array4, ArrayView3, ArrayView4, ArrayViewD, Axis, Ix3};

use crate::layout::errors::{LayoutError, LayoutResult};

/// `K × S × T` → `1 × T × K × S`.
pub fn to_conv_layout(x: ArrayView3<f64>) -> Array4<f64> {
    let (k, s, t) = x.dim();
    let mut out = Array4::zeros((1, t, k, s));
    out.index_axis_mut(Axis(0), 0).assign(&x.permuted_axes([2, 0, 1]));
    out
}

/// `K × S × T` → `T` matrices of shape `K × S`.
pub fn to_sequence_layout(x: ArrayView3<f64>) -> Vec<Array2<f64>> {
    x.axis_iter(Axis(2)).map(|step| step.as_standard_layout().into_owned()).collect()
}

/// `1 × T × K × S` → `K × S × T`.
///
/// # Errors
/// [`LayoutError::ChannelAxis`] if the leading axis is not of length 1.
pub fn from_conv_layout(x: ArrayView4<f64>) -> LayoutResult<Array3<f64>> {
    let len = x.len_of(Axis(0));
    if len != 1 {
        return Err(LayoutError::ChannelAxis { len });
    }
    let tks = x.index_axis_move(Axis(0), 0);
    Ok(tks.permuted_axes([1, 2, 0]).as_standard_layout().into_owned())
}

/// `T` matrices of shape `K × S` → `K × S × T`.
///
/// # Errors
/// - [`LayoutError::EmptySequence`] for an empty slice.
/// - [`LayoutError::InconsistentStep`] if a step's shape differs from step 0.
pub fn from_sequence_layout(steps: &[Array2<f64>]) -> LayoutResult<Array3<f64>> {
    let first = steps.first().ok_or(LayoutError::EmptySequence)?;
    let (k, s) = first.dim();
    let mut out = Array3::zeros((k, s, steps.len()));
    for (index, step) in steps.iter().enumerate() {
        if step.dim() != (k, s) {
            return Err(LayoutError::InconsistentStep {
                index,
                expected: (k, s),
                actual: step.dim(),
            });
        }
        out.index_axis_mut(Axis(2), index).assign(step);
    }
    Ok(out)
}

/// Rank-checked [`to_conv_layout`].
///
/// # Errors
/// [`LayoutError::RankMismatch`] unless `x` is 3-D.
pub fn to_conv_layout_dyn(x: ArrayViewD<f64>) -> LayoutResult<Array4<f64>> {
    Ok(to_conv_layout(into_rank3(x)?))
}

/// Rank-checked [`to_sequence_layout`].
///
/// # Errors
/// [`LayoutError::RankMismatch`] unless `x` is 3-D.
pub fn to_sequence_layout_dyn(x: ArrayViewD<f64>) -> LayoutResult<Vec<Array2<f64>>> {
    Ok(to_sequence_layout(into_rank3(x)?))
}

fn into_rank3(x: ArrayViewD<f64>) -> LayoutResult<ArrayView3<f64>> {
    let actual = x.ndim();
    x.into_dimensionality::<Ix3>().map_err(|_| LayoutError::RankMismatch { expected: 3, actual })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use ndarray::{Array, IxDyn};

    fn ramp(k: usize, s: usize, t: usize) -> Array3<f64> {
        Array3::from_shape_fn((k, s, t), |(i, j, l)| (100 * i + 10 * j + l) as f64)
    }

    #[test]
    // Purpose
    // -------
    // The convolutional layout moves every element to its documented index.
    //
    // Given
    // -----
    // - A 2 × 3 × 4 ramp tensor with distinct entries.
    //
    // Expect
    // ------
    // - Shape 1 × 4 × 2 × 3 and out[0, t, k, s] == x[k, s, t] everywhere;
    //   the result is in standard layout.
    fn conv_layout_places_every_element() {
        let x = ramp(2, 3, 4);
        let out = to_conv_layout(x.view());
        assert_eq!(out.dim(), (1, 4, 2, 3));
        assert!(out.is_standard_layout());
        for ((k, s, t), &v) in x.indexed_iter() {
            assert_eq!(out[[0, t, k, s]], v);
        }
        assert_eq!(from_conv_layout(out.view()).unwrap(), x);
    }

    #[test]
    fn sequence_layout_splits_time_axis() {
        let x = ramp(2, 3, 5);
        let steps = to_sequence_layout(x.view());
        assert_eq!(steps.len(), 5);
        for (t, step) in steps.iter().enumerate() {
            assert_eq!(step.dim(), (2, 3));
            for ((k, s), &v) in step.indexed_iter() {
                assert_eq!(v, x[[k, s, t]]);
            }
        }
        assert_eq!(from_sequence_layout(&steps).unwrap(), x);
    }

    #[test]
    // Purpose
    // -------
    // Malformed layouts are rejected with dimension-mismatch errors.
    //
    // Given
    // -----
    // - A 2-D and a 4-D dynamic array, a conv tensor with leading axis 2,
    //   an empty sequence and a ragged one.
    //
    // Expect
    // ------
    // - RankMismatch, ChannelAxis, EmptySequence, InconsistentStep.
    fn malformed_inputs_are_rejected() {
        let flat = Array::<f64, _>::zeros(IxDyn(&[3, 4]));
        let err = to_conv_layout_dyn(flat.view()).unwrap_err();
        assert_eq!(err, LayoutError::RankMismatch { expected: 3, actual: 2 });
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);

        let deep = Array::<f64, _>::zeros(IxDyn(&[1, 2, 3, 4]));
        assert!(matches!(
            to_sequence_layout_dyn(deep.view()),
            Err(LayoutError::RankMismatch { actual: 4, .. })
        ));

        let cube = Array::<f64, _>::zeros(IxDyn(&[2, 3, 4]));
        assert_eq!(to_conv_layout_dyn(cube.view()).unwrap().dim(), (1, 4, 2, 3));

        let wide = Array4::<f64>::zeros((2, 4, 1, 1));
        assert_eq!(from_conv_layout(wide.view()), Err(LayoutError::ChannelAxis { len: 2 }));

        assert_eq!(from_sequence_layout(&[]), Err(LayoutError::EmptySequence));
        let ragged = vec![Array2::zeros((2, 3)), Array2::zeros((2, 2))];
        assert!(matches!(
            from_sequence_layout(&ragged),
            Err(LayoutError::InconsistentStep { index: 1, .. })
        ));
    }
}

//! Errors for tensor layout conversion.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::errors::ErrorKind;

/// Result alias for layout conversions.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Layout conversion failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Input does not have the expected number of axes.
    RankMismatch { expected: usize, actual: usize },

    /// Leading singleton axis of a convolutional tensor is not of length 1.
    ChannelAxis { len: usize },

    /// A sequence layout with no time steps cannot be reassembled.
    EmptySequence,

    /// A sequence step disagrees with the shape of step 0.
    InconsistentStep { index: usize, expected: (usize, usize), actual: (usize, usize) },
}

impl LayoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::EmptySequence => ErrorKind::InvalidArgument,
            LayoutError::RankMismatch { .. }
            | LayoutError::ChannelAxis { .. }
            | LayoutError::InconsistentStep { .. } => ErrorKind::DimensionMismatch,
        }
    }
}

impl std::error::Error for LayoutError {}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::RankMismatch { expected, actual } => {
                write!(f, "Expected a {expected}-dimensional array; got {actual} dimensions")
            }
            LayoutError::ChannelAxis { len } => {
                write!(f, "Convolutional layout requires a leading axis of length 1; got {len}")
            }
            LayoutError::EmptySequence => write!(f, "Sequence layout must hold at least one step"),
            LayoutError::InconsistentStep { index, expected, actual } => {
                write!(f, "Sequence step {index} has shape {actual:?}; expected {expected:?}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<LayoutError> for PyErr {
    fn from(err: LayoutError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

//! Errors for network construction and evaluation.
//!
//! ## Conventions
//! - Construction problems (channel lists, block options, dilation
//!   overflow) are [`ErrorKind::Configuration`].
//! - Inputs whose channel axis disagrees with the first layer are
//!   [`ErrorKind::DimensionMismatch`]; layout problems of the 4-D input are
//!   wrapped [`LayoutError`]s.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{errors::ErrorKind, layout::errors::LayoutError};

/// Result alias for network operations.
pub type NetworkResult<T> = Result<T, NetworkError>;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    // ---- Construction ----
    /// A TCN needs at least an input and an output channel count.
    TooFewChannels { len: usize },

    /// Channel counts must be at least 1.
    ZeroChannels { index: usize },

    /// A block / network option is outside its domain.
    InvalidOption { field: &'static str, value: f64, reason: &'static str },

    /// `dilation_factor^layer` does not fit in `usize`.
    DilationOverflow { layer: usize },

    // ---- Evaluation ----
    /// Input channel axis does not match the first layer.
    InputChannels { expected: usize, actual: usize },

    /// Input has no time steps or no samples.
    EmptyInput { axis: &'static str },

    /// Input tensor does not follow the convolutional layout.
    Layout(LayoutError),
}

impl NetworkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::TooFewChannels { .. }
            | NetworkError::ZeroChannels { .. }
            | NetworkError::InvalidOption { .. }
            | NetworkError::DilationOverflow { .. } => ErrorKind::Configuration,
            NetworkError::InputChannels { .. } => ErrorKind::DimensionMismatch,
            NetworkError::EmptyInput { .. } => ErrorKind::InvalidArgument,
            NetworkError::Layout(err) => err.kind(),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::TooFewChannels { len } => {
                write!(f, "A TCN needs at least two channel counts; got {len}")
            }
            NetworkError::ZeroChannels { index } => {
                write!(f, "Channel count at index {index} must be at least 1")
            }
            NetworkError::InvalidOption { field, value, reason } => {
                write!(f, "Invalid network option {field} = {value}. {reason}")
            }
            NetworkError::DilationOverflow { layer } => {
                write!(f, "Dilation of layer {layer} overflows usize")
            }
            NetworkError::InputChannels { expected, actual } => {
                write!(f, "Input has {actual} channels; the network expects {expected}")
            }
            NetworkError::EmptyInput { axis } => {
                write!(f, "Input must have at least one entry along the {axis} axis")
            }
            NetworkError::Layout(err) => write!(f, "Layout error: {err}"),
        }
    }
}

impl From<LayoutError> for NetworkError {
    fn from(err: LayoutError) -> Self {
        NetworkError::Layout(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<NetworkError> for PyErr {
    fn from(err: NetworkError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_construction_versus_evaluation() {
        assert_eq!(NetworkError::TooFewChannels { len: 1 }.kind(), ErrorKind::Configuration);
        assert_eq!(NetworkError::DilationOverflow { layer: 70 }.kind(), ErrorKind::Configuration);
        assert_eq!(
            NetworkError::InputChannels { expected: 2, actual: 3 }.kind(),
            ErrorKind::DimensionMismatch
        );
        let wrapped: NetworkError = LayoutError::ChannelAxis { len: 2 }.into();
        assert_eq!(wrapped.kind(), ErrorKind::DimensionMismatch);
        assert!(wrapped.to_string().contains("leading axis"));
    }
}

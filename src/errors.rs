//! Error classification shared by every subsystem.
//!
//! Each subsystem (`dgp`, `layout`, `network`, `inference`) carries its own
//! error enum with variant-specific payloads. Callers that only need to know
//! *what kind* of failure occurred match on [`ErrorKind`] via the `kind()`
//! method every error type exposes, instead of on individual variants.

use std::fmt;

/// Coarse error category.
///
/// Variants
/// --------
/// - `InvalidArgument`
///   A call-time argument is outside its domain (e.g. zero sample count,
///   out-of-support parameter value).
/// - `DimensionMismatch`
///   An array's length, rank, or shape does not match the layout the
///   operation expects.
/// - `Configuration`
///   A model or network was constructed with an inconsistent configuration.
/// - `Numerical`
///   A computation produced non-finite values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    DimensionMismatch,
    Configuration,
    Numerical,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::DimensionMismatch => "dimension mismatch",
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Numerical => "numerical error",
        };
        f.write_str(label)
    }
}

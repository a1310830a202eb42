//! Error types for the hysteria filter.
//!
//! Every check runs before any plane is touched, so an error always means
//! the whole frame was rejected and nothing was produced.

use thiserror::Error;

/// Errors that can occur while validating or filtering a frame
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HysteriaError {
    /// Input is not a usable frame (empty plane, bad raw buffer, foreign object)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Plane layout does not match the declared format
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Bit depth outside the supported 8-16 range
    #[error("unsupported depth: {0} bits per sample (expected 8-16)")]
    UnsupportedDepth(u8),

    /// Two planes fed to a binary operation differ in size
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        /// Expected (width, height)
        expected: (usize, usize),
        /// Actual (width, height)
        actual: (usize, usize),
    },

    /// A parameter lies outside its valid range
    #[error("parameter `{name}` out of range: {value} not in {min}..={max}")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Result type for hysteria operations
pub type HysteriaResult<T> = Result<T, HysteriaError>;

impl HysteriaError {
    pub(crate) fn out_of_range(name: &'static str, value: impl Into<f64>, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        HysteriaError::ParameterOutOfRange {
            name,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        }
    }
}

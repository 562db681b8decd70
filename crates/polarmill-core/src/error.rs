//! Error handling for Polarmill
//!
//! Parameter errors raised when a machining snapshot cannot produce a
//! toolpath. Every crate in the workspace wraps them in its own error type.

use thiserror::Error;

/// Parameter validation error type
///
/// Raised when a machining parameter snapshot cannot produce a toolpath.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Dimensions are invalid (zero or negative).
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

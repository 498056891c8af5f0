//! Common error types for primitives

use thiserror::Error;

/// Error produced when parsing a fixed-size primitive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Hex decoding failed
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Wrong number of bytes for the target type
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        got: usize,
    },
}

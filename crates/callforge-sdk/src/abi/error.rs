//! ABI codec errors

use callforge_primitives::CodecError;
use thiserror::Error;

/// ABI encoding or decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A value is wider than its declared fixed size
    #[error("size overflow for {ty}: value needs {given} bytes, exceeds size of {max} bytes")]
    SizeOverflow {
        /// Declared type
        ty: String,
        /// Bytes needed by the value
        given: usize,
        /// Bytes allowed by the type
        max: usize,
    },

    /// Value kind does not match the declared type
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Kind of the supplied value
        found: String,
    },

    /// Wrong number of values for a parameter list, tuple or fixed array
    #[error("expected {expected} values, got {got}")]
    LengthMismatch {
        /// Values required
        expected: usize,
        /// Values supplied
        got: usize,
    },

    /// Data ended before the schema was satisfied
    #[error("insufficient data: need {expected} bytes, have {actual}")]
    InsufficientData {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Calldata does not start with the expected selector
    #[error("selector mismatch: expected {expected}, got {found}")]
    SelectorMismatch {
        /// Expected selector (hex)
        expected: String,
        /// Found selector (hex)
        found: String,
    },

    /// Decoded string is not UTF-8
    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(String),

    /// Unknown or malformed type name
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Textual argument could not be parsed for its type
    #[error("invalid value for {ty}: {value}")]
    InvalidValue {
        /// Target type
        ty: String,
        /// Offending input
        value: String,
    },

    /// Byte conversion error
    #[error(transparent)]
    Codec(#[from] CodecError),
}

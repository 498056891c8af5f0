//! Conversions between scalar values and byte arrays.
//!
//! Numbers and booleans are big-endian and pad on the left; strings and hex
//! data pad on the right. A requested `size` smaller than the natural encoding
//! is an error, values are never truncated.
//!
//! ```rust
//! use callforge_primitives::codec::{bool_to_bytes, hex_to_bytes, string_to_bytes};
//!
//! assert_eq!(string_to_bytes("Hi", Some(5)).unwrap(), vec![72, 105, 0, 0, 0]);
//! assert_eq!(bool_to_bytes(true, Some(4)).unwrap(), vec![0, 0, 0, 1]);
//! assert_eq!(hex_to_bytes("0xabc", None).unwrap(), vec![0x0a, 0xbc]);
//! ```

use primitive_types::U256;
use thiserror::Error;

/// Byte conversion error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The value needs more bytes than the requested size
    #[error("size overflow: value needs {given} bytes, exceeds size of {max} bytes")]
    SizeOverflow {
        /// Bytes required by the value
        given: usize,
        /// Requested size
        max: usize,
    },

    /// A non-hex character was found
    #[error("invalid hex digits {chunk:?} at byte {position}")]
    InvalidHex {
        /// Byte index of the offending pair
        position: usize,
        /// The two-character substring that failed to parse
        chunk: String,
    },
}

/// A value that can be turned into bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteSource<'a> {
    /// Single 0/1 byte
    Bool(bool),
    /// Minimal big-endian bytes
    Number(U256),
    /// `0x`-prefixed hex data
    Hex(&'a str),
    /// UTF-8 text
    Text(&'a str),
}

impl From<bool> for ByteSource<'_> {
    fn from(value: bool) -> Self {
        ByteSource::Bool(value)
    }
}

impl From<u64> for ByteSource<'_> {
    fn from(value: u64) -> Self {
        ByteSource::Number(U256::from(value))
    }
}

impl From<u128> for ByteSource<'_> {
    fn from(value: u128) -> Self {
        ByteSource::Number(U256::from(value))
    }
}

impl From<U256> for ByteSource<'_> {
    fn from(value: U256) -> Self {
        ByteSource::Number(value)
    }
}

impl<'a> From<&'a str> for ByteSource<'a> {
    fn from(value: &'a str) -> Self {
        if value.starts_with("0x") {
            ByteSource::Hex(value)
        } else {
            ByteSource::Text(value)
        }
    }
}

/// Convert any supported value to bytes, dispatching on its kind
pub fn to_bytes<'a>(value: impl Into<ByteSource<'a>>, size: Option<usize>) -> Result<Vec<u8>, CodecError> {
    match value.into() {
        ByteSource::Bool(b) => bool_to_bytes(b, size),
        ByteSource::Number(n) => number_to_bytes(n, size),
        ByteSource::Hex(h) => hex_to_bytes(h, size),
        ByteSource::Text(s) => string_to_bytes(s, size),
    }
}

/// Encode a boolean as a single byte, left-padded to `size`
pub fn bool_to_bytes(value: bool, size: Option<usize>) -> Result<Vec<u8>, CodecError> {
    pad_left(vec![u8::from(value)], size)
}

/// Encode a number as minimal big-endian bytes, left-padded to `size`
///
/// Zero encodes as a single zero byte.
pub fn number_to_bytes(value: U256, size: Option<usize>) -> Result<Vec<u8>, CodecError> {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    let start = word.iter().position(|&b| b != 0).unwrap_or(31);
    pad_left(word[start..].to_vec(), size)
}

/// Encode a string as UTF-8 bytes, right-padded to `size`
pub fn string_to_bytes(value: &str, size: Option<usize>) -> Result<Vec<u8>, CodecError> {
    pad_right(value.as_bytes().to_vec(), size)
}

/// Decode hex data, right-padded to `size`
///
/// The `0x` prefix is optional. Odd-length input is read as if it had one
/// more leading zero nibble.
pub fn hex_to_bytes(value: &str, size: Option<usize>) -> Result<Vec<u8>, CodecError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let digits = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };

    let bytes = hex::decode(&digits).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            let position = index / 2;
            let start = position * 2;
            let chunk = digits
                .get(start..start + 2)
                .or_else(|| digits.get(start..))
                .unwrap_or_default()
                .to_string();
            CodecError::InvalidHex { position, chunk }
        }
        // Unreachable for even-length input
        other => CodecError::InvalidHex {
            position: 0,
            chunk: other.to_string(),
        },
    })?;

    pad_right(bytes, size)
}

/// Lowercase `0x`-prefixed hex encoding
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Left-pad with zero bytes up to `size`
pub fn pad_left(bytes: Vec<u8>, size: Option<usize>) -> Result<Vec<u8>, CodecError> {
    let Some(size) = size else {
        return Ok(bytes);
    };
    check_size(bytes.len(), size)?;
    let mut padded = vec![0u8; size - bytes.len()];
    padded.extend(bytes);
    Ok(padded)
}

/// Right-pad with zero bytes up to `size`
pub fn pad_right(mut bytes: Vec<u8>, size: Option<usize>) -> Result<Vec<u8>, CodecError> {
    let Some(size) = size else {
        return Ok(bytes);
    };
    check_size(bytes.len(), size)?;
    bytes.resize(size, 0);
    Ok(bytes)
}

fn check_size(given: usize, max: usize) -> Result<(), CodecError> {
    if given > max {
        return Err(CodecError::SizeOverflow { given, max });
    }
    Ok(())
}

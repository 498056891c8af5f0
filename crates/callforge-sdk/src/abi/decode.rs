//! ABI decoding

use callforge_primitives::{Address, U256};

use super::error::AbiError;
use super::types::{ParamType, Token, I256};

/// Decode tokens from ABI-encoded data
///
/// An empty schema decodes to an empty list regardless of the data.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_block(types, data, 0)
}

/// Decode a parameter block starting at `base`
///
/// Offsets of dynamic members are relative to `base`.
fn decode_block(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut cursor = base;

    for param_type in types {
        tokens.push(decode_member(param_type, data, base, cursor)?);
        cursor = checked_add(cursor, head_len(param_type, data)?, data)?;
    }

    Ok(tokens)
}

/// Decode `count` elements of one type laid out as a block at `base`
///
/// The whole head is checked against the data before anything is allocated.
fn decode_repeated(
    inner: &ParamType,
    count: usize,
    data: &[u8],
    base: usize,
) -> Result<Vec<Token>, AbiError> {
    let stride = head_len(inner, data)?;
    let required = count
        .checked_mul(stride.max(1))
        .and_then(|n| n.checked_add(base))
        .unwrap_or(usize::MAX);
    check_length(data, required)?;

    let mut tokens = Vec::with_capacity(count);
    let mut cursor = base;
    for _ in 0..count {
        tokens.push(decode_member(inner, data, base, cursor)?);
        cursor = checked_add(cursor, stride, data)?;
    }
    Ok(tokens)
}

/// Decode the member whose head slot is at `cursor` in the block at `base`
fn decode_member(
    param_type: &ParamType,
    data: &[u8],
    base: usize,
    cursor: usize,
) -> Result<Token, AbiError> {
    if param_type.is_dynamic() {
        let offset = read_usize(data, cursor)?;
        let start = checked_add(base, offset, data)?;
        decode_token(param_type, data, start)
    } else {
        decode_token(param_type, data, cursor)
    }
}

/// Decode a single value located at `pos`
fn decode_token(param_type: &ParamType, data: &[u8], pos: usize) -> Result<Token, AbiError> {
    match param_type {
        ParamType::Address => {
            let word = read_word(data, pos)?;
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address::from_bytes(addr)))
        }
        ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(read_word(data, pos)?))),
        ParamType::Int(_) => {
            let word = U256::from_big_endian(read_word(data, pos)?);
            let negative = word.bit(255);
            let abs = if negative {
                (!word).overflowing_add(U256::one()).0
            } else {
                word
            };
            Ok(Token::Int(I256::new(abs, negative)))
        }
        ParamType::Bool => Ok(Token::Bool(read_word(data, pos)?[31] != 0)),
        ParamType::FixedBytes(size) => {
            let word = read_word(data, pos)?;
            let size = (*size).min(32);
            Ok(Token::FixedBytes(word[..size].to_vec()))
        }
        ParamType::Bytes => Ok(Token::Bytes(read_bytes(data, pos)?.to_vec())),
        ParamType::String => {
            let bytes = read_bytes(data, pos)?;
            let s = String::from_utf8(bytes.to_vec())
                .map_err(|e| AbiError::InvalidUtf8(e.to_string()))?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, pos)?;
            let start = checked_add(pos, 32, data)?;
            Ok(Token::Array(decode_repeated(inner, len, data, start)?))
        }
        ParamType::FixedArray(inner, size) => {
            Ok(Token::FixedArray(decode_repeated(inner, *size, data, pos)?))
        }
        ParamType::Tuple(types) => Ok(Token::Tuple(decode_block(types, data, pos)?)),
    }
}

fn read_word(data: &[u8], pos: usize) -> Result<&[u8], AbiError> {
    let end = checked_add(pos, 32, data)?;
    check_length(data, end)?;
    Ok(&data[pos..end])
}

/// Read a word used as a length or offset
fn read_usize(data: &[u8], pos: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(read_word(data, pos)?);
    // Anything past the buffer is unusable as a length or offset
    if value > U256::from(data.len()) {
        return Err(AbiError::InsufficientData {
            expected: if value > U256::from(usize::MAX) {
                usize::MAX
            } else {
                value.as_usize()
            },
            actual: data.len(),
        });
    }
    Ok(value.as_usize())
}

/// Length-prefixed byte string at `pos`
fn read_bytes(data: &[u8], pos: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(data, pos)?;
    let start = checked_add(pos, 32, data)?;
    let end = checked_add(start, len, data)?;
    check_length(data, end)?;
    Ok(&data[start..end])
}

/// Head size of a type; sizes past `usize` can never be satisfied
fn head_len(param_type: &ParamType, data: &[u8]) -> Result<usize, AbiError> {
    param_type.head_len().ok_or(AbiError::InsufficientData {
        expected: usize::MAX,
        actual: data.len(),
    })
}

fn checked_add(a: usize, b: usize, data: &[u8]) -> Result<usize, AbiError> {
    a.checked_add(b).ok_or(AbiError::InsufficientData {
        expected: usize::MAX,
        actual: data.len(),
    })
}

/// Check that data has at least `required` bytes
fn check_length(data: &[u8], required: usize) -> Result<(), AbiError> {
    if data.len() < required {
        return Err(AbiError::InsufficientData {
            expected: required,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_schema() {
        assert!(decode(&[], &[]).unwrap().is_empty());
        assert!(decode(&[], &[0u8; 32]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let mut encoded = [0u8; 32];
        encoded[12..32].copy_from_slice(addr.as_bytes());

        let tokens = decode(&[ParamType::Address], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Address(addr)]);
    }

    #[test]
    fn test_decode_multiple_params() {
        let mut encoded = [0u8; 64];
        encoded[31] = 1;
        encoded[63] = 100;

        let tokens = decode(&[ParamType::Bool, ParamType::Uint(256)], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Bool(true), Token::uint(100u64)]);
    }

    #[test]
    fn test_decode_string() {
        let mut encoded = vec![0u8; 96];
        encoded[31] = 32;
        encoded[63] = 5;
        encoded[64..69].copy_from_slice(b"hello");

        let tokens = decode(&[ParamType::String], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::string("hello")]);
    }

    #[test]
    fn test_decode_int_negative() {
        let encoded = [0xffu8; 32];
        let tokens = decode(&[ParamType::Int(256)], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Int(I256::from_i128(-1))]);
    }

    #[test]
    fn test_decode_insufficient_data() {
        let data = [0u8; 16];
        assert_eq!(
            decode(&[ParamType::Uint(256)], &data),
            Err(AbiError::InsufficientData {
                expected: 32,
                actual: 16
            })
        );
    }

    #[test]
    fn test_decode_second_word_missing() {
        let data = [0u8; 32];
        assert_eq!(
            decode(&[ParamType::Uint(256), ParamType::Address], &data),
            Err(AbiError::InsufficientData {
                expected: 64,
                actual: 32
            })
        );
    }

    #[test]
    fn test_decode_offset_out_of_range() {
        let mut data = [0u8; 32];
        data[30] = 0x10; // offset 4096
        assert!(matches!(
            decode(&[ParamType::Bytes], &data),
            Err(AbiError::InsufficientData { expected: 4096, actual: 32 })
        ));
    }

    #[test]
    fn test_decode_huge_array_length() {
        // offset 32, then a length far beyond the buffer
        let mut data = vec![0u8; 64];
        data[31] = 32;
        data[32..64].copy_from_slice(&[0xff; 32]);
        assert!(matches!(
            decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], &data),
            Err(AbiError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_decode_large_fixed_array_needs_data() {
        let ty = crate::abi::parse_type("uint256[268435456]").unwrap();
        assert_eq!(
            decode(&[ty], &[0u8; 32]),
            Err(AbiError::InsufficientData {
                expected: 268_435_456 * 32,
                actual: 32
            })
        );
    }

    #[test]
    fn test_decode_fixed_array_size_past_usize() {
        let ty = ParamType::FixedArray(Box::new(ParamType::Uint(256)), 1 << 60);
        assert_eq!(
            decode(&[ty.clone()], &[0u8; 64]),
            Err(AbiError::InsufficientData {
                expected: usize::MAX,
                actual: 64
            })
        );

        // Behind another member the head walk reports the same
        let nested = ParamType::FixedArray(Box::new(ty), 4);
        assert!(matches!(
            decode(&[ParamType::Bool, nested], &[0u8; 64]),
            Err(AbiError::InsufficientData { actual: 64, .. })
        ));
    }

    #[test]
    fn test_decode_large_dynamic_fixed_array_needs_data() {
        // offset 32, then far fewer offset slots than the type declares
        let mut data = vec![0u8; 96];
        data[31] = 32;
        let ty = ParamType::FixedArray(Box::new(ParamType::String), 1_000_000);
        assert!(matches!(
            decode(&[ty], &data),
            Err(AbiError::InsufficientData { expected, actual: 96 }) if expected == 32 + 32 * 1_000_000
        ));
    }

    #[test]
    fn test_decode_static_fixed_array() {
        let mut data = vec![0u8; 96];
        data[31] = 1;
        data[63] = 2;
        data[95] = 3;
        let ty = ParamType::FixedArray(Box::new(ParamType::Uint(8)), 3);
        assert_eq!(
            decode(&[ty], &data).unwrap(),
            vec![Token::FixedArray(vec![
                Token::uint(1u64),
                Token::uint(2u64),
                Token::uint(3u64)
            ])]
        );
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut encoded = vec![0u8; 96];
        encoded[31] = 32;
        encoded[63] = 2;
        encoded[64] = 0xff;
        encoded[65] = 0xfe;
        assert!(matches!(
            decode(&[ParamType::String], &encoded),
            Err(AbiError::InvalidUtf8(_))
        ));
    }
}

//! ABI encoding

use callforge_primitives::{Selector, U256};

use super::error::AbiError;
use super::types::{head_len_of, ParamType, Token};

/// Encode tokens against their declared types using the head/tail layout
///
/// Static values are written in place; dynamic values leave a 32-byte offset
/// in the head (relative to the start of this block) and append their
/// content to the tail.
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    if types.len() != tokens.len() {
        return Err(AbiError::LengthMismatch {
            expected: types.len(),
            got: tokens.len(),
        });
    }

    let head_size = head_len_of(types).ok_or_else(|| AbiError::InvalidType(type_list(types)))?;
    let mut head = Vec::new();
    let mut tail = Vec::new();

    for (param_type, token) in types.iter().zip(tokens) {
        let encoded = encode_token(param_type, token)?;
        if param_type.is_dynamic() {
            head.extend(encode_usize(head_size + tail.len()));
            tail.extend(encoded);
        } else {
            head.extend(encoded);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Encode a function call: selector followed by the encoded arguments
pub fn encode_function_call(
    selector: Selector,
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, AbiError> {
    let mut data = selector.to_vec();
    data.extend(encode(types, tokens)?);
    Ok(data)
}

fn encode_token(param_type: &ParamType, token: &Token) -> Result<Vec<u8>, AbiError> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let mut buf = [0u8; 32];
            buf[12..].copy_from_slice(addr.as_bytes());
            Ok(buf.to_vec())
        }
        (ParamType::Uint(bits), Token::Uint(value)) => {
            if value.bits() > *bits {
                return Err(AbiError::SizeOverflow {
                    ty: param_type.to_string(),
                    given: value.bits().div_ceil(8),
                    max: bits / 8,
                });
            }
            Ok(encode_u256(value))
        }
        (ParamType::Int(bits), Token::Int(value)) => {
            if value.bits() > *bits {
                return Err(AbiError::SizeOverflow {
                    ty: param_type.to_string(),
                    given: value.bits().div_ceil(8),
                    max: bits / 8,
                });
            }
            if value.is_negative() {
                // Two's complement over the full word sign-extends to 256 bits
                let (twos, _) = (!value.abs()).overflowing_add(U256::one());
                Ok(encode_u256(&twos))
            } else {
                Ok(encode_u256(&value.abs()))
            }
        }
        (ParamType::Bool, Token::Bool(b)) => {
            let mut buf = [0u8; 32];
            buf[31] = u8::from(*b);
            Ok(buf.to_vec())
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() > *size {
                return Err(AbiError::SizeOverflow {
                    ty: param_type.to_string(),
                    given: data.len(),
                    max: *size,
                });
            }
            let mut buf = [0u8; 32];
            buf[..data.len()].copy_from_slice(data);
            Ok(buf.to_vec())
        }
        (ParamType::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
        (ParamType::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            let mut result = encode_usize(tokens.len());
            let inner_types = vec![(**inner).clone(); tokens.len()];
            result.extend(encode(&inner_types, tokens)?);
            Ok(result)
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(tokens)) => {
            if tokens.len() != *size {
                return Err(AbiError::LengthMismatch {
                    expected: *size,
                    got: tokens.len(),
                });
            }
            let inner_types = vec![(**inner).clone(); *size];
            encode(&inner_types, tokens)
        }
        (ParamType::Tuple(types), Token::Tuple(tokens)) => encode(types, tokens),
        (expected, found) => Err(AbiError::TypeMismatch {
            expected: expected.to_string(),
            found: found.kind().to_string(),
        }),
    }
}

fn type_list(types: &[ParamType]) -> String {
    let names: Vec<String> = types.iter().map(ParamType::to_string).collect();
    format!("({})", names.join(","))
}

fn encode_u256(value: &U256) -> Vec<u8> {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes.to_vec()
}

fn encode_usize(value: usize) -> Vec<u8> {
    encode_u256(&U256::from(value))
}

/// Length word followed by the data, zero-padded to a multiple of 32
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_usize(data.len());
    let padded_len = data.len().div_ceil(32) * 32;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::I256;
    use callforge_primitives::Address;

    fn word(data: &[u8], index: usize) -> &[u8] {
        &data[index * 32..(index + 1) * 32]
    }

    #[test]
    fn test_encode_empty_schema() {
        assert!(encode(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_encode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let encoded = encode(&[ParamType::Address], &[Token::Address(addr)]).unwrap();

        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..32], addr.as_bytes());
    }

    #[test]
    fn test_encode_uint_and_bool() {
        let encoded = encode(
            &[ParamType::Uint(256), ParamType::Bool],
            &[Token::uint(100u64), Token::Bool(true)],
        )
        .unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 100);
        assert_eq!(encoded[63], 1);
    }

    #[test]
    fn test_encode_negative_int() {
        let encoded = encode(&[ParamType::Int(256)], &[Token::Int(I256::from_i128(-1))]).unwrap();
        assert_eq!(encoded, vec![0xff; 32]);

        let encoded = encode(&[ParamType::Int(8)], &[Token::Int(I256::from_i128(-2))]).unwrap();
        assert_eq!(encoded[31], 0xfe);
        assert_eq!(encoded[0], 0xff);
    }

    #[test]
    fn test_encode_dynamic_bytes() {
        let data = vec![0x01, 0x02, 0x03];
        let encoded = encode(&[ParamType::Bytes], &[Token::Bytes(data.clone())]).unwrap();

        // offset + length + padded data
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 32);
        assert_eq!(encoded[63], 3);
        assert_eq!(&encoded[64..67], &data[..]);
    }

    #[test]
    fn test_encode_static_tuple_inline() {
        let types = [
            ParamType::Tuple(vec![ParamType::Uint(256), ParamType::Bool]),
            ParamType::Uint(8),
        ];
        let tokens = [
            Token::Tuple(vec![Token::uint(7u64), Token::Bool(true)]),
            Token::uint(9u64),
        ];
        let encoded = encode(&types, &tokens).unwrap();
        assert_eq!(encoded.len(), 96);
        assert_eq!(word(&encoded, 0)[31], 7);
        assert_eq!(word(&encoded, 1)[31], 1);
        assert_eq!(word(&encoded, 2)[31], 9);
    }

    #[test]
    fn test_encode_dynamic_tuple_moves_to_tail() {
        let types = [
            ParamType::Uint(256),
            ParamType::Tuple(vec![ParamType::Uint(256), ParamType::String]),
        ];
        let tokens = [
            Token::uint(1u64),
            Token::Tuple(vec![Token::uint(2u64), Token::string("hi")]),
        ];
        let encoded = encode(&types, &tokens).unwrap();

        assert_eq!(word(&encoded, 0)[31], 1);
        // Tuple offset points past the two head words
        assert_eq!(word(&encoded, 1)[31], 64);
        // Tuple block: uint, offset to string (relative to tuple start), len, data
        assert_eq!(word(&encoded, 2)[31], 2);
        assert_eq!(word(&encoded, 3)[31], 64);
        assert_eq!(word(&encoded, 4)[31], 2);
        assert_eq!(&word(&encoded, 5)[..2], b"hi");
        assert_eq!(encoded.len(), 6 * 32);
    }

    #[test]
    fn test_encode_string_array() {
        let types = [ParamType::Array(Box::new(ParamType::String))];
        let tokens = [Token::Array(vec![Token::string("a"), Token::string("b")])];
        let encoded = encode(&types, &tokens).unwrap();

        assert_eq!(word(&encoded, 0)[31], 32); // offset to array
        assert_eq!(word(&encoded, 1)[31], 2); // length
        assert_eq!(word(&encoded, 2)[31], 64); // offset of "a" within elements block
        assert_eq!(word(&encoded, 3)[31], 128); // offset of "b"
        assert_eq!(encoded.len(), 8 * 32);
    }

    #[test]
    fn test_encode_uint_overflow() {
        let err = encode(&[ParamType::Uint(8)], &[Token::uint(256u64)]).unwrap_err();
        assert_eq!(
            err,
            AbiError::SizeOverflow {
                ty: "uint8".to_string(),
                given: 2,
                max: 1
            }
        );
    }

    #[test]
    fn test_encode_int_overflow() {
        let err = encode(&[ParamType::Int(8)], &[Token::Int(I256::from_i128(128))]).unwrap_err();
        assert!(matches!(err, AbiError::SizeOverflow { max: 1, .. }));
        assert!(encode(&[ParamType::Int(8)], &[Token::Int(I256::from_i128(-128))]).is_ok());
    }

    #[test]
    fn test_encode_fixed_bytes_overflow() {
        let err = encode(&[ParamType::FixedBytes(2)], &[Token::FixedBytes(vec![1, 2, 3])]).unwrap_err();
        assert_eq!(
            err,
            AbiError::SizeOverflow {
                ty: "bytes2".to_string(),
                given: 3,
                max: 2
            }
        );
    }

    #[test]
    fn test_encode_type_mismatch() {
        let err = encode(&[ParamType::Address], &[Token::Bool(true)]).unwrap_err();
        assert_eq!(
            err,
            AbiError::TypeMismatch {
                expected: "address".to_string(),
                found: "bool".to_string()
            }
        );
    }

    #[test]
    fn test_encode_arity_mismatch() {
        let err = encode(&[ParamType::Address, ParamType::Bool], &[Token::Bool(true)]).unwrap_err();
        assert_eq!(err, AbiError::LengthMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn test_encode_fixed_array_size_past_usize() {
        let ty = ParamType::FixedArray(Box::new(ParamType::Uint(256)), 1 << 60);
        let err = encode(&[ty], &[Token::FixedArray(vec![])]).unwrap_err();
        assert_eq!(err, AbiError::InvalidType("(uint256[1152921504606846976])".to_string()));
    }

    #[test]
    fn test_encode_fixed_array_count_checked() {
        let ty = ParamType::FixedArray(Box::new(ParamType::Uint(256)), 268_435_456);
        let err = encode(&[ty], &[Token::FixedArray(vec![Token::uint(1u64)])]).unwrap_err();
        assert_eq!(err, AbiError::LengthMismatch { expected: 268_435_456, got: 1 });
    }

    #[test]
    fn test_encode_function_call() {
        let to = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let encoded = encode_function_call(
            [0xa9, 0x05, 0x9c, 0xbb],
            &[ParamType::Address, ParamType::Uint(256)],
            &[Token::Address(to), Token::uint(1000u64)],
        )
        .unwrap();

        assert_eq!(encoded.len(), 68);
        assert_eq!(&encoded[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }
}

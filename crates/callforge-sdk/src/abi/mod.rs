//! ABI encoding and decoding for Solidity contracts
//!
//! This module provides:
//! - Head/tail encoding of parameter lists and function calls
//! - Schema-driven decoding of return data
//! - Function selectors
//! - `ParamSpec` descriptors and structural JSON rendering
//!
//! # Example
//!
//! ```rust
//! use callforge_sdk::abi::{decode, encode_function_call, function_selector, ParamType, Token};
//! use callforge_primitives::{Address, U256};
//!
//! let selector = function_selector("transfer(address,uint256)");
//! let data = encode_function_call(
//!     selector,
//!     &[ParamType::Address, ParamType::Uint(256)],
//!     &[Token::Address(Address::ZERO), Token::Uint(U256::from(1000))],
//! )
//! .unwrap();
//! assert_eq!(data.len(), 4 + 64);
//!
//! let balance = decode(&[ParamType::Uint(256)], &[0u8; 32]).unwrap();
//! assert_eq!(balance, vec![Token::Uint(U256::zero())]);
//! ```

mod decode;
mod encode;
mod error;
mod json;
mod param;
mod parse;
mod types;

use callforge_primitives::Selector;

pub use decode::decode;
pub use encode::{encode, encode_function_call};
pub use error::AbiError;
pub use json::{outputs_to_json, to_json};
pub use param::{param_types, ParamSpec};
pub use parse::{parse_token, parse_type, parse_type_list};
pub use types::{head_len_of, ParamType, Token, I256};

/// Compute a function selector from a canonical signature
///
/// `function_selector("transfer(address,uint256)") == [0xa9, 0x05, 0x9c, 0xbb]`
pub fn function_selector(signature: &str) -> Selector {
    callforge_crypto::selector(signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_selector() {
        assert_eq!(function_selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(function_selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }
}

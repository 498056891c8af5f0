//! # callforge-primitives
//!
//! Primitive types shared by the callforge crates.
//!
//! - [`Address`] and [`H256`] fixed-size byte types
//! - [`U256`] re-exported from `primitive-types`
//! - [`codec`]: conversions between numbers, booleans, strings and byte arrays

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
pub mod codec;
mod error;
mod hash;

pub use address::Address;
pub use codec::{
    bool_to_bytes, bytes_to_hex, hex_to_bytes, number_to_bytes, string_to_bytes, to_bytes,
    ByteSource, CodecError,
};
pub use error::PrimitiveError;
pub use hash::H256;

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Chain identifier
pub type ChainId = u64;

/// Four-byte function selector
pub type Selector = [u8; 4];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_roundtrip_big_endian() {
        let value = U256::from(0x1234_5678u64);
        let mut buf = [0u8; 32];
        value.to_big_endian(&mut buf);
        assert_eq!(U256::from_big_endian(&buf), value);
    }
}

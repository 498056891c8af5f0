//! # callforge-crypto
//!
//! Cryptographic helpers for callforge.
//!
//! - Keccak-256 hashing and function selectors
//! - EIP-191 personal message hashing
//! - EIP-55 checksummed addresses
//! - secp256k1 signing and signer recovery

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod signature;

pub use error::CryptoError;
pub use hash::{hash_message, keccak256, selector, to_checksum_address};
pub use signature::{public_key_to_address, recover_address, sign, PrivateKey, PublicKey, Signature};

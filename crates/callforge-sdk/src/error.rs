//! SDK error types

use callforge_primitives::CodecError;
use thiserror::Error;

use crate::abi::AbiError;

/// SDK error type
///
/// `Clone` so that every waiter on a shared params future observes the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SdkError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC error from node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// ABI encoding or decoding error
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Byte conversion error
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Call parameters could not be produced
    #[error("Params error: {0}")]
    Params(String),

    /// Signature or key error
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<callforge_crypto::CryptoError> for SdkError {
    fn from(e: callforge_crypto::CryptoError) -> Self {
        SdkError::Crypto(e.to_string())
    }
}

impl From<callforge_primitives::PrimitiveError> for SdkError {
    fn from(e: callforge_primitives::PrimitiveError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}

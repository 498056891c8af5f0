//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Signing failed
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Malformed signature bytes
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Recovery id outside 0..=1 (or 27..=28)
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Public key recovery failed
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),
}

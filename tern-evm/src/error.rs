//! Error types for Ethereum key derivation, signing and recovery.
//!
//! Messages never include key material.

use thiserror::Error;

use crate::rlp::RlpError;

/// Errors that can occur during Ethereum key and transaction operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed path, or a derivation step produced an out-of-range key.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),
    /// Private key is zero, not below the curve order, or of the wrong length.
    #[error("invalid private key")]
    InvalidPrivateKey,
    /// Signing key bytes failed validation.
    #[error("signing key is invalid")]
    SigningKeyInvalid,
    /// Payload matches neither the legacy nor the fee-market shape.
    #[error("unsupported transaction type: {0}")]
    UnsupportedTransactionType(String),
    /// Required fields are absent or malformed for the declared variant.
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),
    /// Signature components are out of range or do not recover a public key.
    #[error("invalid signature")]
    InvalidSignature,
    /// Invalid public key encoding.
    #[error("invalid public key")]
    InvalidPublicKey,
    /// Invalid hex string format.
    #[error("invalid hex string")]
    InvalidHex,
}

impl From<RlpError> for Error {
    fn from(err: RlpError) -> Self {
        Self::MalformedTransaction(err.to_string())
    }
}

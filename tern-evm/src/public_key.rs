//! secp256k1 public keys.

use alloy_primitives::Address;
use k256::ecdsa::VerifyingKey;

use crate::{Error, Result};

/// A secp256k1 public key (a curve point).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    pub(crate) const fn from_verifying_key(inner: VerifyingKey) -> Self {
        Self { inner }
    }

    /// Parse a SEC1 encoded point: 33-byte compressed, or 65-byte uncompressed
    /// with the `0x04` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPublicKey`] if the bytes are not a valid point.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self::from_verifying_key)
            .map_err(|_| Error::InvalidPublicKey)
    }

    /// Parse a raw 64-byte `x || y` key (uncompressed without prefix).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPublicKey`] for the wrong length or an
    /// off-curve point.
    pub fn from_raw_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 64 {
            return Err(Error::InvalidPublicKey);
        }
        let mut sec1 = [0u8; 65];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(bytes);
        Self::from_sec1_bytes(&sec1)
    }

    /// Compressed SEC1 encoding (33 bytes).
    #[must_use]
    pub fn to_compressed_bytes(&self) -> [u8; 33] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Uncompressed SEC1 encoding (65 bytes with `0x04` prefix).
    #[must_use]
    pub fn to_uncompressed_bytes(&self) -> [u8; 65] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Raw 64-byte `x || y` encoding, the input to address hashing.
    #[must_use]
    pub fn to_raw_bytes(&self) -> [u8; 64] {
        let uncompressed = self.to_uncompressed_bytes();
        let mut out = [0u8; 64];
        out.copy_from_slice(&uncompressed[1..]);
        out
    }

    /// The Ethereum address for this key.
    #[must_use]
    pub fn address(&self) -> Address {
        crate::address::derive_address(self)
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(inner: VerifyingKey) -> Self {
        Self { inner }
    }
}

/// The public key `k * G` for a validated private key.
#[must_use]
pub fn derive_public_key(private_key: &crate::PrivateKey) -> PublicKey {
    private_key.public_key()
}

/// [`derive_public_key`] over raw key bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidPrivateKey`] for zero, out-of-range, or
/// wrong-length input.
pub fn derive_public_key_from_bytes(bytes: &[u8]) -> Result<PublicKey> {
    crate::PrivateKey::from_bytes(bytes).map(|key| key.public_key())
}

//! secp256k1 private keys.

use core::fmt;
use core::str::FromStr;

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use zeroize::Zeroizing;

use crate::public_key::PublicKey;
use crate::{Error, Result};

/// Length of a serialized private key.
pub const PRIVATE_KEY_LEN: usize = 32;

/// A secp256k1 private key: a scalar in `[1, n-1]`.
///
/// The inner [`SigningKey`] zeroizes itself on drop. `Debug` never prints
/// key material.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Create from 32 big-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] if the length is not 32 or the
    /// scalar is zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(Error::InvalidPrivateKey);
        }
        let inner = SigningKey::from_slice(bytes).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self { inner })
    }

    /// Parse from hex, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHex`] for malformed hex and
    /// [`Error::InvalidPrivateKey`] for an out-of-range scalar.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = Zeroizing::new(hex::decode(s).map_err(|_| Error::InvalidHex)?);
        Self::from_bytes(&bytes)
    }

    /// Serialize to 32 big-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LEN]> {
        Zeroizing::new(self.inner.to_bytes().into())
    }

    /// Hex encoding without `0x` prefix.
    #[must_use]
    pub fn to_hex(&self) -> Zeroizing<String> {
        let bytes = self.to_bytes();
        Zeroizing::new(hex::encode(bytes.as_slice()))
    }

    /// The matching public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(*self.inner.verifying_key())
    }

    /// The Ethereum address controlled by this key.
    #[must_use]
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Sign a 32-byte digest with deterministic RFC 6979 nonces.
    ///
    /// The returned signature is low-s normalized; the recovery id matches it.
    pub(crate) fn sign_prehash(&self, hash: &B256) -> Result<(Signature, RecoveryId)> {
        self.inner
            .sign_prehash_recoverable(hash.as_slice())
            .map_err(|_| Error::SigningKeyInvalid)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for PrivateKey {}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // secp256k1 group order
    const ORDER: [u8; 32] = hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

    #[test]
    fn test_from_hex_roundtrip() {
        let hex_key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let key = PrivateKey::from_hex(hex_key).unwrap();
        assert_eq!(key.to_hex().as_str(), hex_key);
        assert_eq!(PrivateKey::from_hex(&format!("0x{hex_key}")).unwrap(), key);
    }

    #[test]
    fn test_address_from_key() {
        let key: PrivateKey = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
            .parse()
            .unwrap();
        assert_eq!(
            key.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_rejects_zero_and_order() {
        assert_eq!(PrivateKey::from_bytes(&[0u8; 32]), Err(Error::InvalidPrivateKey));
        assert_eq!(PrivateKey::from_bytes(&ORDER), Err(Error::InvalidPrivateKey));
        assert_eq!(PrivateKey::from_bytes(&[0xff; 32]), Err(Error::InvalidPrivateKey));
    }

    #[test]
    fn test_accepts_order_minus_one() {
        let mut max = ORDER;
        max[31] -= 1;
        assert!(PrivateKey::from_bytes(&max).is_ok());
        let mut one = [0u8; 32];
        one[31] = 1;
        assert!(PrivateKey::from_bytes(&one).is_ok());
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(PrivateKey::from_bytes(&[1u8; 31]), Err(Error::InvalidPrivateKey));
        assert_eq!(PrivateKey::from_bytes(&[1u8; 33]), Err(Error::InvalidPrivateKey));
        assert_eq!(PrivateKey::from_hex("zz"), Err(Error::InvalidHex));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = PrivateKey::from_bytes(&[0x46; 32]).unwrap();
        let debug = format!("{key:?}");
        assert_eq!(debug, "PrivateKey([REDACTED])");
        assert!(!debug.contains("4646"));
    }

    #[test]
    fn test_sign_prehash_is_deterministic() {
        let key = PrivateKey::from_bytes(&[0x46; 32]).unwrap();
        let hash = B256::repeat_byte(0xab);
        let (sig1, rec1) = key.sign_prehash(&hash).unwrap();
        let (sig2, rec2) = key.sign_prehash(&hash).unwrap();
        assert_eq!(sig1, sig2);
        assert_eq!(rec1, rec2);
        assert!(sig1.normalize_s().is_none());
    }
}

//! Transaction signing.

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::private_key::PrivateKey;
use crate::request::TransactionRequest;
use crate::signed::{SignedTransaction, TxSignature};
use crate::transaction::{SigningPayload, TypedTransaction};
use crate::{Error, Result};

/// Sign `tx` with `key`.
///
/// Signatures are deterministic (RFC 6979) and low-s normalized, so the same
/// transaction and key always produce the same raw bytes.
///
/// # Errors
///
/// Returns [`Error::MalformedTransaction`] if a legacy chain id is too large
/// to fold into `v`.
pub fn sign_transaction(tx: &TypedTransaction, key: &PrivateKey) -> Result<SignedTransaction> {
    let hash = tx.signing_hash();
    let (signature, recovery_id) = key.sign_prehash(&hash)?;
    let v = tx.signature_v(recovery_id.is_y_odd())?;
    let (r, s) = signature.split_bytes();

    let signed = SignedTransaction::new(
        tx.clone(),
        TxSignature {
            v,
            r: U256::from_be_slice(&r),
            s: U256::from_be_slice(&s),
        },
    );
    debug!(
        kind = tx.kind(),
        chain_id = ?tx.chain_id(),
        signing_hash = %hash,
        tx_hash = %signed.hash(),
        "signed transaction"
    );
    Ok(signed)
}

/// A private key bound to its address, ready to sign.
#[derive(Debug, Clone)]
pub struct Signer {
    key: PrivateKey,
    address: Address,
}

impl Signer {
    /// Wrap an already validated key.
    #[must_use]
    pub fn from_private_key(key: PrivateKey) -> Self {
        let address = key.address();
        Self { key, address }
    }

    /// Build from 32 raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningKeyInvalid`] for the wrong length, zero, or a
    /// value not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        PrivateKey::from_bytes(bytes)
            .map(Self::from_private_key)
            .map_err(|_| Error::SigningKeyInvalid)
    }

    /// Build from a hex key, with or without `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningKeyInvalid`] for malformed hex or an invalid
    /// scalar.
    pub fn from_hex(s: &str) -> Result<Self> {
        PrivateKey::from_hex(s)
            .map(Self::from_private_key)
            .map_err(|_| Error::SigningKeyInvalid)
    }

    /// Address that signatures from this signer recover to.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Sign a validated transaction.
    ///
    /// # Errors
    ///
    /// As [`sign_transaction`].
    pub fn sign_transaction(&self, tx: &TypedTransaction) -> Result<SignedTransaction> {
        sign_transaction(tx, &self.key)
    }

    /// Validate a loose request, then sign it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTransactionType`] or
    /// [`Error::MalformedTransaction`] if the request does not validate.
    pub fn sign_request(&self, request: TransactionRequest) -> Result<SignedTransaction> {
        let tx = TypedTransaction::try_from(request)?;
        self.sign_transaction(&tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::recover_signer_address;
    use crate::transaction::{FeeMarketTransaction, LegacyTransaction};

    const KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";

    fn signer() -> Signer {
        Signer::from_hex(KEY).unwrap()
    }

    #[test]
    fn test_signer_address() {
        assert_eq!(
            crate::address::to_lowercase_hex(&signer().address()),
            "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
        );
    }

    #[test]
    fn test_invalid_key_bytes() {
        assert!(matches!(Signer::from_bytes(&[0u8; 32]), Err(Error::SigningKeyInvalid)));
        assert!(matches!(Signer::from_bytes(&[1u8; 20]), Err(Error::SigningKeyInvalid)));
        assert!(matches!(Signer::from_hex("0xnope"), Err(Error::SigningKeyInvalid)));
    }

    #[test]
    fn test_legacy_v_and_recovery() {
        let tx: TypedTransaction =
            LegacyTransaction::transfer(1, 9, Address::repeat_byte(0x35), 1, 20_000_000_000).into();
        let signed = signer().sign_transaction(&tx).unwrap();
        assert!(matches!(signed.signature().v, 37 | 38));
        assert_eq!(recover_signer_address(&signed).unwrap(), signer().address());
    }

    #[test]
    fn test_fee_market_v_and_recovery() {
        let tx: TypedTransaction =
            FeeMarketTransaction::transfer(10, 0, Address::repeat_byte(0x35), 1, 1, 2).into();
        let signed = signer().sign_transaction(&tx).unwrap();
        assert!(signed.signature().v <= 1);
        assert_eq!(recover_signer_address(&signed).unwrap(), signer().address());
    }

    #[test]
    fn test_signing_is_deterministic() {
        let tx: TypedTransaction =
            FeeMarketTransaction::transfer(1, 0, Address::ZERO, 0, 1, 2).into();
        let a = signer().sign_transaction(&tx).unwrap();
        let b = signer().sign_transaction(&tx).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn test_sign_request_validates_first() {
        let err = signer().sign_request(TransactionRequest::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTransactionType(_)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let debug = format!("{:?}", signer());
        assert!(!debug.contains("4646"));
        assert!(debug.contains("REDACTED"));
    }
}

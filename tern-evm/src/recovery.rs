//! Signer recovery from signed transactions.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use tracing::debug;

use crate::public_key::PublicKey;
use crate::signed::{SignedTransaction, TxSignature};
use crate::transaction::SigningPayload;
use crate::{Error, Result};

/// Recover the public key that produced `signed`'s signature.
///
/// # Errors
///
/// Returns [`Error::InvalidSignature`] if `v` does not fit the transaction
/// shape and chain id, if `r` or `s` is zero or not below the curve order,
/// if `s` is in the upper half of the order, or if no point recovers.
pub fn recover_public_key(signed: &SignedTransaction) -> Result<PublicKey> {
    let tx = signed.tx();
    let y_odd = tx.recovery_bit(signed.signature().v)?;
    recover_from_prehash(&tx.signing_hash(), signed.signature(), y_odd)
}

/// Recover the address that signed `signed`.
///
/// # Errors
///
/// As [`recover_public_key`].
pub fn recover_signer_address(signed: &SignedTransaction) -> Result<Address> {
    let address = recover_public_key(signed)?.address();
    debug!(kind = signed.tx().kind(), %address, "recovered signer");
    Ok(address)
}

fn recover_from_prehash(hash: &B256, signature: &TxSignature, y_odd: bool) -> Result<PublicKey> {
    let signature =
        Signature::from_slice(&signature.to_rs_bytes()).map_err(|_| Error::InvalidSignature)?;
    // EIP-2: s must be in the lower half of the order
    if signature.normalize_s().is_some() {
        return Err(Error::InvalidSignature);
    }
    let recovery_id = RecoveryId::new(y_odd, false);
    VerifyingKey::recover_from_prehash(hash.as_slice(), &signature, recovery_id)
        .map(PublicKey::from)
        .map_err(|_| Error::InvalidSignature)
}

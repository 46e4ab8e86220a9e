//! Ethereum address derivation and formatting.

use alloy_primitives::Address;

use crate::hash::keccak256;
use crate::public_key::PublicKey;
use crate::{Error, Result};

/// Derive the address for a public key: the last 20 bytes of
/// `keccak256(x || y)` over the 64-byte uncompressed key body.
#[must_use]
pub fn derive_address(public_key: &PublicKey) -> Address {
    let hash = keccak256(public_key.to_raw_bytes());
    Address::from_slice(&hash[12..])
}

/// Lowercase `0x`-prefixed hex, the default textual form.
#[must_use]
pub fn to_lowercase_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Mixed-case EIP-55 checksum form.
#[must_use]
pub fn to_checksum_address(address: &Address) -> String {
    let addr_hex = hex::encode(address.as_slice());
    let hash = keccak256(addr_hex.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, c) in addr_hex.chars().enumerate() {
        let nibble = (hash[i / 2] >> (4 * (1 - i % 2))) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Parse a `0x`-prefixed or bare 40-digit hex address.
///
/// Mixed-case input is accepted without checksum validation.
///
/// # Errors
///
/// Returns [`Error::InvalidHex`] for malformed input.
pub fn parse_address(s: &str) -> Result<Address> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() != 40 {
        return Err(Error::InvalidHex);
    }
    let bytes = hex::decode(s).map_err(|_| Error::InvalidHex)?;
    Ok(Address::from_slice(&bytes))
}

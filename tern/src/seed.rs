//! BIP-39 seed derivation.

use core::fmt;

use bip39::Mnemonic;
use zeroize::Zeroizing;

/// Length of a BIP-39 seed in bytes.
pub const SEED_LEN: usize = 64;

/// A 64-byte BIP-39 seed, zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    /// Wrap raw seed bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Get the seed bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

/// Stretch a mnemonic and passphrase into a seed.
///
/// PBKDF2-HMAC-SHA512 with 2048 iterations over the phrase, salted with
/// `"mnemonic" || passphrase`. Both are NFKD-normalized first. An empty
/// passphrase is the BIP-39 default.
#[must_use]
pub fn mnemonic_to_seed(mnemonic: &Mnemonic, passphrase: &str) -> Seed {
    Seed(Zeroizing::new(mnemonic.to_seed(passphrase)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::parse_mnemonic;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn bip39_trezor_vector() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        let seed = mnemonic_to_seed(&mnemonic, "TREZOR");
        let expected = hex_literal::hex!(
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
        assert_eq!(seed.as_bytes(), &expected);
    }

    #[test]
    fn seed_is_deterministic() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        assert_eq!(
            mnemonic_to_seed(&mnemonic, "pass"),
            mnemonic_to_seed(&mnemonic, "pass")
        );
    }

    #[test]
    fn passphrase_changes_seed() {
        let mnemonic = parse_mnemonic(ABANDON).unwrap();
        assert_ne!(
            mnemonic_to_seed(&mnemonic, ""),
            mnemonic_to_seed(&mnemonic, "pass")
        );
    }

    #[test]
    fn debug_is_redacted() {
        let seed = Seed::from_bytes([7u8; SEED_LEN]);
        assert_eq!(format!("{seed:?}"), "Seed([REDACTED])");
        assert_eq!(seed.as_ref().len(), SEED_LEN);
    }
}

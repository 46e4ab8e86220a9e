//! BIP-32 hierarchical deterministic private key derivation.

use core::fmt;

use hmac::{Hmac, Mac};
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar};
use sha2::Sha512;
use tern::Seed;
use tracing::debug;
use zeroize::Zeroizing;

use crate::hash::hash160;
use crate::path::{ChildIndex, DerivationPath};
use crate::private_key::PrivateKey;
use crate::public_key::PublicKey;
use crate::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for master key generation.
const MASTER_KEY_SALT: &[u8] = b"Bitcoin seed";

/// Deepest level a BIP-32 key can sit at (depth is serialized as one byte).
const MAX_DEPTH: u8 = u8::MAX;

/// A BIP-32 extended private key: a private key plus the chain code that
/// seeds its children.
///
/// Chain code and key are zeroized on drop; `Debug` is redacted.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    private_key: PrivateKey,
    chain_code: Zeroizing<[u8; 32]>,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: u32,
}

impl ExtendedPrivateKey {
    /// Master key from a seed: `HMAC-SHA512("Bitcoin seed", seed)`, left half
    /// the key, right half the chain code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if the seed is not 16 to 64
    /// bytes, or if the left half is not a valid private key.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Error::InvalidDerivationPath(format!(
                "seed must be 16 to 64 bytes, got {}",
                seed.len()
            )));
        }

        let digest = hmac_sha512(MASTER_KEY_SALT, &[seed])?;
        let private_key = PrivateKey::from_bytes(&digest[..32]).map_err(|_| {
            Error::InvalidDerivationPath("master key is not a valid scalar".into())
        })?;

        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&digest[32..]);

        Ok(Self {
            private_key,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: 0,
        })
    }

    /// Derive one child.
    ///
    /// Hardened children hash `0x00 || ser256(k)`, normal children hash the
    /// compressed parent public key; both append `ser32(i)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if the tree is already at
    /// maximum depth, if `IL >= n`, or if the child key would be zero.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        if self.depth == MAX_DEPTH {
            return Err(Error::InvalidDerivationPath(
                "maximum derivation depth exceeded".into(),
            ));
        }

        let parent_bytes = self.private_key.to_bytes();
        let parent_public = self.private_key.public_key().to_compressed_bytes();
        let ser_index = index.to_u32().to_be_bytes();

        let digest = if index.is_hardened() {
            hmac_sha512(
                self.chain_code.as_slice(),
                &[&[0u8][..], parent_bytes.as_slice(), &ser_index[..]],
            )?
        } else {
            hmac_sha512(self.chain_code.as_slice(), &[&parent_public[..], &ser_index[..]])?
        };

        let tweak = scalar_from_bytes(&digest[..32]).ok_or_else(|| {
            Error::InvalidDerivationPath(format!("derived tweak out of range at {index}"))
        })?;
        let parent = scalar_from_bytes(parent_bytes.as_slice())
            .ok_or(Error::InvalidPrivateKey)?;

        let child = tweak + parent;
        let child_bytes = Zeroizing::new(<[u8; 32]>::from(child.to_bytes()));
        let private_key = PrivateKey::from_bytes(child_bytes.as_slice()).map_err(|_| {
            Error::InvalidDerivationPath(format!("derived key is zero at {index}"))
        })?;

        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&digest[32..]);

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&hash160(&parent_public)[..4]);

        Ok(Self {
            private_key,
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint,
            child_index: index.to_u32(),
        })
    }

    /// Walk every segment of `path` from this key.
    ///
    /// # Errors
    ///
    /// Propagates the first failing [`derive_child`](Self::derive_child).
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.into_iter()
            .try_fold(self.clone(), |key, &index| key.derive_child(index))
    }

    /// The private key at this node.
    #[inline]
    #[must_use]
    pub const fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The public key at this node.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    /// The chain code at this node.
    #[inline]
    #[must_use]
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth in the tree; the master key is 0.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// First four bytes of hash160 of the parent's compressed public key.
    #[inline]
    #[must_use]
    pub const fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Raw `ser32` index that produced this key (hardened offset included).
    #[inline]
    #[must_use]
    pub const fn child_number(&self) -> u32 {
        self.child_index
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("private_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Derive the private key at `path` below the master key of `seed`.
///
/// # Errors
///
/// Returns [`Error::InvalidDerivationPath`] if any step lands outside the
/// valid key range or the path is deeper than 255 levels.
pub fn derive_private_key(seed: &Seed, path: &DerivationPath) -> Result<PrivateKey> {
    let node = ExtendedPrivateKey::from_seed(seed.as_bytes())?.derive_path(path)?;
    debug!(%path, depth = node.depth(), "derived private key");
    Ok(node.private_key().clone())
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|_| Error::InvalidDerivationPath("hmac key rejected".into()))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Parse a big-endian scalar, rejecting values `>= n`.
fn scalar_from_bytes(bytes: &[u8]) -> Option<Scalar> {
    let array = <[u8; 32]>::try_from(bytes).ok()?;
    Option::from(Scalar::from_repr(FieldBytes::from(array)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // BIP-32 test vector 1
    const SEED_1: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

    fn master() -> ExtendedPrivateKey {
        ExtendedPrivateKey::from_seed(&SEED_1).unwrap()
    }

    #[test]
    fn test_master_key_vector_1() {
        let key = master();
        assert_eq!(key.depth(), 0);
        assert_eq!(
            *key.private_key().to_bytes(),
            hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")
        );
        assert_eq!(
            *key.chain_code(),
            hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
        );
        assert_eq!(key.parent_fingerprint(), [0u8; 4]);
    }

    #[test]
    fn test_hardened_child_vector_1() {
        let child = master().derive_child(ChildIndex::Hardened(0)).unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.child_number(), 0x8000_0000);
        assert_eq!(child.parent_fingerprint(), hex!("3442193e"));
        assert_eq!(
            *child.private_key().to_bytes(),
            hex!("edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea")
        );
        assert_eq!(
            *child.chain_code(),
            hex!("47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141")
        );
    }

    #[test]
    fn test_normal_child_vector_1() {
        let path: DerivationPath = "m/0'/1".parse().unwrap();
        let key = master().derive_path(&path).unwrap();
        assert_eq!(key.depth(), 2);
        assert_eq!(key.child_number(), 1);
        assert_eq!(
            *key.private_key().to_bytes(),
            hex!("3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368")
        );
        assert_eq!(
            *key.chain_code(),
            hex!("2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19")
        );
    }

    #[test]
    fn test_empty_path_is_identity() {
        let key = master().derive_path(&DerivationPath::master()).unwrap();
        assert_eq!(key.private_key(), master().private_key());
    }

    #[test]
    fn test_seed_length_bounds() {
        assert!(ExtendedPrivateKey::from_seed(&[0u8; 15]).is_err());
        assert!(ExtendedPrivateKey::from_seed(&[0u8; 65]).is_err());
        assert!(ExtendedPrivateKey::from_seed(&[7u8; 64]).is_ok());
    }

    #[test]
    fn test_max_depth() {
        let mut key = master();
        key.depth = MAX_DEPTH;
        assert!(matches!(
            key.derive_child(ChildIndex::Normal(0)),
            Err(Error::InvalidDerivationPath(_))
        ));
    }

    #[test]
    fn test_scalar_range_check() {
        let order = hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
        assert!(scalar_from_bytes(&order).is_none());
        assert!(scalar_from_bytes(&[0xff; 32]).is_none());
        assert!(scalar_from_bytes(&[0u8; 32]).is_some());
        assert!(scalar_from_bytes(&[1u8; 31]).is_none());
    }

    #[test]
    fn test_derive_private_key_hardhat_accounts() {
        let wallet = tern::Wallet::from_mnemonic(
            "test test test test test test test test test test test junk",
            None,
        )
        .unwrap();
        let first = derive_private_key(wallet.seed(), &DerivationPath::default()).unwrap();
        assert_eq!(
            *first.to_bytes(),
            hex!("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
        );
        let second =
            derive_private_key(wallet.seed(), &DerivationPath::ethereum(0, 0, 1).unwrap()).unwrap();
        assert_eq!(
            *second.to_bytes(),
            hex!("59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d")
        );
    }

    #[test]
    fn test_hardened_and_normal_zero_differ() {
        let hardened = master().derive_child(ChildIndex::Hardened(0)).unwrap();
        let normal = master().derive_child(ChildIndex::Normal(0)).unwrap();
        assert_ne!(hardened.private_key(), normal.private_key());
    }

    #[test]
    fn test_debug_is_redacted() {
        let debug = format!("{:?}", master());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("e8f32e"));
    }
}

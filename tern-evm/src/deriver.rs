//! Multi-account derivation from a [`tern::Wallet`].

use tern::Wallet;
use zeroize::Zeroizing;

use crate::Result;
use crate::address::to_lowercase_hex;
use crate::derivation_style::DerivationStyle;
use crate::extended_key::ExtendedPrivateKey;
use crate::path::DerivationPath;

/// Derives Ethereum accounts from a wallet seed.
///
/// The master key is computed once per call and every account is derived
/// from it with BIP-32.
///
/// # Example
///
/// ```
/// use tern::Wallet;
/// use tern_evm::Deriver;
///
/// let wallet = Wallet::from_mnemonic(
///     "test test test test test test test test test test test junk",
///     None,
/// )?;
/// let account = Deriver::new(&wallet).derive(0, false, 0)?;
/// assert_eq!(account.address, "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Deriver<'a> {
    wallet: &'a Wallet,
}

/// One derived account.
#[derive(Clone)]
pub struct DerivedAccount {
    /// Derivation path, e.g. `m/44'/60'/0'/0/0`.
    pub path: DerivationPath,
    /// Private key hex without `0x` (zeroized on drop).
    pub private_key_hex: Zeroizing<String>,
    /// Uncompressed public key hex (65 bytes, `04` prefix).
    pub public_key_hex: String,
    /// Lowercase `0x` address.
    pub address: String,
}

impl core::fmt::Debug for DerivedAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DerivedAccount")
            .field("path", &self.path.to_string())
            .field("private_key_hex", &"[REDACTED]")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl<'a> Deriver<'a> {
    /// Create a deriver over `wallet`.
    #[must_use]
    pub const fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Derive `m/44'/60'/account'/change/address_index`.
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of range or derivation fails.
    #[inline]
    pub fn derive(&self, account: u32, change: bool, address_index: u32) -> Result<DerivedAccount> {
        let path = DerivationPath::ethereum(account, u32::from(change), address_index)?;
        self.derive_at_path(&path)
    }

    /// Derive the account at an arbitrary path.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation fails.
    pub fn derive_at_path(&self, path: &DerivationPath) -> Result<DerivedAccount> {
        let master = self.master()?;
        Self::account_at(&master, path)
    }

    /// Derive `count` consecutive addresses starting at `start_index`.
    ///
    /// # Errors
    ///
    /// Returns an error if any derivation fails.
    pub fn derive_many(
        &self,
        account: u32,
        change: bool,
        start_index: u32,
        count: u32,
    ) -> Result<Vec<DerivedAccount>> {
        let master = self.master()?;
        index_range(start_index, count)
            .map(|index| {
                let path = DerivationPath::ethereum(account, u32::from(change), index)?;
                Self::account_at(&master, &path)
            })
            .collect()
    }

    /// Derive index `index` in a wallet-specific path layout.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation fails.
    #[inline]
    pub fn derive_with_style(&self, style: DerivationStyle, index: u32) -> Result<DerivedAccount> {
        self.derive_at_path(&style.path(index)?)
    }

    /// Derive `count` consecutive indices in a wallet-specific layout.
    ///
    /// # Errors
    ///
    /// Returns an error if any derivation fails.
    pub fn derive_many_with_style(
        &self,
        style: DerivationStyle,
        start_index: u32,
        count: u32,
    ) -> Result<Vec<DerivedAccount>> {
        let master = self.master()?;
        index_range(start_index, count)
            .map(|index| Self::account_at(&master, &style.path(index)?))
            .collect()
    }

    fn master(&self) -> Result<ExtendedPrivateKey> {
        ExtendedPrivateKey::from_seed(self.wallet.seed().as_bytes())
    }

    fn account_at(master: &ExtendedPrivateKey, path: &DerivationPath) -> Result<DerivedAccount> {
        let node = master.derive_path(path)?;
        let public_key = node.public_key();
        tracing::debug!(%path, "derived account");

        Ok(DerivedAccount {
            path: path.clone(),
            private_key_hex: node.private_key().to_hex(),
            public_key_hex: hex::encode(public_key.to_uncompressed_bytes()),
            address: to_lowercase_hex(&public_key.address()),
        })
    }
}

/// `start..start + count`, clamped at `u32::MAX` instead of overflowing.
fn index_range(start: u32, count: u32) -> core::ops::Range<u32> {
    start..start.saturating_add(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const HARDHAT_MNEMONIC: &str = "test test test test test test test test test test test junk";

    fn test_wallet() -> Wallet {
        Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap()
    }

    #[test]
    fn test_derive_known_accounts() {
        let wallet = Wallet::from_mnemonic(HARDHAT_MNEMONIC, None).unwrap();
        let accounts = Deriver::new(&wallet).derive_many(0, false, 0, 2).unwrap();

        assert_eq!(accounts[0].path.to_string(), "m/44'/60'/0'/0/0");
        assert_eq!(
            accounts[0].private_key_hex.as_str(),
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
        );
        assert_eq!(accounts[0].address, "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
        assert_eq!(accounts[1].address, "0x70997970c51812dc3a010c7d01b50e0d17dc79c8");
        assert!(accounts[0].public_key_hex.starts_with("04"));
        assert_eq!(accounts[0].public_key_hex.len(), 130);
    }

    #[test]
    fn test_derive_multiple_unique() {
        let wallet = test_wallet();
        let accounts = Deriver::new(&wallet).derive_many(0, false, 0, 5).unwrap();

        assert_eq!(accounts.len(), 5);
        let mut addresses: Vec<_> = accounts.iter().map(|a| a.address.clone()).collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 5);
    }

    #[test]
    fn test_derive_many_matches_single() {
        let wallet = test_wallet();
        let deriver = Deriver::new(&wallet);
        let many = deriver.derive_many(0, false, 3, 2).unwrap();
        assert_eq!(many[1].address, deriver.derive(0, false, 4).unwrap().address);
    }

    #[test]
    fn test_passphrase_changes_addresses() {
        let wallet1 = Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap();
        let wallet2 = Wallet::from_mnemonic(TEST_MNEMONIC, Some("password")).unwrap();

        let addr1 = Deriver::new(&wallet1).derive(0, false, 0).unwrap();
        let addr2 = Deriver::new(&wallet2).derive(0, false, 0).unwrap();
        assert_ne!(addr1.address, addr2.address);
    }

    #[test]
    fn test_change_branch() {
        let wallet = test_wallet();
        let account = Deriver::new(&wallet).derive(0, true, 0).unwrap();
        assert_eq!(account.path.to_string(), "m/44'/60'/0'/1/0");
    }

    #[test]
    fn test_derive_with_styles() {
        let wallet = test_wallet();
        let deriver = Deriver::new(&wallet);

        let live = deriver
            .derive_many_with_style(DerivationStyle::LedgerLive, 0, 2)
            .unwrap();
        assert_eq!(live[1].path.to_string(), "m/44'/60'/1'/0/0");

        let legacy = deriver
            .derive_with_style(DerivationStyle::LedgerLegacy, 0)
            .unwrap();
        assert_eq!(legacy.path.to_string(), "m/44'/60'/0'/0");

        // index 0 coincides for standard and live
        let standard = deriver.derive_with_style(DerivationStyle::Standard, 0).unwrap();
        assert_eq!(standard.address, live[0].address);
    }

    #[test]
    fn test_out_of_range_index() {
        let wallet = test_wallet();
        assert!(Deriver::new(&wallet).derive(0x8000_0000, false, 0).is_err());
    }

    #[test]
    fn test_account_debug_hides_key() {
        let wallet = Wallet::from_mnemonic(HARDHAT_MNEMONIC, None).unwrap();
        let account = Deriver::new(&wallet).derive(0, false, 0).unwrap();
        let debug = format!("{account:?}");
        assert!(!debug.contains("ac0974be"));
        assert!(debug.contains("0xf39fd6e5"));
    }

    #[test]
    fn test_index_range_saturates() {
        assert_eq!(index_range(u32::MAX - 1, 5).len(), 1);
    }
}

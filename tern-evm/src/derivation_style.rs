//! Path layouts used by common Ethereum wallets.
//!
//! All three stay under `m/44'/60'` but place the varying index at a
//! different level, so the same mnemonic shows different accounts in each.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::path::{ChildIndex, DerivationPath};
use crate::Result;

/// Which level of the BIP-44 tree an account index selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum DerivationStyle {
    /// `m/44'/60'/0'/0/{index}`: MetaMask, Trezor and most software wallets.
    #[default]
    Standard,
    /// `m/44'/60'/{index}'/0/0`: each index is a separate hardened account.
    LedgerLive,
    /// `m/44'/60'/0'/{index}`: four levels deep, as in MEW and MyCrypto.
    LedgerLegacy,
}

impl DerivationStyle {
    /// Build the derivation path for `index` in this layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`](crate::Error::InvalidDerivationPath)
    /// if `index >= 2^31`.
    pub fn path(self, index: u32) -> Result<DerivationPath> {
        match self {
            Self::Standard => DerivationPath::ethereum(0, 0, index),
            Self::LedgerLive => DerivationPath::ethereum(index, 0, 0),
            Self::LedgerLegacy => Ok(DerivationPath::new(vec![
                ChildIndex::Hardened(44),
                ChildIndex::Hardened(60),
                ChildIndex::Hardened(0),
                ChildIndex::normal(index)?,
            ])),
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard (MetaMask/Trezor)",
            Self::LedgerLive => "Ledger Live",
            Self::LedgerLegacy => "Ledger Legacy (MEW/MyCrypto)",
        }
    }

    /// Short identifier accepted on the command line.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::LedgerLive => "ledger-live",
            Self::LedgerLegacy => "ledger-legacy",
        }
    }

    /// Every supported style.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Standard, Self::LedgerLive, Self::LedgerLegacy]
    }
}

impl fmt::Display for DerivationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DerivationStyle {
    type Err = ParseDerivationStyleError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "metamask" | "trezor" | "bip44" => Ok(Self::Standard),
            "ledger-live" | "ledgerlive" | "live" => Ok(Self::LedgerLive),
            "ledger-legacy" | "ledgerlegacy" | "legacy" | "mew" | "mycrypto" => {
                Ok(Self::LedgerLegacy)
            }
            _ => Err(ParseDerivationStyleError(s.into())),
        }
    }
}

/// Unrecognized derivation style name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid derivation style '{0}', expected one of: standard, ledger-live, ledger-legacy")]
pub struct ParseDerivationStyleError(String);

//! Mnemonic-backed wallet holding the derived seed.

use core::fmt;

use bip39::Mnemonic;
use zeroize::Zeroizing;

use crate::mnemonic::{self, WordCount};
use crate::seed::{self, Seed};
use crate::Result;

/// An HD wallet root: a BIP-39 mnemonic and the seed derived from it.
///
/// The same mnemonic with different passphrases (the "25th word") yields
/// entirely different seeds and therefore different accounts.
///
/// The wallet owns no global state; dropping it zeroizes the phrase and seed.
/// The phrase lives as long as the wallet, so callers that only derive keys
/// should clone the [`Seed`] and drop the `Wallet`.
pub struct Wallet {
    /// BIP-39 mnemonic phrase.
    mnemonic: Zeroizing<String>,
    /// Seed derived from mnemonic + passphrase.
    seed: Seed,
    /// Whether a non-empty passphrase was used.
    has_passphrase: bool,
}

impl Wallet {
    /// Generate a new wallet with a random mnemonic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`](crate::Error::EntropyUnavailable)
    /// if the OS random source fails.
    pub fn generate(word_count: WordCount, passphrase: Option<&str>) -> Result<Self> {
        let mnemonic = mnemonic::generate_mnemonic(word_count)?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    /// Create a wallet from raw entropy bytes (16, 20, 24, 28 or 32 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntropyLength`](crate::Error::InvalidEntropyLength)
    /// if the entropy length is invalid.
    pub fn from_entropy(entropy: &[u8], passphrase: Option<&str>) -> Result<Self> {
        WordCount::from_entropy_bits(entropy.len() * 8)?;
        let mnemonic = Mnemonic::from_entropy(entropy)?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    /// Create a wallet from an existing mnemonic phrase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mnemonic`](crate::Error::Mnemonic) if the phrase fails
    /// validation.
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let mnemonic = mnemonic::parse_mnemonic(phrase)?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    fn from_parsed(mnemonic: &Mnemonic, passphrase: Option<&str>) -> Self {
        let passphrase = passphrase.unwrap_or("");
        Self {
            mnemonic: Zeroizing::new(mnemonic.to_string()),
            seed: seed::mnemonic_to_seed(mnemonic, passphrase),
            has_passphrase: !passphrase.is_empty(),
        }
    }

    /// Get the mnemonic phrase.
    ///
    /// **Security Warning**: Handle this value carefully as it can
    /// reconstruct all derived keys.
    #[inline]
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Get the seed for key derivation.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Check if a passphrase was used to derive the seed.
    #[must_use]
    pub const fn has_passphrase(&self) -> bool {
        self.has_passphrase
    }

    /// Get the word count of the mnemonic.
    #[inline]
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.mnemonic.split_whitespace().count()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("words", &self.word_count())
            .field("has_passphrase", &self.has_passphrase)
            .finish_non_exhaustive()
    }
}

impl From<&Wallet> for Seed {
    fn from(wallet: &Wallet) -> Self {
        wallet.seed.clone()
    }
}

//! BIP-39 mnemonic generation, validation and prefix expansion.
//!
//! Mnemonics are always produced from the English wordlist. Generation pulls
//! entropy from a caller-supplied cryptographically secure source (the OS
//! generator by default) and fails with [`Error::EntropyUnavailable`] when
//! that source cannot deliver.
//!
//! # Prefix Expansion
//!
//! The BIP-39 English wordlist is designed so that every word is uniquely
//! identifiable by its first 4 characters. [`expand`] leverages that property
//! to let users type abbreviated words.
//!
//! # Example
//!
//! ```
//! use tern::mnemonic::{self, WordCount};
//!
//! let phrase = mnemonic::generate_mnemonic(WordCount::Words12)?.to_string();
//! assert!(mnemonic::validate_mnemonic(&phrase));
//!
//! let expanded = mnemonic::expand("aban aban aban aban aban aban aban aban aban aban aban abou")?;
//! assert!(mnemonic::validate_mnemonic(&expanded));
//! # Ok::<(), tern::Error>(())
//! ```

use core::fmt;
use core::str::FromStr;

use bip39::{Language, Mnemonic};
use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroizing;

use crate::{Error, Result};

/// Minimum prefix length required for unambiguous word expansion.
///
/// BIP-39 English wordlist guarantees uniqueness at 4 characters.
const MIN_PREFIX_LEN: usize = 4;

/// Supported mnemonic lengths and the entropy strength behind each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WordCount {
    /// 12 words, 128 bits of entropy.
    #[default]
    Words12,
    /// 15 words, 160 bits of entropy.
    Words15,
    /// 18 words, 192 bits of entropy.
    Words18,
    /// 21 words, 224 bits of entropy.
    Words21,
    /// 24 words, 256 bits of entropy.
    Words24,
}

impl WordCount {
    /// Map a word count to its variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWordCount`] for anything but 12, 15, 18, 21 or 24.
    pub const fn from_words(words: usize) -> Result<Self> {
        match words {
            12 => Ok(Self::Words12),
            15 => Ok(Self::Words15),
            18 => Ok(Self::Words18),
            21 => Ok(Self::Words21),
            24 => Ok(Self::Words24),
            n => Err(Error::InvalidWordCount(n)),
        }
    }

    /// Map an entropy strength in bits to its variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntropyLength`] unless `bits` is 128, 160, 192, 224 or 256.
    pub const fn from_entropy_bits(bits: usize) -> Result<Self> {
        match bits {
            128 => Ok(Self::Words12),
            160 => Ok(Self::Words15),
            192 => Ok(Self::Words18),
            224 => Ok(Self::Words21),
            256 => Ok(Self::Words24),
            n => Err(Error::InvalidEntropyLength(n / 8)),
        }
    }

    /// Number of words in the phrase.
    #[must_use]
    pub const fn words(self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words15 => 15,
            Self::Words18 => 18,
            Self::Words21 => 21,
            Self::Words24 => 24,
        }
    }

    /// Entropy strength in bits.
    #[must_use]
    pub const fn entropy_bits(self) -> usize {
        self.words() / 3 * 32
    }

    /// Entropy strength in bytes.
    #[must_use]
    pub const fn entropy_bytes(self) -> usize {
        self.entropy_bits() / 8
    }

    /// All supported word counts, shortest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Words12,
            Self::Words15,
            Self::Words18,
            Self::Words21,
            Self::Words24,
        ]
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} words", self.words())
    }
}

impl FromStr for WordCount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let words = s.trim().parse().map_err(|_| Error::InvalidWordCount(0))?;
        Self::from_words(words)
    }
}

/// Generate a random English mnemonic using the operating system's CSPRNG.
///
/// # Errors
///
/// Returns [`Error::EntropyUnavailable`] if the OS cannot supply randomness.
pub fn generate_mnemonic(word_count: WordCount) -> Result<Mnemonic> {
    generate_mnemonic_with(&mut OsRng, word_count)
}

/// Generate a random English mnemonic from the given entropy source.
///
/// # Errors
///
/// Returns [`Error::EntropyUnavailable`] if `rng` fails to fill the entropy buffer.
pub fn generate_mnemonic_with<R>(rng: &mut R, word_count: WordCount) -> Result<Mnemonic>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut entropy = Zeroizing::new([0u8; 32]);
    let entropy = &mut entropy[..word_count.entropy_bytes()];
    rng.try_fill_bytes(entropy)
        .map_err(|e| Error::EntropyUnavailable(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)?;
    tracing::debug!(words = word_count.words(), "generated mnemonic");
    Ok(mnemonic)
}

/// Parse and checksum-verify an English mnemonic phrase.
///
/// # Errors
///
/// Returns [`Error::Mnemonic`] describing the first problem found.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Ok(Mnemonic::parse_in_normalized(Language::English, phrase)?)
}

/// Check whether `candidate` is a well-formed English mnemonic.
///
/// Unknown words, unsupported lengths and checksum mismatches all yield
/// `false`; this function never fails.
#[must_use]
pub fn validate_mnemonic(candidate: &str) -> bool {
    parse_mnemonic(candidate).is_ok()
}

/// Expand abbreviated words in a mnemonic phrase to their full BIP-39 form.
///
/// Each whitespace-separated token is matched against the BIP-39 wordlist:
/// - If the token is an exact match, it is kept as-is.
/// - If the token is a prefix (>= 4 characters) that uniquely identifies
///   a single word, it is expanded to that word.
/// - Otherwise, an error is returned.
///
/// # Errors
///
/// Returns [`Error::UnknownPrefix`] if a token does not match any word.
/// Returns [`Error::AmbiguousPrefix`] if a token matches multiple words.
/// Returns [`Error::PrefixTooShort`] if a non-exact token has fewer than 4 characters.
pub fn expand(phrase: &str) -> Result<String> {
    expand_in(Language::English, phrase)
}

/// Expand abbreviated words using the specified language wordlist.
///
/// See [`expand`] for details.
///
/// # Errors
///
/// Same as [`expand`].
pub fn expand_in(language: Language, phrase: &str) -> Result<String> {
    let word_list = language.word_list();
    let words = phrase
        .split_whitespace()
        .map(|token| resolve_token(word_list, token))
        .collect::<Result<Vec<_>>>()?;
    Ok(words.join(" "))
}

/// Resolve a single token to the full word it names.
fn resolve_token(word_list: &'static [&'static str; 2048], token: &str) -> Result<&'static str> {
    // The wordlist is sorted, so exact matches are a binary search away.
    if let Ok(i) = word_list.binary_search(&token) {
        return Ok(word_list[i]);
    }

    if token.chars().count() < MIN_PREFIX_LEN {
        return Err(Error::PrefixTooShort {
            prefix: token.to_owned(),
            min_len: MIN_PREFIX_LEN,
        });
    }

    let matches: Vec<&'static str> = word_list
        .iter()
        .copied()
        .filter(|word| word.starts_with(token))
        .collect();

    match matches.as_slice() {
        [] => Err(Error::UnknownPrefix(token.to_owned())),
        [word] => Ok(*word),
        _ => Err(Error::AmbiguousPrefix {
            prefix: token.to_owned(),
            candidates: matches.iter().map(|w| (*w).to_owned()).collect(),
        }),
    }
}

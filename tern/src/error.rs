//! Error types for mnemonic and seed operations.

use thiserror::Error;

/// Errors that can occur while producing or parsing mnemonics.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The secure random source could not supply entropy.
    ///
    /// This is the only retryable error: the caller may try again after a backoff.
    #[error("secure entropy source unavailable: {0}")]
    EntropyUnavailable(String),
    /// Invalid mnemonic phrase.
    #[error("mnemonic error: {0}")]
    Mnemonic(#[from] bip39::Error),
    /// Invalid word count for mnemonic.
    #[error("invalid word count {0}, must be 12, 15, 18, 21, or 24")]
    InvalidWordCount(usize),
    /// Entropy length is not one of 16, 20, 24, 28 or 32 bytes.
    #[error("invalid entropy length {0} bytes, must be 16, 20, 24, 28, or 32")]
    InvalidEntropyLength(usize),
    /// Mnemonic prefix is too short for unambiguous expansion.
    #[error("prefix \"{prefix}\" is too short (minimum {min_len} characters)")]
    PrefixTooShort {
        /// The prefix that was too short.
        prefix: String,
        /// Minimum required prefix length.
        min_len: usize,
    },
    /// Mnemonic prefix does not match any word in the wordlist.
    #[error("prefix \"{0}\" does not match any BIP-39 word")]
    UnknownPrefix(String),
    /// Mnemonic prefix matches multiple words in the wordlist.
    #[error("prefix \"{prefix}\" is ambiguous, matches: {}", .candidates.join(", "))]
    AmbiguousPrefix {
        /// The ambiguous prefix.
        prefix: String,
        /// Words that match the prefix.
        candidates: Vec<String>,
    },
}

impl Error {
    /// Whether retrying the same operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::EntropyUnavailable(_))
    }
}

/// A convenient Result type alias for tern operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_entropy_errors_are_retryable() {
        assert!(Error::EntropyUnavailable("os rng".into()).is_retryable());
        assert!(!Error::InvalidWordCount(13).is_retryable());
        assert!(!Error::UnknownPrefix("zzzz".into()).is_retryable());
    }

    #[test]
    fn ambiguous_prefix_lists_candidates() {
        let err = Error::AmbiguousPrefix {
            prefix: "ab".into(),
            candidates: vec!["abandon".into(), "ability".into()],
        };
        assert_eq!(
            err.to_string(),
            "prefix \"ab\" is ambiguous, matches: abandon, ability"
        );
    }
}

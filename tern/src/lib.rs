//! Mnemonic and seed layer for the tern Ethereum key pipeline.
//!
//! This crate covers the first two stages of the pipeline: producing or
//! validating a BIP-39 mnemonic, and stretching it into a 64-byte seed.
//! Key derivation, addresses and transaction signing live in `tern-evm`.
//!
//! # Example
//!
//! ```
//! use tern::{Wallet, WordCount};
//!
//! // Generate a new wallet
//! let wallet = Wallet::generate(WordCount::Words12, None)?;
//!
//! // Or with a passphrase (BIP39 optional password)
//! let wallet = Wallet::generate(WordCount::Words24, Some("my secret passphrase"))?;
//!
//! // The seed feeds hierarchical key derivation
//! let seed = wallet.seed();
//! assert_eq!(seed.as_bytes().len(), 64);
//! # Ok::<(), tern::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod error;
pub mod mnemonic;
pub mod seed;
mod wallet;

pub use bip39::Mnemonic;
pub use error::{Error, Result};
pub use mnemonic::{WordCount, generate_mnemonic, generate_mnemonic_with, validate_mnemonic};
pub use seed::{Seed, mnemonic_to_seed};
pub use wallet::Wallet;

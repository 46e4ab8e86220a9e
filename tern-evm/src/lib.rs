//! Ethereum keys, addresses and transaction signing for tern.
//!
//! Picks up where [`tern`] leaves off: a 64-byte seed goes through BIP-32 to
//! a private key, the key yields a public key and an address, and the same
//! key signs legacy or EIP-1559 transactions whose signer can be recovered.
//!
//! ```
//! use tern::Wallet;
//! use tern_evm::{
//!     DerivationPath, FeeMarketTransaction, derive_address, derive_private_key,
//!     derive_public_key, recover_signer_address, sign_transaction,
//! };
//!
//! let wallet = Wallet::from_mnemonic(
//!     "test test test test test test test test test test test junk",
//!     None,
//! )?;
//! let key = derive_private_key(wallet.seed(), &DerivationPath::default())?;
//! let address = derive_address(&derive_public_key(&key));
//!
//! let tx = FeeMarketTransaction::transfer(1, 0, address, 1, 1_000_000_000, 30_000_000_000);
//! let signed = sign_transaction(&tx.into(), &key)?;
//! assert_eq!(recover_signer_address(&signed)?, address);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
mod derivation_style;
mod deriver;
mod error;
mod extended_key;
pub mod hash;
mod path;
mod private_key;
mod public_key;
pub mod recovery;
mod request;
pub mod rlp;
mod signed;
mod signer;
mod transaction;

pub use address::{derive_address, parse_address, to_checksum_address, to_lowercase_hex};
pub use alloy_primitives::{Address, B256, Bytes, U256};
pub use derivation_style::{DerivationStyle, ParseDerivationStyleError};
pub use deriver::{DerivedAccount, Deriver};
pub use error::Error;
pub use extended_key::{ExtendedPrivateKey, derive_private_key};
pub use path::{ChildIndex, DerivationPath};
pub use private_key::PrivateKey;
pub use public_key::{PublicKey, derive_public_key, derive_public_key_from_bytes};
pub use recovery::{recover_public_key, recover_signer_address};
pub use request::TransactionRequest;
pub use signed::{SignedTransaction, TxSignature};
pub use signer::{Signer, sign_transaction};
pub use transaction::{
    AccessListItem, FeeMarketTransaction, LegacyTransaction, SigningPayload, TRANSFER_GAS,
    TypedTransaction,
};

/// A convenient Result type alias for tern-evm operations.
pub type Result<T> = core::result::Result<T, Error>;

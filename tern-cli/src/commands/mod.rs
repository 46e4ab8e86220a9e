//! CLI command definitions and handlers.

mod account;
mod mnemonic;
mod transaction;

use clap::{Parser, Subcommand};

pub use account::{ImportCommand, NewCommand};
pub use mnemonic::ValidateCommand;
pub use transaction::{RecoverCommand, SignCommand};

/// tern - Ethereum wallet CLI.
#[derive(Parser)]
#[command(name = "tern")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log pipeline steps to stderr (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new mnemonic and derive accounts from it.
    New(NewCommand),

    /// Derive accounts from an existing mnemonic.
    Import(ImportCommand),

    /// Check a mnemonic's words and checksum.
    Validate(ValidateCommand),

    /// Sign a transaction request read from a JSON file.
    Sign(SignCommand),

    /// Recover the sender of a raw signed transaction.
    Recover(RecoverCommand),
}

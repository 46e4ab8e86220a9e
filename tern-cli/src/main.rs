//! tern - Ethereum wallet CLI.
//!
//! Generate or import mnemonics, derive accounts, sign legacy and EIP-1559
//! transactions, and recover the signer of a raw transaction.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use commands::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::New(cmd) => cmd.execute()?,
        Commands::Import(cmd) => cmd.execute()?,
        Commands::Validate(cmd) => {
            if !cmd.execute() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Sign(cmd) => cmd.execute()?,
        Commands::Recover(cmd) => cmd.execute()?,
    }
    Ok(ExitCode::SUCCESS)
}

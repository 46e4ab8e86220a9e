//! Transaction commands: sign a JSON request, recover a raw transaction's sender.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tern_evm::address::to_checksum_address;
use tern_evm::{SignedTransaction, Signer, TransactionRequest, recover_signer_address};
use zeroize::Zeroizing;

/// Sign a transaction request.
#[derive(Args)]
pub struct SignCommand {
    /// Private key hex, with or without `0x`.
    #[arg(short, long, env = "TERN_PRIVATE_KEY", hide_env_values = true)]
    key: String,

    /// JSON file holding the transaction request.
    #[arg(short, long)]
    tx: PathBuf,
}

/// Recover the sender of a raw signed transaction.
#[derive(Args)]
pub struct RecoverCommand {
    /// Raw transaction hex, with or without `0x`.
    #[arg(short, long)]
    raw: String,
}

impl SignCommand {
    /// Execute the sign command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let key = Zeroizing::new(self.key);
        let signer = Signer::from_hex(&key)?;

        let json = fs::read_to_string(&self.tx)
            .map_err(|e| format!("cannot read {}: {e}", self.tx.display()))?;
        let request: TransactionRequest = serde_json::from_str(&json)?;

        let signed = signer.sign_request(request)?;
        print_signed(&signed, &to_checksum_address(&signer.address()))?;
        Ok(())
    }
}

impl RecoverCommand {
    /// Execute the recover command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let signed = SignedTransaction::decode_hex(&self.raw)?;
        let from = recover_signer_address(&signed)?;
        print_recovered(&signed, &to_checksum_address(&from));
        Ok(())
    }
}

#[rustfmt::skip]
fn print_signed(signed: &SignedTransaction, from: &str) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(signed)?;

    println!();
    println!("{json}");
    println!();
    println!("      {}         {}", "From".cyan().bold(), from.green());
    println!("      {}         {}", "Hash".cyan().bold(), signed.hash());
    println!("      {}          {}", "Raw".cyan().bold(), signed.encode_hex());
    println!();
    Ok(())
}

#[rustfmt::skip]
fn print_recovered(signed: &SignedTransaction, from: &str) {
    let tx = signed.tx();
    let chain = tx.chain_id().map_or_else(|| "none (pre-EIP-155)".to_string(), |id| id.to_string());

    println!();
    println!("      {}         {}", "Type".cyan().bold(), format!("{} ({})", tx.tx_type(), tx.kind()).dimmed());
    println!("      {}        {}", "Chain".cyan().bold(), chain);
    println!("      {}        {}", "Nonce".cyan().bold(), tx.nonce());
    println!("      {}         {}", "Hash".cyan().bold(), signed.hash());
    println!("      {}         {}", "From".cyan().bold(), from.green());
    println!();
}

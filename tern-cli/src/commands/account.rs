//! Account commands: generate or import a mnemonic and derive addresses.

use clap::{Args, ValueEnum};
use colored::Colorize;
use tern::{Wallet, WordCount};
use tern_evm::{DerivationPath, DerivationStyle, DerivedAccount, Deriver};
use zeroize::Zeroizing;

/// Upper bound for `--count`.
const MAX_COUNT: i64 = 1000;

/// CLI-compatible derivation style enum.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum CliDerivationStyle {
    /// Standard BIP-44 path (MetaMask/Trezor): m/44'/60'/0'/0/{index}
    #[default]
    Standard,
    /// Ledger Live path: m/44'/60'/{index}'/0/0
    #[value(name = "ledger-live")]
    LedgerLive,
    /// Ledger Legacy path (MEW/MyCrypto): m/44'/60'/0'/{index}
    #[value(name = "ledger-legacy")]
    LedgerLegacy,
}

impl From<CliDerivationStyle> for DerivationStyle {
    fn from(style: CliDerivationStyle) -> Self {
        match style {
            CliDerivationStyle::Standard => Self::Standard,
            CliDerivationStyle::LedgerLive => Self::LedgerLive,
            CliDerivationStyle::LedgerLegacy => Self::LedgerLegacy,
        }
    }
}

/// Generate a new wallet.
#[derive(Args)]
pub struct NewCommand {
    /// Number of mnemonic words (12, 15, 18, 21, or 24).
    #[arg(short, long, default_value = "12")]
    words: WordCount,

    /// BIP39 passphrase (optional extra security).
    #[arg(short, long, env = "TERN_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Number of addresses to derive (1 to 1000).
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=MAX_COUNT))]
    count: u32,

    /// Derivation path style for hardware wallet compatibility.
    #[arg(short, long, default_value = "standard")]
    style: CliDerivationStyle,
}

/// Import a wallet from a mnemonic phrase.
#[derive(Args)]
pub struct ImportCommand {
    /// BIP39 mnemonic phrase; unique 4-letter prefixes are expanded.
    #[arg(short, long)]
    mnemonic: String,

    /// BIP39 passphrase (if used when creating).
    #[arg(short, long, env = "TERN_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Number of addresses to derive (1 to 1000).
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=MAX_COUNT))]
    count: u32,

    /// Derivation path style for hardware wallet compatibility.
    #[arg(short, long, default_value = "standard", conflicts_with = "path")]
    style: CliDerivationStyle,

    /// Derive a single account at an explicit path instead of a style.
    #[arg(long)]
    path: Option<DerivationPath>,
}

impl NewCommand {
    /// Execute the new-wallet command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let passphrase = self.passphrase.map(Zeroizing::new);
        let wallet = Wallet::generate(self.words, passphrase.as_deref().map(String::as_str))?;
        let style = DerivationStyle::from(self.style);
        let accounts = Deriver::new(&wallet).derive_many_with_style(style, 0, self.count)?;
        print_wallet(&wallet, style.name(), &accounts);
        Ok(())
    }
}

impl ImportCommand {
    /// Execute the import command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let phrase = Zeroizing::new(tern::mnemonic::expand(&self.mnemonic)?);
        let passphrase = self.passphrase.map(Zeroizing::new);
        let wallet = Wallet::from_mnemonic(&phrase, passphrase.as_deref().map(String::as_str))?;
        let deriver = Deriver::new(&wallet);

        match self.path {
            Some(path) => {
                let account = deriver.derive_at_path(&path)?;
                print_wallet(&wallet, "Custom path", &[account]);
            }
            None => {
                let style = DerivationStyle::from(self.style);
                let accounts = deriver.derive_many_with_style(style, 0, self.count)?;
                print_wallet(&wallet, style.name(), &accounts);
            }
        }
        Ok(())
    }
}

#[rustfmt::skip]
fn print_wallet(wallet: &Wallet, style: &str, accounts: &[DerivedAccount]) {
    println!();
    println!("      {}     {}", "Mnemonic".cyan().bold(), wallet.mnemonic());
    if wallet.has_passphrase() {
        println!("      {}   {}", "Passphrase".cyan().bold(), "(set)".dimmed());
    }
    println!("      {}        {}", "Style".cyan().bold(), style.dimmed());
    println!();

    for (i, account) in accounts.iter().enumerate() {
        if accounts.len() > 1 {
            println!("      {}        {}", "Index".cyan().bold(), format!("[{i}]").dimmed());
        }
        println!("      {}         {}", "Path".cyan().bold(), account.path);
        println!("      {}      {}", "Address".cyan().bold(), account.address.green());
        println!("      {}  0x{}", "Private Key".cyan().bold(), account.private_key_hex.as_str());
        if i + 1 < accounts.len() {
            println!();
        }
    }
    println!();
}

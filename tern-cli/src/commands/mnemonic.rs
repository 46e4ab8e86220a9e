//! Mnemonic validation command.

use clap::Args;
use colored::Colorize;
use zeroize::Zeroizing;

/// Check a mnemonic's words and checksum.
#[derive(Args)]
pub struct ValidateCommand {
    /// BIP39 mnemonic phrase to check.
    #[arg(short, long)]
    mnemonic: String,
}

impl ValidateCommand {
    /// Print the verdict; returns whether the phrase is valid.
    pub fn execute(self) -> bool {
        let phrase = Zeroizing::new(self.mnemonic);
        let words = phrase.split_whitespace().count();
        let valid = tern::validate_mnemonic(&phrase);
        print_result(words, valid);
        valid
    }
}

#[rustfmt::skip]
fn print_result(words: usize, valid: bool) {
    let verdict = if valid { "valid".green() } else { "invalid".red() };

    println!();
    println!("      {}        {words} words", "Words".cyan().bold());
    println!("      {}       {verdict}", "Result".cyan().bold());
    println!();
}

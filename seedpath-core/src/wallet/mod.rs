pub mod config;

pub use config::{SearchConfig, DEFAULT_MAX_INDEX, MAX_SEARCH_INDEX};

use crate::error::{Result, ScanError};
use bip39::{Language, Mnemonic};

/// BIP39 phrase lengths offered when creating a new wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WordCount {
    #[default]
    Twelve,
    TwentyFour,
}

impl WordCount {
    pub fn words(&self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::TwentyFour => 24,
        }
    }
}

impl TryFrom<usize> for WordCount {
    type Error = ScanError;

    fn try_from(words: usize) -> Result<Self> {
        match words {
            12 => Ok(WordCount::Twelve),
            24 => Ok(WordCount::TwentyFour),
            _ => Err(ScanError::config(format!(
                "Unsupported word count: {}. Use 12 or 24",
                words
            ))),
        }
    }
}

pub fn generate_mnemonic(word_count: WordCount) -> Result<String> {
    let mut rng = bip39::rand::thread_rng();
    let mnemonic = Mnemonic::generate_in_with(&mut rng, Language::English, word_count.words())
        .map_err(|e| ScanError::internal(format!("Failed to generate mnemonic: {}", e)))?;
    Ok(mnemonic.to_string())
}

/// Parses and checksum-validates an English BIP39 phrase.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| ScanError::invalid_mnemonic(e.to_string()))
}

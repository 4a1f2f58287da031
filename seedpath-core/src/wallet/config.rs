use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upper bound on the address index, inclusive.
pub const DEFAULT_MAX_INDEX: u32 = 5;

/// Largest non-hardened BIP32 child index.
pub const MAX_SEARCH_INDEX: u32 = (1 << 31) - 1;

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_index: u32,
    /// Optional BIP39 passphrase, empty for plain mnemonics.
    #[serde(skip)]
    pub passphrase: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_index: DEFAULT_MAX_INDEX,
            passphrase: String::new(),
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("max_index", &self.max_index)
            .field("passphrase", &if self.passphrase.is_empty() { "<none>" } else { "<redacted>" })
            .finish()
    }
}

impl SearchConfig {
    pub fn new(max_index: u32) -> Self {
        Self {
            max_index,
            ..Self::default()
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    /// Number of candidates a full search visits.
    pub fn candidate_count(&self) -> u64 {
        3 * (u64::from(self.max_index) + 1)
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_index(self.max_index)
    }
}

pub(crate) fn validate_max_index(max_index: u32) -> Result<()> {
    if max_index > MAX_SEARCH_INDEX {
        return Err(ScanError::config(format!(
            "Max index {} exceeds the last non-hardened index {}",
            max_index, MAX_SEARCH_INDEX
        )));
    }
    Ok(())
}

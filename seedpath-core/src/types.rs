use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// BIP32 derivation scheme. Variant order is the search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Bip44,
    Bip49,
    Bip84,
}

impl Scheme {
    pub const ALL: [Scheme; 3] = [Scheme::Bip44, Scheme::Bip49, Scheme::Bip84];

    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Bip44 => "bip44",
            Scheme::Bip49 => "bip49",
            Scheme::Bip84 => "bip84",
        }
    }

    /// External-chain path of the first account, without the address index.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            Scheme::Bip44 => "m/44'/0'/0'/0/",
            Scheme::Bip49 => "m/49'/0'/0'/0/",
            Scheme::Bip84 => "m/84'/0'/0'/0/",
        }
    }

    pub fn path(&self, index: u32) -> String {
        format!("{}{}", self.path_prefix(), index)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scheme::Bip44 => "Legacy (P2PKH)",
            Scheme::Bip49 => "Nested SegWit (P2SH-P2WPKH)",
            Scheme::Bip84 => "Native SegWit (P2WPKH)",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bip44" | "44" => Ok(Scheme::Bip44),
            "bip49" | "49" => Ok(Scheme::Bip49),
            "bip84" | "84" => Ok(Scheme::Bip84),
            _ => Err(ScanError::config(format!(
                "Unknown scheme: {}. Supported schemes: bip44, bip49, bip84",
                s
            ))),
        }
    }
}

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationResult {
    pub scheme: Scheme,
    pub index: u32,
    pub path: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(DerivationResult),
    NotFound {
        candidates_checked: usize,
        candidates_skipped: usize,
    },
}

impl SearchOutcome {
    pub fn found(&self) -> Option<&DerivationResult> {
        match self {
            SearchOutcome::Found(result) => Some(result),
            SearchOutcome::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn into_result(self) -> Option<DerivationResult> {
        match self {
            SearchOutcome::Found(result) => Some(result),
            SearchOutcome::NotFound { .. } => None,
        }
    }
}

/// One enumerated (scheme, index) pair and the address it derives to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub scheme: Scheme,
    pub index: u32,
    pub path: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Btc,
    Bsc,
}

impl FromStr for Chain {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "btc" | "bitcoin" => Ok(Chain::Btc),
            "bsc" | "bnb" => Ok(Chain::Bsc),
            _ => Err(ScanError::config(format!(
                "Unknown chain: {}. Supported chains: btc, bsc",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitcoinAddressType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressKind {
    Bitcoin(BitcoinAddressType),
    Bsc { checksummed: bool },
    Unknown,
}

impl AddressKind {
    /// The only scheme able to produce an address of this kind.
    pub fn likely_scheme(&self) -> Option<Scheme> {
        match self {
            AddressKind::Bitcoin(BitcoinAddressType::P2pkh) => Some(Scheme::Bip44),
            AddressKind::Bitcoin(BitcoinAddressType::P2sh) => Some(Scheme::Bip49),
            AddressKind::Bitcoin(BitcoinAddressType::P2wpkh) => Some(Scheme::Bip84),
            _ => None,
        }
    }
}

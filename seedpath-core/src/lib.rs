//! seedpath - offline derivation search for Bitcoin recovery phrases
//!
//! Given a BIP39 mnemonic and an address previously produced from it, this
//! library finds which BIP44/49/84 path and address index generated that
//! address. Nothing leaves the process: no network access, no storage.

pub mod bitcoin;
pub mod error;
pub mod search;
pub mod types;
pub mod wallet;

pub use error::{CandidateError, Result, ScanError};
pub use search::{
    derive_address, derive_candidates, find_derivation, find_derivation_with, search,
    Bip32Deriver, CandidateDeriver, Searcher,
};
pub use types::{
    AddressKind, BitcoinAddressType, Candidate, Chain, DerivationResult, Scheme, SearchOutcome,
};
pub use wallet::{
    generate_mnemonic, parse_mnemonic, SearchConfig, WordCount, DEFAULT_MAX_INDEX,
    MAX_SEARCH_INDEX,
};

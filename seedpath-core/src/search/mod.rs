//! Offline search for the derivation path that produced a known address.
//!
//! Candidates are visited in a fixed order: schemes as listed in
//! [`Scheme::ALL`], and within each scheme the address index ascending from
//! zero to `max_index` inclusive. The first candidate whose encoded address
//! equals the target wins.

use crate::bitcoin::{address_matches, encode_address, NETWORK};
use crate::error::{CandidateError, Result, ScanError};
use crate::types::{Candidate, DerivationResult, Scheme, SearchOutcome};
use crate::wallet::config::validate_max_index;
use crate::wallet::{parse_mnemonic, SearchConfig};

use bip39::Mnemonic;
use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::key::CompressedPublicKey;
use bitcoin::secp256k1::{All, Secp256k1};
use std::str::FromStr;
use zeroize::Zeroizing;

/// Produces the address for a single (scheme, index) candidate.
pub trait CandidateDeriver {
    fn derive_address(&self, scheme: Scheme, index: u32) -> std::result::Result<String, CandidateError>;
}

/// BIP32 deriver rooted at the mainnet master key of one seed.
pub struct Bip32Deriver {
    secp: Secp256k1<All>,
    master: Xpriv,
}

impl Bip32Deriver {
    pub fn from_mnemonic(mnemonic: &Mnemonic, passphrase: &str) -> Result<Self> {
        let seed = Zeroizing::new(mnemonic.to_seed(passphrase));
        Self::from_seed(&seed[..])
    }

    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let master = Xpriv::new_master(NETWORK, seed)
            .map_err(|e| ScanError::internal(format!("Failed to derive master key: {}", e)))?;

        Ok(Self {
            secp: Secp256k1::new(),
            master,
        })
    }
}

impl CandidateDeriver for Bip32Deriver {
    fn derive_address(&self, scheme: Scheme, index: u32) -> std::result::Result<String, CandidateError> {
        let path_str = scheme.path(index);
        let path = DerivationPath::from_str(&path_str).map_err(|e| CandidateError::InvalidPath {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        let mut child = self
            .master
            .derive_priv(&self.secp, &path)
            .map_err(|e| CandidateError::Derivation {
                path: path_str.clone(),
                reason: e.to_string(),
            })?;

        let pubkey = CompressedPublicKey(child.private_key.public_key(&self.secp));
        child.private_key.non_secure_erase();

        Ok(encode_address(scheme, &pubkey).to_string())
    }
}

impl Drop for Bip32Deriver {
    fn drop(&mut self) {
        self.master.private_key.non_secure_erase();
    }
}

/// Walks every candidate in canonical order and stops at the first match.
/// A candidate that fails to derive is skipped.
pub fn search<D: CandidateDeriver + ?Sized>(deriver: &D, target: &str, max_index: u32) -> SearchOutcome {
    let mut checked = 0usize;
    let mut skipped = 0usize;

    for scheme in Scheme::ALL {
        tracing::debug!(
            "Scanning {} [{}] indices 0..={}",
            scheme,
            scheme.label(),
            max_index
        );

        for index in 0..=max_index {
            checked += 1;

            let address = match deriver.derive_address(scheme, index) {
                Ok(address) => address,
                Err(e) => {
                    skipped += 1;
                    tracing::debug!("Skipping {} index {}: {}", scheme, index, e);
                    continue;
                }
            };

            if address_matches(scheme, &address, target) {
                let path = scheme.path(index);
                tracing::info!("Found matching derivation at {}", path);
                return SearchOutcome::Found(DerivationResult {
                    scheme,
                    index,
                    path,
                    address,
                });
            }
        }
    }

    tracing::info!(
        "No matching derivation after {} candidates ({} skipped)",
        checked,
        skipped
    );
    SearchOutcome::NotFound {
        candidates_checked: checked,
        candidates_skipped: skipped,
    }
}

/// Searches bip44, bip49 then bip84 at indices `0..=max_index` for the
/// address `target_address`, using the mnemonic without a passphrase.
///
/// Surrounding whitespace is trimmed from `target_address` before it is
/// compared; everything between is matched as given.
///
/// Returns `ScanError::InvalidMnemonic` before any key derivation when the
/// phrase fails BIP39 validation. Running out of candidates is
/// `SearchOutcome::NotFound`, not an error.
pub fn find_derivation(mnemonic: &str, target_address: &str, max_index: u32) -> Result<SearchOutcome> {
    find_derivation_with(mnemonic, target_address, max_index, |m| {
        Bip32Deriver::from_mnemonic(m, "")
    })
}

/// Same as [`find_derivation`] with a caller-supplied deriver. `build` runs
/// only once every input has been validated.
pub fn find_derivation_with<D, F>(
    mnemonic: &str,
    target_address: &str,
    max_index: u32,
    build: F,
) -> Result<SearchOutcome>
where
    D: CandidateDeriver,
    F: FnOnce(&Mnemonic) -> Result<D>,
{
    let mnemonic = parse_mnemonic(mnemonic)?;
    let target = validate_target(target_address)?;
    validate_max_index(max_index)?;

    let deriver = build(&mnemonic)?;
    Ok(search(&deriver, target, max_index))
}

fn validate_target(target: &str) -> Result<&str> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ScanError::invalid_target("Target address cannot be empty"));
    }
    Ok(target)
}

/// Derives the address of a single candidate.
pub fn derive_address(mnemonic: &str, scheme: Scheme, index: u32) -> Result<Candidate> {
    let mnemonic = parse_mnemonic(mnemonic)?;
    let deriver = Bip32Deriver::from_mnemonic(&mnemonic, "")?;
    derive_candidate(&deriver, scheme, index)
}

/// Every candidate a search bounded by `max_index` would visit, in visiting
/// order. Candidates that fail to derive are left out.
pub fn derive_candidates(mnemonic: &str, max_index: u32) -> Result<Vec<Candidate>> {
    Searcher::new(SearchConfig::new(max_index))?.candidates(mnemonic)
}

fn derive_candidate<D: CandidateDeriver + ?Sized>(
    deriver: &D,
    scheme: Scheme,
    index: u32,
) -> Result<Candidate> {
    let address = deriver
        .derive_address(scheme, index)
        .map_err(|e| ScanError::bitcoin(e.to_string()))?;

    Ok(Candidate {
        scheme,
        index,
        path: scheme.path(index),
        address,
    })
}

/// Search runner bound to a validated [`SearchConfig`].
#[derive(Debug, Clone)]
pub struct Searcher {
    config: SearchConfig,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn find(&self, mnemonic: &str, target_address: &str) -> Result<SearchOutcome> {
        find_derivation_with(mnemonic, target_address, self.config.max_index, |m| {
            Bip32Deriver::from_mnemonic(m, &self.config.passphrase)
        })
    }

    pub fn candidates(&self, mnemonic: &str) -> Result<Vec<Candidate>> {
        self.candidates_for(mnemonic, &Scheme::ALL)
    }

    /// Candidates restricted to `schemes`, still in canonical order.
    pub fn candidates_for(&self, mnemonic: &str, schemes: &[Scheme]) -> Result<Vec<Candidate>> {
        let mnemonic = parse_mnemonic(mnemonic)?;
        let deriver = Bip32Deriver::from_mnemonic(&mnemonic, &self.config.passphrase)?;

        let mut candidates = Vec::new();
        for scheme in Scheme::ALL.into_iter().filter(|s| schemes.contains(s)) {
            for index in 0..=self.config.max_index {
                match derive_candidate(&deriver, scheme, index) {
                    Ok(candidate) => candidates.push(candidate),
                    Err(e) => tracing::debug!("Skipping {} index {}: {}", scheme, index, e),
                }
            }
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{generate_mnemonic, WordCount, MAX_SEARCH_INDEX};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const BAD_CHECKSUM: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
    const UNRELATED_ADDRESS: &str = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";

    /// Records every call and answers from a fixed table.
    #[derive(Default)]
    struct RecordingDeriver {
        calls: RefCell<Vec<(Scheme, u32)>>,
        overrides: HashMap<(Scheme, u32), std::result::Result<String, CandidateError>>,
    }

    impl RecordingDeriver {
        fn with(mut self, scheme: Scheme, index: u32, result: std::result::Result<String, CandidateError>) -> Self {
            self.overrides.insert((scheme, index), result);
            self
        }

        fn calls(&self) -> Vec<(Scheme, u32)> {
            self.calls.borrow().clone()
        }
    }

    impl CandidateDeriver for RecordingDeriver {
        fn derive_address(&self, scheme: Scheme, index: u32) -> std::result::Result<String, CandidateError> {
            self.calls.borrow_mut().push((scheme, index));
            self.overrides
                .get(&(scheme, index))
                .cloned()
                .unwrap_or_else(|| Ok(format!("{}-{}", scheme, index)))
        }
    }

    fn failure(scheme: Scheme, index: u32) -> std::result::Result<String, CandidateError> {
        Err(CandidateError::Derivation {
            path: scheme.path(index),
            reason: "invalid tweak".to_string(),
        })
    }

    #[test]
    fn test_known_vectors() {
        let cases = [
            (Scheme::Bip44, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"),
            (Scheme::Bip49, "37VucYSaXLCAsxYyAPfbSi9eh4iEcbShgf"),
            (Scheme::Bip84, "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu"),
        ];

        for (scheme, expected) in cases {
            let candidate = derive_address(TEST_MNEMONIC, scheme, 0).unwrap();
            assert_eq!(candidate.address, expected);
            assert_eq!(candidate.path, scheme.path(0));
        }
    }

    #[test]
    fn test_finds_bip44_index_zero() {
        let outcome = find_derivation(TEST_MNEMONIC, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA", 5).unwrap();

        assert_eq!(
            outcome,
            SearchOutcome::Found(DerivationResult {
                scheme: Scheme::Bip44,
                index: 0,
                path: "m/44'/0'/0'/0/0".to_string(),
                address: "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA".to_string(),
            })
        );
    }

    #[test]
    fn test_finds_bip84_index_zero() {
        let outcome = find_derivation(
            TEST_MNEMONIC,
            "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu",
            5,
        )
        .unwrap();

        let result = outcome.found().unwrap();
        assert_eq!(result.scheme, Scheme::Bip84);
        assert_eq!(result.index, 0);
    }

    #[test]
    fn test_finds_bip49_index_three() {
        let target = derive_address(TEST_MNEMONIC, Scheme::Bip49, 3).unwrap();
        assert!(target.address.starts_with('3'));

        let result = find_derivation(TEST_MNEMONIC, &target.address, 5)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.scheme, Scheme::Bip49);
        assert_eq!(result.index, 3);
        assert_eq!(result.path, "m/49'/0'/0'/0/3");
    }

    #[test]
    fn test_index_beyond_bound_not_found() {
        let target = derive_address(TEST_MNEMONIC, Scheme::Bip49, 3).unwrap();

        let outcome = find_derivation(TEST_MNEMONIC, &target.address, 2).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::NotFound {
                candidates_checked: 9,
                candidates_skipped: 0,
            }
        );
    }

    #[test]
    fn test_unrelated_address_not_found() {
        let outcome = find_derivation(TEST_MNEMONIC, UNRELATED_ADDRESS, 5).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::NotFound {
                candidates_checked: 18,
                candidates_skipped: 0,
            }
        );
    }

    #[test]
    fn test_twenty_four_word_mnemonic() {
        let mnemonic = generate_mnemonic(WordCount::TwentyFour).unwrap();
        let target = derive_address(&mnemonic, Scheme::Bip84, 0).unwrap();

        let result = find_derivation(&mnemonic, &target.address, 5)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!((result.scheme, result.index), (Scheme::Bip84, 0));
    }

    #[test]
    fn test_invalid_mnemonic_rejected_before_derivation() {
        let built = Cell::new(false);

        let result = find_derivation_with(BAD_CHECKSUM, UNRELATED_ADDRESS, 5, |_| {
            built.set(true);
            Ok(RecordingDeriver::default())
        });

        assert!(matches!(result, Err(ScanError::InvalidMnemonic(_))));
        assert!(!built.get());
    }

    #[test]
    fn test_empty_target_rejected() {
        let result = find_derivation(TEST_MNEMONIC, "   ", 5);
        assert!(matches!(result, Err(ScanError::InvalidTarget(_))));
    }

    #[test]
    fn test_target_whitespace_trimmed() {
        let padded = " \t1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA\n";

        let result = find_derivation(TEST_MNEMONIC, padded, 0)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!((result.scheme, result.index), (Scheme::Bip44, 0));
        assert_eq!(result.address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");

        // inner whitespace is not removed
        let split = "1LqBGSKuX5yYUonjxT5q GfpUsXKYYWeabA";
        assert!(!find_derivation(TEST_MNEMONIC, split, 0).unwrap().is_found());
    }

    #[test]
    fn test_oversized_bound_rejected_before_derivation() {
        let built = Cell::new(false);

        let result = find_derivation_with(TEST_MNEMONIC, UNRELATED_ADDRESS, MAX_SEARCH_INDEX + 1, |_| {
            built.set(true);
            Ok(RecordingDeriver::default())
        });

        assert!(matches!(result, Err(ScanError::Config(_))));
        assert!(!built.get());
    }

    #[test]
    fn test_deterministic() {
        let target = derive_address(TEST_MNEMONIC, Scheme::Bip84, 4).unwrap();

        let first = find_derivation(TEST_MNEMONIC, &target.address, 5).unwrap();
        let second = find_derivation(TEST_MNEMONIC, &target.address, 5).unwrap();
        assert_eq!(first, second);

        let missing_a = find_derivation(TEST_MNEMONIC, UNRELATED_ADDRESS, 3).unwrap();
        let missing_b = find_derivation(TEST_MNEMONIC, UNRELATED_ADDRESS, 3).unwrap();
        assert_eq!(missing_a, missing_b);
    }

    #[test]
    fn test_visit_order_stops_at_first_match() {
        let deriver = RecordingDeriver::default();

        let outcome = search(&deriver, "bip44-2", 5);
        assert_eq!(outcome.found().unwrap().index, 2);
        assert_eq!(
            deriver.calls(),
            vec![(Scheme::Bip44, 0), (Scheme::Bip44, 1), (Scheme::Bip44, 2)]
        );
    }

    #[test]
    fn test_earlier_scheme_wins_tie() {
        let deriver = RecordingDeriver::default()
            .with(Scheme::Bip44, 2, Ok("shared".to_string()))
            .with(Scheme::Bip84, 0, Ok("shared".to_string()));

        let result = search(&deriver, "shared", 5).into_result().unwrap();
        assert_eq!((result.scheme, result.index), (Scheme::Bip44, 2));
        assert!(!deriver.calls().contains(&(Scheme::Bip84, 0)));
    }

    #[test]
    fn test_full_scan_order() {
        let deriver = RecordingDeriver::default();

        let outcome = search(&deriver, "nowhere", 1);
        assert!(!outcome.is_found());
        assert_eq!(
            deriver.calls(),
            vec![
                (Scheme::Bip44, 0),
                (Scheme::Bip44, 1),
                (Scheme::Bip49, 0),
                (Scheme::Bip49, 1),
                (Scheme::Bip84, 0),
                (Scheme::Bip84, 1),
            ]
        );
    }

    #[test]
    fn test_zero_bound_checks_three_candidates() {
        let deriver = RecordingDeriver::default();

        let outcome = search(&deriver, "nowhere", 0);
        assert_eq!(
            outcome,
            SearchOutcome::NotFound {
                candidates_checked: 3,
                candidates_skipped: 0,
            }
        );
        assert_eq!(
            deriver.calls(),
            vec![(Scheme::Bip44, 0), (Scheme::Bip49, 0), (Scheme::Bip84, 0)]
        );

        let outcome = find_derivation(TEST_MNEMONIC, "37VucYSaXLCAsxYyAPfbSi9eh4iEcbShgf", 0).unwrap();
        assert_eq!(outcome.found().unwrap().scheme, Scheme::Bip49);
    }

    #[test]
    fn test_failed_candidate_is_skipped() {
        let deriver = RecordingDeriver::default().with(Scheme::Bip44, 1, failure(Scheme::Bip44, 1));

        let result = search(&deriver, "bip49-0", 3).into_result().unwrap();
        assert_eq!((result.scheme, result.index), (Scheme::Bip49, 0));

        let deriver = RecordingDeriver::default().with(Scheme::Bip84, 3, failure(Scheme::Bip84, 3));
        assert_eq!(
            search(&deriver, "nowhere", 3),
            SearchOutcome::NotFound {
                candidates_checked: 12,
                candidates_skipped: 1,
            }
        );
    }

    #[test]
    fn test_uppercase_bech32_target() {
        let target = "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu".to_ascii_uppercase();

        let result = find_derivation(TEST_MNEMONIC, &target, 0)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.scheme, Scheme::Bip84);
        assert_eq!(result.address, "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu");
    }

    #[test]
    fn test_passphrase_changes_search_space() {
        let searcher = Searcher::new(SearchConfig::new(2).with_passphrase("TREZOR")).unwrap();

        let outcome = searcher
            .find(TEST_MNEMONIC, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA")
            .unwrap();
        assert!(!outcome.is_found());

        let with_passphrase = searcher.candidates(TEST_MNEMONIC).unwrap();
        let target = &with_passphrase[4].address;
        let result = searcher.find(TEST_MNEMONIC, target).unwrap().into_result().unwrap();
        assert_eq!((result.scheme, result.index), (Scheme::Bip49, 1));
    }

    #[test]
    fn test_candidates_in_search_order() {
        let candidates = derive_candidates(TEST_MNEMONIC, 2).unwrap();
        assert_eq!(candidates.len(), 9);

        let order: Vec<(Scheme, u32)> = candidates.iter().map(|c| (c.scheme, c.index)).collect();
        assert_eq!(order[0], (Scheme::Bip44, 0));
        assert_eq!(order[3], (Scheme::Bip49, 0));
        assert_eq!(order[8], (Scheme::Bip84, 2));
        assert_eq!(candidates[0].address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
        assert!(candidates[3].address.starts_with('3'));
        assert!(candidates[6].address.starts_with("bc1q"));
    }

    #[test]
    fn test_candidates_for_subset() {
        let searcher = Searcher::new(SearchConfig::new(1)).unwrap();
        let candidates = searcher
            .candidates_for(TEST_MNEMONIC, &[Scheme::Bip84, Scheme::Bip44])
            .unwrap();

        let order: Vec<(Scheme, u32)> = candidates.iter().map(|c| (c.scheme, c.index)).collect();
        assert_eq!(
            order,
            vec![
                (Scheme::Bip44, 0),
                (Scheme::Bip44, 1),
                (Scheme::Bip84, 0),
                (Scheme::Bip84, 1),
            ]
        );
    }
}

//! Address encoding for the supported schemes and classification of
//! user-supplied addresses.

use crate::types::{AddressKind, BitcoinAddressType, Chain, Scheme};

use bitcoin::key::CompressedPublicKey;
use bitcoin::{Address, AddressType, Network};
use std::str::FromStr;

/// Every derived address is a mainnet address.
pub const NETWORK: Network = Network::Bitcoin;

pub fn encode_address(scheme: Scheme, pubkey: &CompressedPublicKey) -> Address {
    match scheme {
        Scheme::Bip44 => Address::p2pkh(pubkey, NETWORK),
        Scheme::Bip49 => Address::p2shwpkh(pubkey, NETWORK),
        Scheme::Bip84 => Address::p2wpkh(pubkey, NETWORK),
    }
}

/// Base58 addresses compare byte for byte. Bech32 additionally accepts the
/// all-uppercase form; mixed case is never valid bech32.
pub fn address_matches(scheme: Scheme, candidate: &str, target: &str) -> bool {
    if candidate == target {
        return true;
    }

    match scheme {
        Scheme::Bip84 => {
            !target.chars().any(|c| c.is_ascii_lowercase())
                && candidate.to_ascii_uppercase() == target
        }
        Scheme::Bip44 | Scheme::Bip49 => false,
    }
}

pub fn classify_address(input: &str) -> AddressKind {
    let input = input.trim();
    if input.is_empty() {
        return AddressKind::Unknown;
    }

    if let Some(body) = input.strip_prefix("0x") {
        return classify_evm(body);
    }

    let address = match Address::from_str(input).and_then(|a| a.require_network(NETWORK)) {
        Ok(address) => address,
        Err(e) => {
            tracing::debug!("Not a mainnet Bitcoin address: {}", e);
            return AddressKind::Unknown;
        }
    };

    let address_type = match address.address_type() {
        Some(AddressType::P2pkh) => BitcoinAddressType::P2pkh,
        Some(AddressType::P2sh) => BitcoinAddressType::P2sh,
        Some(AddressType::P2wpkh) => BitcoinAddressType::P2wpkh,
        Some(AddressType::P2wsh) => BitcoinAddressType::P2wsh,
        Some(AddressType::P2tr) => BitcoinAddressType::P2tr,
        _ => BitcoinAddressType::Other,
    };

    AddressKind::Bitcoin(address_type)
}

fn classify_evm(body: &str) -> AddressKind {
    let checksummed = match eip55_checksum(body) {
        Some(checksummed) => checksummed,
        None => return AddressKind::Unknown,
    };

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return AddressKind::Bsc { checksummed: false };
    }

    if body == checksummed {
        AddressKind::Bsc { checksummed: true }
    } else {
        AddressKind::Unknown
    }
}

/// EIP-55 mixed-case form of a 40-digit hex address body, without `0x`.
/// `None` unless `body` is exactly 20 bytes of hex.
pub fn eip55_checksum(body: &str) -> Option<String> {
    if body.len() != 40 || hex::decode(body).is_err() {
        return None;
    }

    let lower = body.to_ascii_lowercase();
    let hash = keccak_hash::keccak(lower.as_bytes());
    let hash = hash.as_bytes();

    let checksummed = lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if c.is_ascii_digit() {
                return c;
            }
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();

    Some(checksummed)
}

/// Warning shown when the address entered looks like it belongs to the
/// other chain.
pub fn network_conflict(expected: Chain, input: &str) -> Option<String> {
    let input = input.trim();
    let looks_bsc = input.starts_with("0x");
    let looks_btc = input.starts_with('1')
        || input.starts_with('3')
        || input.to_lowercase().starts_with("bc1");

    match expected {
        Chain::Btc if looks_bsc => {
            Some("This address looks like a BSC (Binance Smart Chain) address.".to_string())
        }
        Chain::Bsc if looks_btc => Some("This address looks like a Bitcoin address.".to_string()),
        _ => None,
    }
}

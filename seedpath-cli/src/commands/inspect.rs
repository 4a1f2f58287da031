use seedpath_core::bitcoin::{classify_address, network_conflict};
use seedpath_core::{AddressKind, BitcoinAddressType, Chain, Result};

pub fn handle_inspect_command(address: &str, expect: Option<Chain>) -> Result<()> {
    let kind = classify_address(address);

    let description = match kind {
        AddressKind::Bitcoin(BitcoinAddressType::P2pkh) => "Bitcoin legacy (P2PKH)",
        AddressKind::Bitcoin(BitcoinAddressType::P2sh) => "Bitcoin script hash (P2SH)",
        AddressKind::Bitcoin(BitcoinAddressType::P2wpkh) => "Bitcoin native SegWit (P2WPKH)",
        AddressKind::Bitcoin(BitcoinAddressType::P2wsh) => "Bitcoin native SegWit script (P2WSH)",
        AddressKind::Bitcoin(BitcoinAddressType::P2tr) => "Bitcoin Taproot (P2TR)",
        AddressKind::Bitcoin(BitcoinAddressType::Other) => "Bitcoin (other)",
        AddressKind::Bsc { checksummed: true } => "BSC (EIP-55 checksummed)",
        AddressKind::Bsc { checksummed: false } => "BSC",
        AddressKind::Unknown => "Unrecognised",
    };

    println!("Address: {}", address.trim());
    println!("  Type: {}", description);
    match kind.likely_scheme() {
        Some(scheme) => println!("  Derivation: {} ({})", scheme, scheme.path_prefix()),
        None => println!("  Derivation: not produced by bip44/bip49/bip84"),
    }

    if let Some(expected) = expect {
        if let Some(warning) = network_conflict(expected, address) {
            println!("  Warning: {}", warning);
        }
    }

    Ok(())
}

use crate::commands::read_mnemonic;
use crate::config::CliConfig;
use comfy_table::{presets::UTF8_FULL, Table};
use seedpath_core::bitcoin::classify_address;
use seedpath_core::{AddressKind, Result, Searcher, SearchOutcome};

pub struct FindArgs {
    pub address: String,
    pub max_index: Option<u32>,
    pub mnemonic: Option<String>,
    pub json: bool,
}

pub fn handle_find_command(args: FindArgs, config: &CliConfig) -> Result<()> {
    let search_config = config.search_config(args.max_index);
    let max_index = search_config.max_index;
    let searcher = Searcher::new(search_config)?;

    let kind = classify_address(&args.address);
    match kind {
        AddressKind::Bsc { .. } => {
            eprintln!("Warning: this looks like a BSC address; no Bitcoin derivation can match it.");
        }
        AddressKind::Unknown => {
            eprintln!("Warning: this is not a recognised mainnet Bitcoin address.");
        }
        AddressKind::Bitcoin(_) => {
            if let Some(scheme) = kind.likely_scheme() {
                tracing::debug!("Address format suggests {}", scheme);
            }
        }
    }

    let mnemonic = read_mnemonic(args.mnemonic)?;
    tracing::info!(
        "Searching {} candidates for {}",
        searcher.config().candidate_count(),
        args.address.trim()
    );
    let outcome = searcher.find(&mnemonic, &args.address)?;

    if args.json || config.json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        SearchOutcome::Found(result) => {
            println!("Matching derivation found!");
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Scheme", "Type", "Index", "Path", "Address"]);
            table.add_row(vec![
                result.scheme.to_string(),
                result.scheme.label().to_string(),
                result.index.to_string(),
                result.path,
                result.address,
            ]);
            println!("{}", table);
        }
        SearchOutcome::NotFound {
            candidates_checked,
            candidates_skipped,
        } => {
            println!(
                "No matching derivation found in {} candidates (indices 0..={}).",
                candidates_checked, max_index
            );
            if candidates_skipped > 0 {
                println!("{} candidates could not be derived.", candidates_skipped);
            }
            println!("Consider increasing the search bound with --max-index.");
        }
    }

    Ok(())
}

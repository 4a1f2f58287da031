use crate::commands::read_mnemonic;
use crate::config::CliConfig;
use comfy_table::{presets::UTF8_FULL, Table};
use seedpath_core::{Result, Scheme, Searcher};

pub struct DeriveArgs {
    pub max_index: Option<u32>,
    pub scheme: Option<Scheme>,
    pub mnemonic: Option<String>,
    pub json: bool,
}

pub fn handle_derive_command(args: DeriveArgs, config: &CliConfig) -> Result<()> {
    let searcher = Searcher::new(config.search_config(args.max_index))?;
    let schemes: Vec<Scheme> = match args.scheme {
        Some(scheme) => vec![scheme],
        None => Scheme::ALL.to_vec(),
    };

    let mnemonic = read_mnemonic(args.mnemonic)?;
    let candidates = searcher.candidates_for(&mnemonic, &schemes)?;

    if args.json || config.json_output {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Scheme", "Index", "Path", "Address"]);
    for candidate in candidates {
        table.add_row(vec![
            candidate.scheme.to_string(),
            candidate.index.to_string(),
            candidate.path,
            candidate.address,
        ]);
    }
    println!("{}", table);

    Ok(())
}

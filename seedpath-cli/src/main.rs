mod commands;
mod config;

use clap::{Parser, Subcommand};
use commands::{derive::DeriveArgs, find::FindArgs};
use config::CliConfig;
use seedpath_core::{Chain, ScanError, Scheme};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "seedpath")]
#[command(about = "Find which BIP44/49/84 path produced a Bitcoin address, offline")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/seedpath/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a mnemonic for the derivation that produced an address
    Find {
        /// Address to look for
        #[arg(short, long)]
        address: String,
        /// Highest address index to try for each scheme
        #[arg(short = 'n', long)]
        max_index: Option<u32>,
        /// Mnemonic phrase (will prompt if not provided)
        #[arg(short, long)]
        mnemonic: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the addresses a mnemonic derives to
    Derive {
        /// Highest address index to derive for each scheme
        #[arg(short = 'n', long)]
        max_index: Option<u32>,
        /// Only derive this scheme (bip44, bip49, bip84)
        #[arg(short, long)]
        scheme: Option<Scheme>,
        /// Mnemonic phrase (will prompt if not provided)
        #[arg(short, long)]
        mnemonic: Option<String>,
        /// Print the addresses as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a new recovery phrase
    Generate {
        /// Number of words (12 or 24)
        #[arg(short, long, default_value_t = 12)]
        words: usize,
    },
    /// Identify the type of an address
    Inspect {
        /// Address to inspect
        address: String,
        /// Chain the address is meant for (btc, bsc)
        #[arg(short, long)]
        expect: Option<Chain>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "seedpath={},seedpath_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    // Execute command
    let result = match cli.command {
        Commands::Find {
            address,
            max_index,
            mnemonic,
            json,
        } => commands::handle_find_command(
            FindArgs {
                address,
                max_index,
                mnemonic,
                json,
            },
            &config,
        ),
        Commands::Derive {
            max_index,
            scheme,
            mnemonic,
            json,
        } => commands::handle_derive_command(
            DeriveArgs {
                max_index,
                scheme,
                mnemonic,
                json,
            },
            &config,
        ),
        Commands::Generate { words } => commands::handle_generate_command(words),
        Commands::Inspect { address, expect } => commands::handle_inspect_command(&address, expect),
    };

    if let Err(e) = result {
        match e {
            ScanError::InvalidMnemonic(reason) => {
                eprintln!("Error: Invalid mnemonic phrase ({})", reason);
                eprintln!("Check the words and their order, then try again");
            }
            ScanError::InvalidTarget(reason) => {
                eprintln!("Error: {}", reason);
            }
            ScanError::Config(reason) => {
                eprintln!("Error: Invalid configuration: {}", reason);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

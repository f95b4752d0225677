//! patfam - patent identifier cleanup and family deduplication
//!
//! Thin command-line wrapper over `impress-patents` and `patfam-core`.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use patfam_core::{DedupError, EngineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "patfam")]
#[command(version, about = "Normalize patent numbers and deduplicate them by family")]
struct Cli {
    /// Engine configuration file (TOML, or JSON with a .json extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split pasted text into identifier tokens
    Parse { text: String },

    /// Generic format cleanup
    Normalize {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Jurisdiction-specific correction
    Correct {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Normalize then correct
    Canonicalize {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Pick the preferred member of one family
    Select {
        /// Jurisdiction codes, most preferred first (e.g. "US WO EP")
        #[arg(long)]
        preference: Option<String>,

        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Combine identifier files into one deduplicated set
    Dedupe {
        /// Input collection as NAME=FILE, or just FILE to name it after the file
        #[arg(long = "input", required = true, value_parser = commands::parse_input)]
        inputs: Vec<(String, PathBuf)>,

        /// JSON index of known documents: {"US8125463B2": {"family_id": "F1"}}
        #[arg(long)]
        index: Option<PathBuf>,

        /// File of identifiers already in the destination collection
        #[arg(long)]
        existing: Option<PathBuf>,

        #[arg(long)]
        preference: Option<String>,
    },
}

fn init_logger(verbose: bool) {
    let default = if verbose {
        "patfam=debug,patfam_core=debug,impress_patents=debug"
    } else {
        "patfam=info,patfam_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_or_default()?,
    };
    tracing::debug!(preference = %config.preference, "engine config loaded");
    Ok(config)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Parse { text } => commands::parse(&text),
        Command::Normalize { ids } => commands::each(&ids, impress_patents::normalize),
        Command::Correct { ids } => commands::each(&ids, impress_patents::correct),
        Command::Canonicalize { ids } => commands::each(&ids, impress_patents::canonicalize),
        Command::Select { preference, ids } => {
            let config = load_config(cli.config.as_ref())?;
            commands::select(&config, preference.as_deref(), &ids)?;
        }
        Command::Dedupe {
            inputs,
            index,
            existing,
            preference,
        } => {
            let config = load_config(cli.config.as_ref())?;
            commands::dedupe(
                config,
                &inputs,
                index.as_deref(),
                existing.as_deref(),
                preference.as_deref(),
            )?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(err) = run(cli) {
        tracing::error!("{err}");
        eprintln!("error: {err}");
        let code = if err.downcast_ref::<DedupError>().is_some() {
            2
        } else {
            1
        };
        std::process::exit(code);
    }
}

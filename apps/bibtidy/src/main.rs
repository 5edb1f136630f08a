//! bibtidy - BibTeX normalizer
//!
//! Reads a bibliography, normalizes every entry and writes the result.

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bibtidy_core::{reformat_bibtex_file, BibtidyConfig};

const DEFAULT_INPUT: &str = "refs_hors_eq.bib";
const DEFAULT_OUTPUT: &str = "refs_hors_eq_reformatted.bib";

#[derive(Parser)]
#[command(name = "bibtidy")]
#[command(author, version, about = "Normalize a BibTeX bibliography", long_about = None)]
struct Cli {
    /// Bibliography to read
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the normalized bibliography
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Configuration file (TOML); defaults to the user config if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = BibtidyConfig::load_or_default(cli.config.as_deref())?;
    debug!(?config, "loaded configuration");

    let report = reformat_bibtex_file(&cli.input, &cli.output, &config)?;
    debug!(
        kept = report.entries.len(),
        skipped = report.skipped.len(),
        "run complete"
    );

    println!("Reformatted file written to {}", cli.output.display());
    Ok(())
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

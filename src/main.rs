//! # Butterfly-arcflags CLI
//!
//! Command-line interface for the butterfly-arcflags library.
//! Loads a JSON graph description and runs arc-flag preprocessing and
//! shortest-path queries on it.

use clap::Parser;
use log::error;

mod cli;

fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging to stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🦋 Butterfly-arcflags v{} starting...", env!("BUTTERFLY_VERSION"));
    }

    if let Err(e) = cli::run(cli) {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

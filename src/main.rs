//! manifest-check CLI
//!
//! Exit status 0 means the lists match, 1 means a reconciliation
//! mismatch (or bad-idea files in version control), 2 means the
//! comparison could not even be attempted.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use manifest_check::cli::Cli;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.into_options();

    match manifest_check::check(&options) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("{}", error.to_string().red());
            std::process::exit(2);
        }
    }
}

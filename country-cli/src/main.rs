//! Binary crate for the `country` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive country selection and configuration
//! - Terminal rendering of the display fields

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod countries;
mod terminal;

fn init_logging(verbose: bool) {
    let default = if verbose { "country_core=debug,country_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_logging(cmd.verbose);
    cmd.run().await
}

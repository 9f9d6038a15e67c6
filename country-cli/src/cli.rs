use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use country_core::{Config, InfoPipeline, ProviderId, SelectionHandler};
use inquire::{CustomType, InquireError, Select, Text};

use crate::{countries, terminal::TerminalPresenter};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "country", version, about = "Country facts with today's weather at the capital")]
pub struct Cli {
    /// Log pipeline steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up one country and print its fields.
    Show {
        /// Country name, e.g. "Japan".
        country: String,

        /// Print the fields as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Pick countries interactively until Esc is pressed.
    Pick,

    /// Set provider endpoints and the settle delay.
    Configure,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { country, json } => show(&country, json).await,
            Command::Pick => pick().await,
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn handler(json: bool) -> anyhow::Result<SelectionHandler> {
    let config = Config::load()?;
    let pipeline = InfoPipeline::from_config(&config).context("Failed to set up providers")?;

    Ok(SelectionHandler::new(Arc::new(pipeline), Arc::new(TerminalPresenter::new(json))))
}

async fn show(country: &str, json: bool) -> anyhow::Result<()> {
    let handler = handler(json)?;
    handler.on_select(country).await?;
    Ok(())
}

async fn pick() -> anyhow::Result<()> {
    let handler = handler(false)?;

    loop {
        let choice = match Select::new("Country:", countries::choices()).with_page_size(12).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let value = countries::selection_value(choice);

        // Failures were already reported by the presenter; keep picking.
        if let Err(err) = handler.on_select(value).await {
            tracing::debug!("lookup for {value} failed: {err}");
        }
        println!();
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    for id in ProviderId::all() {
        let current = config.base_url(*id).to_owned();
        let base_url = Text::new(&format!("Base URL for {id}:")).with_default(&current).prompt()?;

        if base_url.trim() == id.default_base_url() && !config.has_override(*id) {
            continue;
        }
        config.set_base_url(*id, base_url.trim().to_string());
    }

    config.settle_delay_ms = CustomType::<u64>::new("Settle delay (ms):")
        .with_default(config.settle_delay_ms)
        .with_error_message("Please enter a whole number of milliseconds")
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

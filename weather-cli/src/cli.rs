use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use tracing::debug;
use weather_core::{Config, FetchOutcome, RequestCoordinator, config::redact_key, provider};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for any location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherapi.com API key.
    Configure,

    /// Show current weather for a location.
    Show {
        /// Location name, postcode or "lat,lon".
        location: String,

        /// Print the snapshot as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Interactive search: look up locations until Esc is pressed.
    Search,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, json } => show(location, json).await,
            Command::Search => search().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load_from_disk()?;

    let key = Password::new("weatherapi.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    cfg.set_api_key(key);
    cfg.resolve_api_key()?;
    cfg.save()?;

    let path = Config::config_file_path()?;
    println!(
        "Saved API key {} to {}",
        cfg.api_key.as_deref().map(redact_key).unwrap_or_default(),
        path.display()
    );

    Ok(())
}

fn coordinator_from_config() -> anyhow::Result<RequestCoordinator> {
    let cfg = Config::load()?;
    debug!(config = ?cfg, "loaded configuration");

    let client = provider::client_from_config(&cfg)?;
    Ok(RequestCoordinator::new(client))
}

async fn show(location: String, json: bool) -> anyhow::Result<()> {
    let coordinator = coordinator_from_config()?;

    coordinator.subscribe(move |outcome| match outcome {
        FetchOutcome::Pending if !json => eprintln!("{}", render::LOADING),
        FetchOutcome::Succeeded(snapshot) if json => match serde_json::to_string_pretty(&**snapshot) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("Failed to encode snapshot: {err}"),
        },
        FetchOutcome::Succeeded(snapshot) => println!("{}", render::snapshot(snapshot)),
        _ => {}
    });

    coordinator.fetch(location).await?;

    if let FetchOutcome::Failed(message) = coordinator.current() {
        bail!(message);
    }

    Ok(())
}

async fn search() -> anyhow::Result<()> {
    let coordinator = coordinator_from_config()?;

    coordinator.subscribe(|outcome| {
        if let Some(text) = render::outcome(outcome) {
            println!("{text}");
        }
    });

    while let Some(query) = Text::new("Search for any location:")
        .prompt_skippable()
        .context("Failed to read location")?
    {
        coordinator.fetch(query).await?;
    }

    Ok(())
}

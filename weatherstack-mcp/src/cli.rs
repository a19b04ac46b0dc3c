use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{error, info};
use weatherstack_core::{
    ApiError, Config, DateSpec, Query, WeatherPayload, WeatherProvider, config::DEFAULT_BASE_URL,
    provider_from_config,
};

use crate::{server::WeatherServer, tools::API_ERROR_TAG};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherstack-mcp", version, about = "Weatherstack MCP server")]
pub struct Cli {
    /// Weatherstack access key; overrides the config file.
    #[arg(long, global = true, env = "WEATHERSTACK_API_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// API origin; overrides the config file.
    #[arg(long, global = true, env = "WEATHERSTACK_BASE_URL")]
    base_url: Option<String>,

    /// Defaults to `serve`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run as an MCP stdio server (for use in mcp.json).
    Serve,

    /// Store the access key (and optionally the API origin) in the config file.
    Configure,

    /// Print current weather for a location as JSON.
    Current {
        /// City name, ZIP code, "lat,lon", IP address or "fetch:ip".
        query: String,
    },

    /// Print historical weather for a location as JSON.
    Historical {
        /// City name, ZIP code, "lat,lon", IP address or "fetch:ip".
        query: String,

        /// Date in YYYY-MM-DD format; repeat for several dates.
        #[arg(long = "date")]
        dates: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { access_key, base_url, command } = self;
        let stored = Config::load()?;

        match command.unwrap_or(Command::Serve) {
            Command::Configure => configure(stored),
            Command::Serve => serve(stored.with_overrides(access_key, base_url)).await,
            Command::Current { query } => {
                let config = stored.with_overrides(access_key, base_url);
                let provider = provider_from_config(&config);
                let payload = provider
                    .current(&Query::from(query), &config.credentials()?)
                    .await
                    .map_err(tagged)?;
                print_json(&payload)
            }
            Command::Historical { query, dates } => {
                let config = stored.with_overrides(access_key, base_url);
                let provider = provider_from_config(&config);
                let payload = provider
                    .historical(
                        &Query::from(query),
                        &DateSpec::from_dates(&dates),
                        &config.credentials()?,
                    )
                    .await
                    .map_err(tagged)?;
                print_json(&payload)
            }
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let credentials = config.credentials()?;
    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config));

    info!(base_url = config.base_url(), "Starting Weatherstack MCP stdio server");

    let service = WeatherServer::new(provider, credentials)
        .serve(stdio())
        .await
        .inspect_err(|e| error!("serving error: {:?}", e))?;

    service.waiting().await?;
    info!("MCP stdio server session ended");
    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let key = Password::new("Weatherstack access key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read access key")?;

    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Access key must not be empty."));
    }
    config.set_access_key(key.to_string());

    let base_url = Text::new("API base URL:")
        .with_default(config.base_url())
        .prompt()
        .context("Failed to read API base URL")?;
    config.base_url = (base_url != DEFAULT_BASE_URL).then_some(base_url);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn tagged(err: ApiError) -> anyhow::Error {
    anyhow!("{API_ERROR_TAG} {err}")
}

fn print_json(payload: &WeatherPayload) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(payload).context("Failed to render response")?;
    println!("{text}");
    Ok(())
}

//! Binary crate for the `weatherstack-mcp` server.
//!
//! This crate focuses on:
//! - Exposing Weatherstack lookups as MCP tools over stdio
//! - Parsing CLI arguments and interactive configuration
//! - One-shot lookups printed as JSON

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod server;
#[cfg(test)]
mod testing;
mod tools;

const DEFAULT_LOG_FILTER: &str = "weatherstack_mcp=info,weatherstack_core=info,rmcp=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP stdio channel.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

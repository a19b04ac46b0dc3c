//! Core library for the Weatherstack MCP server.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The request executor that talks to the Weatherstack HTTP API
//! - The normalized error every upstream failure collapses into
//!
//! It is used by `weatherstack-mcp`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::ApiError;
pub use model::{Credentials, DateSpec, Endpoint, Query, WeatherPayload};
pub use provider::{WeatherProvider, provider_from_config, weatherstack::WeatherstackProvider};

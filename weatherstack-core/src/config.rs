use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::Credentials;

/// Production origin of the Weatherstack API.
pub const DEFAULT_BASE_URL: &str = "http://api.weatherstack.com";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// access_key = "..."
/// base_url = "http://api.weatherstack.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Weatherstack access key.
    pub access_key: Option<Credentials>,

    /// Override for the API origin; defaults to [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherstack", "weatherstack-mcp")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply values given on the command line or in the environment.
    /// `None` leaves the stored value untouched.
    pub fn with_overrides(mut self, access_key: Option<String>, base_url: Option<String>) -> Self {
        if let Some(key) = access_key {
            self.access_key = Some(Credentials::new(key));
        }
        if let Some(url) = base_url {
            self.base_url = Some(url);
        }
        self
    }

    pub fn set_access_key(&mut self, access_key: String) {
        self.access_key = Some(Credentials::new(access_key));
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn credentials(&self) -> Result<Credentials> {
        self.access_key.clone().filter(|c| !c.expose().is_empty()).ok_or_else(|| {
            anyhow!(
                "No Weatherstack access key configured.\n\
                 Hint: run `weatherstack-mcp configure` or set WEATHERSTACK_API_KEY."
            )
        })
    }
}

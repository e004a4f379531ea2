#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for ghfetch
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/ghfetch/config.toml)
//! - Environment variables
//! - CLI flags

use ghfetch_errors::{ConfigError, Error};
use ghfetch_types::{ColorChoice, DEFAULT_TOKEN_ENV};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub color: ColorChoice,
}

/// GitHub endpoints and credential source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Host that serves repository and release download URLs
    #[serde(default = "default_web_url")]
    pub web_url: String,
    /// REST API root
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_chunk_timeout")]
    pub chunk_timeout: u64, // seconds
    /// Connection-level retries inside the HTTP client; downloads themselves never retry
    #[serde(default)]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64, // seconds
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            web_url: default_web_url(),
            api_url: default_api_url(),
            token_env: default_token_env(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            chunk_timeout: default_chunk_timeout(),
            retries: 0,
            retry_delay: default_retry_delay(),
            user_agent: None,
        }
    }
}

// Default value functions for serde
fn default_web_url() -> String {
    "https://github.com".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_timeout() -> u64 {
    600 // 10 minutes for large release assets
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_chunk_timeout() -> u64 {
    30
}

fn default_retry_delay() -> u64 {
    1
}

impl GitHubConfig {
    /// Parsed web host URL
    ///
    /// # Errors
    ///
    /// Returns an error if `web_url` is not an absolute http(s) URL.
    pub fn web_url(&self) -> Result<Url, Error> {
        parse_base_url("github.web_url", &self.web_url)
    }

    /// Parsed API root URL
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` is not an absolute http(s) URL.
    pub fn api_url(&self) -> Result<Url, Error> {
        parse_base_url("github.api_url", &self.api_url)
    }
}

impl NetworkConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    #[must_use]
    pub fn chunk_timeout(&self) -> Duration {
        Duration::from_secs(self.chunk_timeout)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay)
    }
}

fn parse_base_url(field: &str, value: &str) -> Result<Url, Error> {
    let invalid = || ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(invalid().into()),
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("ghfetch").join("config.toml"))
    }

    /// Directory debug log files are written to
    #[must_use]
    pub fn logs_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("ghfetch")
            .join("logs")
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // GHFETCH_COLOR
        if let Ok(color) = std::env::var("GHFETCH_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "GHFETCH_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // GHFETCH_GITHUB_URL
        if let Ok(web_url) = std::env::var("GHFETCH_GITHUB_URL") {
            parse_base_url("GHFETCH_GITHUB_URL", &web_url)?;
            self.github.web_url = web_url;
        }

        // GHFETCH_GITHUB_API_URL
        if let Ok(api_url) = std::env::var("GHFETCH_GITHUB_API_URL") {
            parse_base_url("GHFETCH_GITHUB_API_URL", &api_url)?;
            self.github.api_url = api_url;
        }

        // GHFETCH_TOKEN_ENV
        if let Ok(token_env) = std::env::var("GHFETCH_TOKEN_ENV") {
            if token_env.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "GHFETCH_TOKEN_ENV".to_string(),
                    value: token_env,
                }
                .into());
            }
            self.github.token_env = token_env;
        }

        // GHFETCH_TIMEOUT
        if let Ok(timeout) = std::env::var("GHFETCH_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "GHFETCH_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        // GHFETCH_RETRIES
        if let Ok(retries) = std::env::var("GHFETCH_RETRIES") {
            self.network.retries = retries.parse().map_err(|_| ConfigError::InvalidValue {
                field: "GHFETCH_RETRIES".to_string(),
                value: retries,
            })?;
        }

        Ok(())
    }

    /// Check that every URL in the configuration parses
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), Error> {
        self.github.web_url()?;
        self.github.api_url()?;
        Ok(())
    }
}

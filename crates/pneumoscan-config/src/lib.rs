//! Configuration loading for Pneumoscan.
//! Reads pneumoscan.toml from the current directory or the path in PNEUMOSCAN_CONFIG.
//! Every field has a default, so a missing file yields the stock local setup.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "PNEUMOSCAN_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "pneumoscan.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Upper bound on an uploaded request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_bind()             -> String { "127.0.0.1:3000".to_string() }
fn default_max_upload_bytes() -> usize  { 25 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Where the external inference service lives. The two endpoints may sit on different hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_analyze_url")]
    pub analyze_url: String,
    #[serde(default = "default_chat_url")]
    pub chat_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_analyze_url()  -> String { "http://localhost:5000".to_string() }
fn default_chat_url()     -> String { "http://127.0.0.1:5000".to_string() }
fn default_timeout_secs() -> u64    { 120 }

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            analyze_url: default_analyze_url(),
            chat_url: default_chat_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.bind))
            })
    }
}

impl Config {
    /// Load configuration from pneumoscan.toml.
    /// Checks PNEUMOSCAN_CONFIG env var first, then current directory.
    /// Falls back to defaults when the default file is absent; an explicitly
    /// configured path that does not exist is an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(
            std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from),
            Path::new(DEFAULT_CONFIG_FILE),
        )
    }

    /// An explicit path must exist; the default path falls back to built-in defaults.
    fn load_or_default(
        explicit: Option<PathBuf>,
        default_path: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(&path);
        }
        if default_path.exists() {
            return Self::load_from(default_path);
        }
        tracing::info!("No {} found, using defaults", default_path.display());
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind_addr()?;

        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_upload_bytes must be positive".into()));
        }
        if self.inference.timeout_secs == 0 {
            return Err(ConfigError::Invalid("inference.timeout_secs must be positive".into()));
        }

        for (key, url) in [
            ("inference.analyze_url", &self.inference.analyze_url),
            ("inference.chat_url", &self.inference.chat_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be an http(s) URL, got {url}"
                )));
            }
        }
        Ok(())
    }
}

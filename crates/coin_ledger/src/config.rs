//! Server configuration.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::TokenTable;

/// Environment variable that overrides [`ServerConfig::database_url`].
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Configuration for the ledger HTTP server.
#[derive(Clone, Getters, Deserialize)]
pub struct ServerConfig {
    /// SQLite database path.
    #[serde(default = "default_database_url")]
    database_url: String,

    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Bearer token to user id.
    #[serde(default)]
    tokens: HashMap<String, i32>,
}

fn default_database_url() -> String {
    "coin_ledger.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            host: default_host(),
            port: default_port(),
            tokens: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl ServerConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        debug!("Loading config from file");
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;

        info!(?config, "Config loaded successfully");
        Ok(config)
    }

    /// Applies `DATABASE_URL` from the environment, if set.
    #[instrument(skip(self))]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(DATABASE_URL_VAR) {
            debug!(database_url = %url, "Database URL overridden from environment");
            self.database_url = url;
        }
        self
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if host and port do not form an address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::new(format!("Invalid bind address: {}", e)))
    }

    /// Token table for the bearer authenticator.
    pub fn token_table(&self) -> TokenTable {
        TokenTable::new(self.tokens.clone())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

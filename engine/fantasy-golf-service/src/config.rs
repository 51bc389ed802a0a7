//! Service configuration management
//!
//! Values come from the built-in defaults, then an optional TOML file, then
//! `FANTASY_GOLF__<SECTION>__<KEY>` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use golf_data_fetcher::FetcherConfig;
use roster_engine::{RosterRules, RulesError};
use roster_gateway::{GatewayConfig, ServerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "FANTASY_GOLF";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Restricted-replacement mode at startup
    pub restricted_mode: bool,

    /// REST server configuration
    pub server: ServerConfig,

    /// Roster caps
    pub rules: RosterRules,

    /// Cached data files
    pub data: DataConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where the cached feed files live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Data directory for the service
    pub dir: PathBuf,

    pub rankings_file: String,

    pub schedule_file: String,

    /// Fetch feeds with no cached file before loading
    pub fetch_missing: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("Invalid server port: {0}")]
    InvalidPort(u16),

    #[error("Invalid server address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },

    #[error("Invalid roster rules: {0}")]
    Rules(#[from] RulesError),
}

impl Default for DataConfig {
    fn default() -> Self {
        let cache = FetcherConfig::default().cache;
        Self {
            dir: cache.data_dir,
            rankings_file: cache.rankings_file,
            schedule_file: cache.schedule_file,
            fetch_missing: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl ServiceConfig {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            restricted_mode: self.restricted_mode,
            server: self.server.clone(),
            rules: self.rules,
        }
    }

    pub fn rankings_path(&self) -> PathBuf {
        self.data.dir.join(&self.data.rankings_file)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.data.dir.join(&self.data.schedule_file)
    }

    /// Fetcher settings from the environment, writing into this data directory
    pub fn fetcher_config(&self) -> Result<FetcherConfig> {
        let mut fetcher = FetcherConfig::from_env().context("Invalid fetcher configuration")?;
        fetcher.cache.data_dir = self.data.dir.clone();
        fetcher.cache.rankings_file = self.data.rankings_file.clone();
        fetcher.cache.schedule_file = self.data.schedule_file.clone();
        Ok(fetcher)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(ConfigError::InvalidLogLevel(other.to_string())),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" => {}
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        }

        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort(self.server.port));
        }

        if self.gateway_config().server_addr().is_err() {
            return Err(ConfigError::InvalidAddress {
                host: self.server.host.clone(),
                port: self.server.port,
            });
        }

        self.rules.validate()?;
        Ok(())
    }
}

/// Load configuration from an optional file and the environment
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    load_with_prefix(path, ENV_PREFIX)
}

fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<ServiceConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder = builder.add_source(Environment::with_prefix(prefix).separator("__").try_parsing(true));

    let config: ServiceConfig = builder
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    config.validate()?;
    Ok(config)
}

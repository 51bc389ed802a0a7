//! Fantasy Golf Service Library
//!
//! Wires the golfer registry, the data fetcher and the roster gateway into
//! one process: configuration loading, logging setup, startup data loading
//! and graceful shutdown.

use anyhow::{Context, Result};
use std::path::Path;

pub mod config;
pub mod logging;
pub mod service;
pub mod signals;

pub use config::{ConfigError, DataConfig, LoggingConfig, ServiceConfig};
pub use logging::initialize_logging;
pub use service::ServiceState;
pub use signals::setup_signal_handlers;

/// Load configuration from an optional file and environment variables
pub fn load_configuration(path: Option<&Path>) -> Result<ServiceConfig> {
    config::load_config(path).context("Failed to load service configuration")
}

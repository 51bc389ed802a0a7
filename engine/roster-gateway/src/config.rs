//! Configuration for the RosterGateway

use roster_engine::{RosterRules, RulesError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main configuration for the RosterGateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Whether restricted-replacement mode is on at startup
    pub restricted_mode: bool,

    /// Server configuration
    pub server: ServerConfig,

    /// Roster caps applied to every participant
    pub rules: RosterRules,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: crate::DEFAULT_PORT }
    }
}

impl GatewayConfig {
    /// Get the server address
    pub fn server_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        self.rules.validate()
    }
}

//! RosterGateway - REST API for golfer pool browsing and roster picking
//!
//! Participants join groups and build one roster per group, edited through
//! the rules enforced by `roster-engine`. Golfer data comes from a
//! `PlayerRegistry` shared by all groups and can be refreshed from the live
//! feeds at runtime.

pub mod config;
pub mod error;
pub mod feeds;
pub mod rest_api;
pub mod state;

pub use config::{GatewayConfig, ServerConfig};
pub use error::{GatewayError, GatewayResult};
pub use feeds::FeedSource;
pub use rest_api::create_routes;
pub use state::GatewayState;

/// Version of the RosterGateway API
pub const VERSION: &str = "0.1.0";

/// Default REST port
pub const DEFAULT_PORT: u16 = 5001;

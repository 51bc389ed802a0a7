//! Golf Data Fetcher
//!
//! Pulls the official world golf rankings and the PGA tour schedule from the
//! sports-data API and caches them as JSON files for the player registry.
//! One attempt per request; callers decide what to do on failure.

use thiserror::Error;

pub mod config;
pub mod fetcher;

pub use config::FetcherConfig;
pub use fetcher::{Feed, GolfDataFetcher};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

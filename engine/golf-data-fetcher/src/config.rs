use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::FetchError;

/// Configuration for the golf data fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Sports-data API configuration
    pub api: ApiConfig,

    /// Where cached JSON files live
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL
    pub base_url: String,

    /// Access level segment (e.g., "trial")
    pub access_level: String,

    /// Season year for rankings and schedule
    pub season: i32,

    /// API key environment variable name
    pub api_key_env: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the cached files
    pub data_dir: PathBuf,

    pub rankings_file: String,

    pub schedule_file: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.sportradar.com/golf".to_string(),
                access_level: "trial".to_string(),
                season: 2025,
                api_key_env: "SPORTRADAR_API_KEY".to_string(),
                timeout_secs: 10,
            },
            cache: CacheConfig {
                data_dir: PathBuf::from("./data"),
                rankings_file: "world_rankings.json".to_string(),
                schedule_file: "tournament_schedule.json".to_string(),
            },
        }
    }
}

impl FetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, FetchError> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("GOLF_API_BASE_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(access_level) = std::env::var("GOLF_API_ACCESS_LEVEL") {
            config.api.access_level = access_level;
        }

        if let Ok(season) = std::env::var("GOLF_SEASON") {
            config.api.season = season.parse().map_err(|_| FetchError::InvalidConfig {
                message: format!("Invalid GOLF_SEASON: {season}"),
            })?;
        }

        if let Ok(data_dir) = std::env::var("GOLF_DATA_DIR") {
            config.cache.data_dir = PathBuf::from(data_dir);
        }

        Ok(config)
    }

    /// Get the API key from environment
    pub fn api_key(&self) -> Result<String, FetchError> {
        std::env::var(&self.api.api_key_env).map_err(|_| FetchError::InvalidConfig {
            message: format!("{} not set", self.api.api_key_env),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Official world golf ranking endpoint
    pub fn rankings_url(&self) -> String {
        format!(
            "{}/{}/v3/en/players/wgr/{}/rankings.json",
            self.api.base_url, self.api.access_level, self.api.season
        )
    }

    /// PGA tour schedule endpoint
    pub fn schedule_url(&self) -> String {
        format!(
            "{}/{}/pga/v3/en/{}/tournaments/schedule.json",
            self.api.base_url, self.api.access_level, self.api.season
        )
    }

    pub fn rankings_path(&self) -> PathBuf {
        self.cache.data_dir.join(&self.cache.rankings_file)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.cache.data_dir.join(&self.cache.schedule_file)
    }
}

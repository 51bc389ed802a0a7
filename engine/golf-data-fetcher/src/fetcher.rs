use crate::config::FetcherConfig;
use crate::FetchError;
use reqwest::Client;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which cached feed a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Rankings,
    Schedule,
}

impl Feed {
    fn label(self) -> &'static str {
        match self {
            Feed::Rankings => "world rankings",
            Feed::Schedule => "tournament schedule",
        }
    }
}

/// Downloads the rankings and schedule feeds into the local cache
pub struct GolfDataFetcher {
    config: FetcherConfig,
    client: Client,
    api_key: String,
}

impl GolfDataFetcher {
    /// Create a new fetcher instance
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let api_key = config.api_key()?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { config, client, api_key })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch the world golf rankings
    pub async fn fetch_rankings(&self) -> Result<Value, FetchError> {
        self.fetch(Feed::Rankings).await
    }

    /// Fetch the tournament schedule
    pub async fn fetch_schedule(&self) -> Result<Value, FetchError> {
        self.fetch(Feed::Schedule).await
    }

    /// Fetch the rankings and overwrite the cached file
    pub async fn refresh_rankings(&self) -> Result<Value, FetchError> {
        self.refresh(Feed::Rankings).await
    }

    /// Fetch the schedule and overwrite the cached file
    pub async fn refresh_schedule(&self) -> Result<Value, FetchError> {
        self.refresh(Feed::Schedule).await
    }

    /// Refresh both feeds concurrently
    pub async fn refresh_all(&self) -> Result<(Value, Value), FetchError> {
        tokio::try_join!(self.refresh_rankings(), self.refresh_schedule())
    }

    /// Fetch only the feeds with no cached file. Failures are logged and
    /// skipped so startup can continue with whatever is cached.
    pub async fn ensure_cached(&self) -> Vec<Feed> {
        let mut fetched = Vec::new();
        for feed in [Feed::Rankings, Feed::Schedule] {
            if tokio::fs::try_exists(self.cache_path(feed)).await.unwrap_or(false) {
                continue;
            }
            match self.refresh(feed).await {
                Ok(_) => fetched.push(feed),
                Err(e) => warn!("Could not fetch initial {} data: {}", feed.label(), e),
            }
        }
        fetched
    }

    async fn fetch(&self, feed: Feed) -> Result<Value, FetchError> {
        let url = match feed {
            Feed::Rankings => self.config.rankings_url(),
            Feed::Schedule => self.config.schedule_url(),
        };
        info!("Fetching {} from: {}", feed.label(), url);

        let response =
            self.client.get(&url).query(&[("api_key", self.api_key.as_str())]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status: status.as_u16() });
        }

        let data: Value = response.json().await?;
        info!("Successfully fetched {}", feed.label());
        Ok(data)
    }

    async fn refresh(&self, feed: Feed) -> Result<Value, FetchError> {
        let data = self.fetch(feed).await?;
        write_cache(&self.cache_path(feed), &data).await?;
        Ok(data)
    }

    fn cache_path(&self, feed: Feed) -> PathBuf {
        match feed {
            Feed::Rankings => self.config.rankings_path(),
            Feed::Schedule => self.config.schedule_path(),
        }
    }
}

/// Write pretty JSON, creating the cache directory if needed
pub async fn write_cache(path: &Path, data: &Value) -> Result<(), FetchError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(data)?;
    tokio::fs::write(path, json).await?;
    info!("Saved {:?}", path);
    Ok(())
}

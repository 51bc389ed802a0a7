//! Live data feeds behind the refresh endpoints

use async_trait::async_trait;
use golf_data_fetcher::{FetchError, GolfDataFetcher};
use player_registry::{RankingsFeed, TournamentSchedule};

/// Source of fresh rankings and schedule data
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn rankings(&self) -> Result<RankingsFeed, FetchError>;

    async fn schedule(&self) -> Result<TournamentSchedule, FetchError>;
}

/// Each call downloads the feed and rewrites its cached file
#[async_trait]
impl FeedSource for GolfDataFetcher {
    async fn rankings(&self) -> Result<RankingsFeed, FetchError> {
        let data = self.refresh_rankings().await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn schedule(&self) -> Result<TournamentSchedule, FetchError> {
        let data = self.refresh_schedule().await?;
        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golf_data_fetcher::FetcherConfig;
    use std::collections::HashMap;
    use warp::Filter;

    const KEY_ENV: &str = "ROSTER_GATEWAY_FEEDS_TEST_KEY";

    /// Serve canned feeds on the sports-data URL layout
    async fn feed_server() -> std::net::SocketAddr {
        let rankings = warp::path!("trial" / "v3" / "en" / "players" / "wgr" / i32 / "rankings.json")
            .and(warp::query::<HashMap<String, String>>())
            .map(|_season: i32, params: HashMap<String, String>| {
                assert_eq!(params.get("api_key").map(String::as_str), Some("secret"));
                warp::reply::json(&serde_json::json!({
                    "players": [
                        { "id": "a1", "first_name": "Scottie", "last_name": "Scheffler",
                          "country": "UNITED STATES", "rank": 1, "statistics": { "avg_points": 16.5 } }
                    ]
                }))
            });
        let schedule = warp::path!("trial" / "pga" / "v3" / "en" / i32 / "tournaments" / "schedule.json")
            .map(|_season: i32| {
                warp::reply::json(&serde_json::json!({
                    "tournaments": [{ "id": "t1", "name": "The Open", "status": "scheduled" }]
                }))
            });

        let (addr, server) = warp::serve(rankings.or(schedule)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    fn fetcher_for(addr: std::net::SocketAddr, dir: &std::path::Path) -> GolfDataFetcher {
        std::env::set_var(KEY_ENV, "secret");
        let mut config = FetcherConfig::default();
        config.api.base_url = format!("http://{addr}");
        config.api.api_key_env = KEY_ENV.to_string();
        config.cache.data_dir = dir.to_path_buf();
        GolfDataFetcher::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_fetcher_parses_and_caches_feeds() {
        let addr = feed_server().await;
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher_for(addr, dir.path());

        let rankings = fetcher.rankings().await.unwrap();
        assert_eq!(rankings.players.len(), 1);
        assert!(dir.path().join("world_rankings.json").exists());

        let schedule = fetcher.schedule().await.unwrap();
        assert_eq!(schedule.tournaments[0].id, "t1");
        assert!(dir.path().join("tournament_schedule.json").exists());
    }

    #[tokio::test]
    async fn test_fetcher_surfaces_upstream_errors() {
        let addr = feed_server().await;
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher_config = fetcher_for(addr, dir.path()).config().clone();
        fetcher_config.api.access_level = "production".to_string();
        let fetcher = GolfDataFetcher::new(fetcher_config).unwrap();

        let err = fetcher.rankings().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(!dir.path().join("world_rankings.json").exists());
    }
}

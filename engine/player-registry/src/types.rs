use roster_engine::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Name given to feed entries with no usable name; such entries are dropped
pub const UNKNOWN_PLAYER: &str = "Unknown Player";

/// World golf ranking file as cached from the sports-data feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingsFeed {
    pub id: Option<String>,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub status: Option<String>,
    pub season: Option<i32>,
    pub players: Vec<RankedPlayer>,
}

/// One ranked golfer in the feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankedPlayer {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub rank: Option<u32>,
    pub prior_rank: Option<u32>,
    pub abbr_name: Option<String>,
    pub statistics: Option<RankingStatistics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingStatistics {
    pub events_played: Option<u32>,
    pub avg_points: Option<f64>,
    pub points: Option<f64>,
    pub points_lost: Option<f64>,
    pub points_gained: Option<f64>,
}

impl RankedPlayer {
    /// "First Last", trimmed, or [`UNKNOWN_PLAYER`]
    pub fn display_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim();
        if name.is_empty() {
            UNKNOWN_PLAYER.to_string()
        } else {
            name.to_string()
        }
    }

    /// Convert into a pickable golfer. The points cost is the average
    /// ranking points, clamped to a finite non-negative number.
    pub fn to_player(&self) -> Player {
        let name = self.display_name();
        let raw_points = self.statistics.as_ref().and_then(|s| s.avg_points).unwrap_or(0.0);
        let points = if raw_points.is_finite() && raw_points >= 0.0 {
            raw_points
        } else {
            warn!("Clamping invalid points cost {} for {} to 0", raw_points, name);
            0.0
        };

        Player::new(
            PlayerId::new(self.id.clone().unwrap_or_else(|| "unknown".to_string())),
            name,
            self.country.clone().unwrap_or_else(|| "Unknown".to_string()),
            self.rank.unwrap_or(0),
            points,
        )
    }
}

/// Errors from loading or querying the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Player '{0}' not found in registry")]
    PlayerNotFound(PlayerId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

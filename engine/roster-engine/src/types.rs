use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Golfer identifier as issued by the ranking feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle status of a golfer in the current event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerStatus {
    #[default]
    Active,
    Withdrawn,
    ReplacementAvailable,
}

/// A golfer that can be picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Display name (e.g., "Scottie Scheffler")
    pub name: String,

    pub country: String,

    /// World ranking, 1 = best
    pub rank: u32,

    /// Budget consumed when selected
    pub points: f64,

    #[serde(default)]
    pub status: PlayerStatus,

    /// Whether the golfer has already teed off
    #[serde(default)]
    pub has_started: bool,
}

impl Player {
    /// Create an active golfer who has not started
    pub fn new(
        id: impl Into<PlayerId>,
        name: impl Into<String>,
        country: impl Into<String>,
        rank: u32,
        points: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: country.into(),
            rank,
            points,
            status: PlayerStatus::Active,
            has_started: false,
        }
    }

    pub fn with_started(mut self, has_started: bool) -> Self {
        self.has_started = has_started;
        self
    }

    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }
}

/// A player paired with the moment they were picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub player: Player,
    pub selected_at: DateTime<Utc>,
}

impl SelectionEvent {
    /// Tag a selection with the current time
    pub fn now(player: Player) -> Self {
        Self { player, selected_at: Utc::now() }
    }

    pub fn id(&self) -> &PlayerId {
        &self.player.id
    }

    pub fn points(&self) -> f64 {
        self.player.points
    }
}

use crate::types::{RankingsFeed, RegistryError, UNKNOWN_PLAYER};
use roster_engine::{filter_and_sort, Player, PlayerId, PlayerStatus, PoolQuery};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Player Registry - the candidate pool for roster selection
///
/// Holds golfers in world-ranking order and indexes them by id.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    /// Golfers sorted by rank ascending
    players: Vec<Player>,

    /// Map from player id to index in `players`
    index_by_id: HashMap<PlayerId, usize>,
}

impl PlayerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cached world rankings JSON file
    pub async fn load_rankings_from_file<P: AsRef<Path>>(
        file_path: P,
    ) -> Result<Self, RegistryError> {
        info!("Loading world rankings from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let feed: RankingsFeed = serde_json::from_str(&json_content)?;

        info!("Loaded {} ranked players from file", feed.players.len());
        let registry = Self::from_feed(&feed);
        info!("Registry holds {} pickable players", registry.len());
        Ok(registry)
    }

    /// Build from a parsed feed, dropping unnamed and duplicate entries
    pub fn from_feed(feed: &RankingsFeed) -> Self {
        let players: Vec<Player> = feed
            .players
            .iter()
            .map(|ranked| ranked.to_player())
            .filter(|player| player.name != UNKNOWN_PLAYER)
            .collect();
        Self::from_players(players)
    }

    /// Build from already-converted golfers
    pub fn from_players(mut players: Vec<Player>) -> Self {
        players.sort_by_key(|p| p.rank);

        let mut registry = Self::new();
        for player in players {
            if registry.index_by_id.contains_key(&player.id) {
                warn!("Skipping duplicate player id {} ({})", player.id, player.name);
                continue;
            }
            registry.index_by_id.insert(player.id.clone(), registry.players.len());
            registry.players.push(player);
        }
        registry
    }

    /// Get a golfer by id
    pub fn get(&self, id: &PlayerId) -> Result<&Player, RegistryError> {
        self.index_by_id
            .get(id)
            .map(|&i| &self.players[i])
            .ok_or_else(|| RegistryError::PlayerNotFound(id.clone()))
    }

    /// All golfers in rank order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Search and sort the pool
    pub fn query(&self, query: &PoolQuery) -> Vec<&Player> {
        filter_and_sort(&self.players, query)
    }

    /// Record a withdrawal or tee-off for a golfer
    pub fn set_player_state(
        &mut self,
        id: &PlayerId,
        status: Option<PlayerStatus>,
        has_started: Option<bool>,
    ) -> Result<&Player, RegistryError> {
        let index =
            *self.index_by_id.get(id).ok_or_else(|| RegistryError::PlayerNotFound(id.clone()))?;
        let player = &mut self.players[index];
        if let Some(status) = status {
            player.status = status;
        }
        if let Some(has_started) = has_started {
            player.has_started = has_started;
        }
        info!(
            "Updated {} ({}): status={:?}, has_started={}",
            player.id, player.name, player.status, player.has_started
        );
        Ok(player)
    }

    /// Keep operator updates (status, tee-off) from `previous` for golfers
    /// still in the pool. Returns how many golfers carried state over.
    pub fn carry_state_from(&mut self, previous: &PlayerRegistry) -> usize {
        let mut carried = 0;
        for player in &mut self.players {
            if let Ok(old) = previous.get(&player.id) {
                if old.status != player.status || old.has_started != player.has_started {
                    player.status = old.status;
                    player.has_started = old.has_started;
                    carried += 1;
                }
            }
        }
        carried
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

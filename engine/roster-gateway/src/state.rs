//! Shared state behind the REST handlers
//!
//! Each member of a group owns exactly one roster in that group. Rosters sit
//! in a `DashMap` keyed by (group, participant), so an edit holds the write
//! guard for that one roster and different rosters never contend with each
//! other. A roster entry only appears once a pick has been accepted.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use player_registry::{PlayerRegistry, TournamentSchedule};
use roster_engine::{
    Group, NewGroup, Player, PlayerId, Roster, RosterError, RosterRules, RosterSelector,
    SelectionEvent, SubmitBlocker,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::feeds::FeedSource;

type RosterKey = (Uuid, String);

pub struct GatewayState {
    registry: RwLock<PlayerRegistry>,
    schedule: RwLock<TournamentSchedule>,
    groups: DashMap<Uuid, Group>,
    rosters: DashMap<RosterKey, Roster>,
    rules: RosterRules,
    restricted_mode: AtomicBool,
    feeds: Option<Arc<dyn FeedSource>>,
}

impl GatewayState {
    pub fn new(registry: PlayerRegistry, schedule: TournamentSchedule, rules: RosterRules) -> Self {
        Self {
            registry: RwLock::new(registry),
            schedule: RwLock::new(schedule),
            groups: DashMap::new(),
            rosters: DashMap::new(),
            rules,
            restricted_mode: AtomicBool::new(false),
            feeds: None,
        }
    }

    /// Build from loaded data and the gateway configuration
    pub fn from_config(
        registry: PlayerRegistry,
        schedule: TournamentSchedule,
        config: &GatewayConfig,
    ) -> Self {
        Self::new(registry, schedule, config.rules).with_restricted_mode(config.restricted_mode)
    }

    pub fn with_restricted_mode(self, enabled: bool) -> Self {
        self.restricted_mode.store(enabled, Ordering::SeqCst);
        self
    }

    /// Enable the refresh operations
    pub fn with_feed_source(mut self, feeds: Arc<dyn FeedSource>) -> Self {
        self.feeds = Some(feeds);
        self
    }

    pub fn can_refresh(&self) -> bool {
        self.feeds.is_some()
    }

    pub fn rules(&self) -> RosterRules {
        self.rules
    }

    /// Selector carrying the current restricted-mode flag
    pub fn selector(&self) -> RosterSelector {
        RosterSelector::new(self.rules).with_restricted_mode(self.restricted_mode())
    }

    pub fn restricted_mode(&self) -> bool {
        self.restricted_mode.load(Ordering::SeqCst)
    }

    pub fn set_restricted_mode(&self, enabled: bool) {
        let previous = self.restricted_mode.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            info!("Restricted-replacement mode {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    pub fn registry(&self) -> parking_lot::RwLockReadGuard<'_, PlayerRegistry> {
        self.registry.read()
    }

    pub fn registry_mut(&self) -> parking_lot::RwLockWriteGuard<'_, PlayerRegistry> {
        self.registry.write()
    }

    pub fn schedule(&self) -> parking_lot::RwLockReadGuard<'_, TournamentSchedule> {
        self.schedule.read()
    }

    /// Current pool entry for a golfer
    pub fn lookup_player(&self, id: &PlayerId) -> GatewayResult<Player> {
        Ok(self.registry().get(id)?.clone())
    }

    pub fn create_group(&self, request: NewGroup) -> GatewayResult<Group> {
        let group = Group::create(request)?;
        info!("{} opened group {} ({})", group.owner, group.name, group.id);
        self.groups.insert(group.id, group.clone());
        Ok(group)
    }

    pub fn group(&self, group_id: Uuid) -> GatewayResult<Group> {
        self.groups
            .get(&group_id)
            .map(|g| g.clone())
            .ok_or(GatewayError::GroupNotFound(group_id))
    }

    /// Every group, oldest first
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.groups.iter().map(|g| g.clone()).collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        groups
    }

    pub fn join_group(&self, group_id: Uuid, username: &str) -> GatewayResult<Group> {
        let mut group = self.groups.get_mut(&group_id).ok_or(GatewayError::GroupNotFound(group_id))?;
        group.join(username)?;
        info!("{} joined group {} ({}/{})", username, group.name, group.members.len(), group.max_members);
        Ok(group.clone())
    }

    fn require_member(&self, group_id: Uuid, participant: &str) -> GatewayResult<()> {
        let group = self.groups.get(&group_id).ok_or(GatewayError::GroupNotFound(group_id))?;
        if !group.is_member(participant) {
            return Err(GatewayError::NotAMember { group_id, username: participant.to_string() });
        }
        Ok(())
    }

    /// A member's roster; members without picks get an empty one
    pub fn roster(&self, group_id: Uuid, participant: &str) -> GatewayResult<Roster> {
        self.require_member(group_id, participant)?;
        Ok(self.roster_snapshot(group_id, participant))
    }

    /// Every member of a group with their roster, in join order
    pub fn member_teams(&self, group_id: Uuid) -> GatewayResult<(Group, Vec<Roster>)> {
        let group = self.group(group_id)?;
        let teams = group.members.iter().map(|m| self.roster_snapshot(group_id, &m.username)).collect();
        Ok((group, teams))
    }

    pub fn roster_snapshot(&self, group_id: Uuid, participant: &str) -> Roster {
        self.rosters
            .get(&(group_id, participant.to_string()))
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn roster_count(&self) -> usize {
        self.rosters.len()
    }

    pub fn add_player(
        &self,
        group_id: Uuid,
        participant: &str,
        player_id: &PlayerId,
    ) -> GatewayResult<SelectionEvent> {
        self.require_member(group_id, participant)?;
        let candidate = self.lookup_player(player_id)?;
        let selector = self.selector();
        let entry = match self.rosters.entry((group_id, participant.to_string())) {
            Entry::Occupied(mut occupied) => selector.add(&candidate, occupied.get_mut())?.clone(),
            Entry::Vacant(vacant) => {
                let mut roster = Roster::new();
                let entry = selector.add(&candidate, &mut roster)?.clone();
                vacant.insert(roster);
                entry
            }
        };
        info!("{} picked {} ({}) in group {}", participant, candidate.name, candidate.id, group_id);
        Ok(entry)
    }

    pub fn remove_player(
        &self,
        group_id: Uuid,
        participant: &str,
        player_id: &PlayerId,
    ) -> GatewayResult<SelectionEvent> {
        self.require_member(group_id, participant)?;
        let selector = self.selector();
        let mut roster = self
            .rosters
            .get_mut(&(group_id, participant.to_string()))
            .ok_or_else(|| RosterError::NotFound { player_id: player_id.clone() })?;
        let removed = selector.remove(player_id, &mut roster)?;
        info!("{} dropped {} in group {}", participant, player_id, group_id);
        Ok(removed)
    }

    pub fn replace_player(
        &self,
        group_id: Uuid,
        participant: &str,
        outgoing_id: &PlayerId,
        incoming_id: &PlayerId,
    ) -> GatewayResult<SelectionEvent> {
        self.require_member(group_id, participant)?;
        let incoming = self.lookup_player(incoming_id)?;
        let selector = self.selector();
        let mut roster = self
            .rosters
            .get_mut(&(group_id, participant.to_string()))
            .ok_or_else(|| RosterError::NotFound { player_id: outgoing_id.clone() })?;
        let outgoing = selector.replace(outgoing_id, &incoming, &mut roster)?;
        info!("{} replaced {} with {} in group {}", participant, outgoing_id, incoming_id, group_id);
        Ok(outgoing)
    }

    pub fn submit_roster(&self, group_id: Uuid, participant: &str) -> GatewayResult<Roster> {
        self.require_member(group_id, participant)?;
        let selector = self.selector();
        let mut roster = self.rosters.get_mut(&(group_id, participant.to_string())).ok_or_else(|| {
            RosterError::NotSubmittable {
                unmet: vec![SubmitBlocker::WrongSize { required: self.rules.max_players, actual: 0 }],
            }
        })?;
        selector.submit(&mut roster)?;
        info!("{} submitted roster at {:.3} pts in group {}", participant, roster.total_points(), group_id);
        Ok(roster.clone())
    }

    fn feed_source(&self) -> GatewayResult<Arc<dyn FeedSource>> {
        self.feeds.clone().ok_or(GatewayError::RefreshUnavailable)
    }

    /// Swap in a freshly fetched registry, keeping operator-set golfer state
    fn install_registry(&self, mut fresh: PlayerRegistry) -> usize {
        let mut registry = self.registry.write();
        let carried = fresh.carry_state_from(&registry);
        *registry = fresh;
        info!("Registry refreshed: {} players, {} with carried-over state", registry.len(), carried);
        registry.len()
    }

    fn install_schedule(&self, fresh: TournamentSchedule) -> usize {
        let count = fresh.tournaments.len();
        *self.schedule.write() = fresh;
        info!("Tournament schedule refreshed: {} tournaments", count);
        count
    }

    /// Re-download the rankings and replace the golfer pool
    pub async fn refresh_rankings(&self) -> GatewayResult<usize> {
        let feeds = self.feed_source()?;
        let feed = feeds.rankings().await?;
        Ok(self.install_registry(PlayerRegistry::from_feed(&feed)))
    }

    /// Re-download the schedule and replace the tournament list
    pub async fn refresh_schedule(&self) -> GatewayResult<usize> {
        let feeds = self.feed_source()?;
        let schedule = feeds.schedule().await?;
        Ok(self.install_schedule(schedule))
    }

    /// Re-download both feeds; nothing is replaced unless both succeed
    pub async fn refresh_all(&self) -> GatewayResult<(usize, usize)> {
        let feeds = self.feed_source()?;
        let (feed, schedule) = tokio::try_join!(feeds.rankings(), feeds.schedule())?;
        let players = self.install_registry(PlayerRegistry::from_feed(&feed));
        let tournaments = self.install_schedule(schedule);
        Ok((players, tournaments))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use golf_data_fetcher::FetchError;
    use player_registry::RankingsFeed;
    use roster_engine::PlayerStatus;

    /// Canned feeds; `None` makes the call fail upstream
    pub(crate) struct StaticFeeds {
        pub rankings: Option<&'static str>,
        pub schedule: Option<&'static str>,
    }

    fn canned<T: serde::de::DeserializeOwned>(body: Option<&'static str>) -> Result<T, FetchError> {
        let body = body.ok_or(FetchError::Status { url: "stub".to_string(), status: 503 })?;
        Ok(serde_json::from_str(body)?)
    }

    #[async_trait]
    impl FeedSource for StaticFeeds {
        async fn rankings(&self) -> Result<RankingsFeed, FetchError> {
            canned(self.rankings)
        }

        async fn schedule(&self) -> Result<TournamentSchedule, FetchError> {
            canned(self.schedule)
        }
    }

    pub(crate) const FRESH_RANKINGS: &str = r#"{ "players": [
        { "id": "p1", "first_name": "Golfer", "last_name": "One", "country": "USA", "rank": 1,
          "statistics": { "avg_points": 6.0 } },
        { "id": "n1", "first_name": "New", "last_name": "Face", "country": "JAPAN", "rank": 2,
          "statistics": { "avg_points": 3.0 } }
    ] }"#;

    pub(crate) const FRESH_SCHEDULE: &str = r#"{ "tournaments": [
        { "id": "t9", "name": "Tour Championship", "status": "scheduled", "start_date": "2025-08-21" },
        { "id": "t8", "name": "BMW Championship", "status": "scheduled", "start_date": "2025-08-14" }
    ] }"#;

    fn state() -> GatewayState {
        let players = (1..=10)
            .map(|i| Player::new(format!("p{i}"), format!("Golfer {i}"), "USA", i, 4.0))
            .collect();
        GatewayState::new(
            PlayerRegistry::from_players(players),
            TournamentSchedule::default(),
            RosterRules::default(),
        )
    }

    fn group_with(state: &GatewayState, members: &[&str]) -> Uuid {
        let group = state
            .create_group(NewGroup {
                name: "Weekend Warriors".to_string(),
                description: "Casual weekend pool".to_string(),
                owner: members[0].to_string(),
                max_members: 12,
                entry_fee: 25.0,
                is_private: false,
            })
            .unwrap();
        for member in &members[1..] {
            state.join_group(group.id, member).unwrap();
        }
        group.id
    }

    #[test]
    fn test_rosters_are_isolated_per_participant() {
        let state = state();
        let group = group_with(&state, &["alice", "bob"]);
        state.add_player(group, "alice", &PlayerId::new("p1")).unwrap();
        state.add_player(group, "bob", &PlayerId::new("p1")).unwrap();

        assert_eq!(state.roster(group, "alice").unwrap().len(), 1);
        assert_eq!(state.roster(group, "bob").unwrap().len(), 1);
        assert_eq!(state.roster_count(), 2);
    }

    #[test]
    fn test_rosters_are_isolated_per_group() {
        let state = state();
        let first = group_with(&state, &["alice"]);
        let second = group_with(&state, &["alice"]);
        state.add_player(first, "alice", &PlayerId::new("p1")).unwrap();

        assert!(state.roster(first, "alice").unwrap().contains(&PlayerId::new("p1")));
        assert!(state.roster(second, "alice").unwrap().is_empty());
    }

    #[test]
    fn test_from_config_applies_rules_and_flag() {
        let mut config = GatewayConfig::default();
        config.restricted_mode = true;
        config.rules.max_players = 2;
        let state = GatewayState::from_config(
            PlayerRegistry::from_players(vec![
                Player::new("a", "A", "USA", 1, 1.0),
                Player::new("b", "B", "USA", 2, 1.0),
                Player::new("c", "C", "USA", 3, 1.0),
            ]),
            TournamentSchedule::default(),
            &config,
        );
        let group = group_with(&state, &["alice"]);

        assert!(state.selector().restricted_mode);
        state.add_player(group, "alice", &PlayerId::new("a")).unwrap();
        state.add_player(group, "alice", &PlayerId::new("b")).unwrap();
        let err = state.add_player(group, "alice", &PlayerId::new("c")).unwrap_err();
        assert!(matches!(err, GatewayError::Roster(RosterError::CapacityExceeded { max_players: 2 })));
    }

    #[test]
    fn test_unknown_player_is_rejected() {
        let state = state();
        let group = group_with(&state, &["alice"]);
        let err = state.add_player(group, "alice", &PlayerId::new("nope")).unwrap_err();
        assert!(matches!(err, GatewayError::PlayerNotFound(_)));
        assert_eq!(state.roster_count(), 0);
    }

    #[test]
    fn test_non_members_cannot_pick() {
        let state = state();
        let group = group_with(&state, &["alice"]);
        let err = state.add_player(group, "mallory", &PlayerId::new("p1")).unwrap_err();
        assert!(matches!(err, GatewayError::NotAMember { .. }));

        let err = state.add_player(Uuid::new_v4(), "alice", &PlayerId::new("p1")).unwrap_err();
        assert!(matches!(err, GatewayError::GroupNotFound(_)));
        assert_eq!(state.roster_count(), 0);
    }

    #[test]
    fn test_rejected_mutations_leave_no_roster_behind() {
        let state = state();
        let members: Vec<String> = (0..200).map(|i| format!("member{i}")).collect();
        let group = state
            .create_group(NewGroup {
                name: "Big Field".to_string(),
                description: "Everyone welcome".to_string(),
                owner: "host".to_string(),
                max_members: 500,
                entry_fee: 0.0,
                is_private: false,
            })
            .unwrap()
            .id;
        for member in &members {
            state.join_group(group, member).unwrap();
        }

        for member in &members {
            let err = state.remove_player(group, member, &PlayerId::new("p1")).unwrap_err();
            assert!(matches!(err, GatewayError::Roster(RosterError::NotFound { .. })));

            let err = state
                .replace_player(group, member, &PlayerId::new("p1"), &PlayerId::new("p2"))
                .unwrap_err();
            assert!(matches!(err, GatewayError::Roster(RosterError::NotFound { .. })));

            let err = state.submit_roster(group, member).unwrap_err();
            match err {
                GatewayError::Roster(RosterError::NotSubmittable { unmet }) => {
                    assert_eq!(unmet, vec![SubmitBlocker::WrongSize { required: 8, actual: 0 }]);
                }
                other => panic!("unexpected error: {other}"),
            }

            assert!(state.add_player(group, member, &PlayerId::new("ghost")).is_err());
            assert!(state.add_player(group, "outsider", &PlayerId::new("p1")).is_err());
        }
        assert_eq!(state.roster_count(), 0);

        state.add_player(group, "member0", &PlayerId::new("p1")).unwrap();
        assert_eq!(state.roster_count(), 1);
    }

    #[test]
    fn test_rejected_first_pick_leaves_no_roster() {
        let state = GatewayState::new(
            PlayerRegistry::from_players(vec![Player::new("big", "Big", "USA", 1, 50.0)]),
            TournamentSchedule::default(),
            RosterRules::default(),
        );
        let group = group_with(&state, &["alice"]);

        let err = state.add_player(group, "alice", &PlayerId::new("big")).unwrap_err();
        assert!(matches!(err, GatewayError::Roster(RosterError::BudgetExceeded { .. })));
        assert_eq!(state.roster_count(), 0);
    }

    #[test]
    fn test_replacement_sees_registry_updates() {
        let state = state().with_restricted_mode(true);
        let group = group_with(&state, &["alice"]);
        state.add_player(group, "alice", &PlayerId::new("p1")).unwrap();
        state.registry_mut().set_player_state(&PlayerId::new("p2"), None, Some(true)).unwrap();

        let err = state
            .replace_player(group, "alice", &PlayerId::new("p1"), &PlayerId::new("p2"))
            .unwrap_err();
        assert!(matches!(err, GatewayError::Roster(RosterError::RestrictedReplacement { .. })));

        state.set_restricted_mode(false);
        state.replace_player(group, "alice", &PlayerId::new("p1"), &PlayerId::new("p2")).unwrap();
        assert!(state.roster(group, "alice").unwrap().contains(&PlayerId::new("p2")));
    }

    #[test]
    fn test_member_teams_follow_join_order() {
        let state = state();
        let group = group_with(&state, &["alice", "bob", "carol"]);
        state.add_player(group, "bob", &PlayerId::new("p3")).unwrap();

        let (group, teams) = state.member_teams(group).unwrap();
        assert_eq!(group.members.len(), 3);
        assert_eq!(group.members[1].username, "bob");
        assert!(teams[0].is_empty());
        assert!(teams[1].contains(&PlayerId::new("p3")));
    }

    #[tokio::test]
    async fn test_refresh_without_feeds_is_unavailable() {
        let state = state();
        assert!(!state.can_refresh());
        assert!(matches!(state.refresh_rankings().await, Err(GatewayError::RefreshUnavailable)));
        assert!(matches!(state.refresh_all().await, Err(GatewayError::RefreshUnavailable)));
    }

    #[tokio::test]
    async fn test_refresh_rankings_keeps_operator_state() {
        let state = state().with_feed_source(Arc::new(StaticFeeds {
            rankings: Some(FRESH_RANKINGS),
            schedule: None,
        }));
        state
            .registry_mut()
            .set_player_state(&PlayerId::new("p1"), Some(PlayerStatus::Withdrawn), Some(true))
            .unwrap();

        assert_eq!(state.refresh_rankings().await.unwrap(), 2);

        let p1 = state.lookup_player(&PlayerId::new("p1")).unwrap();
        assert_eq!(p1.points, 6.0);
        assert_eq!(p1.status, PlayerStatus::Withdrawn);
        assert!(p1.has_started);
        assert!(state.lookup_player(&PlayerId::new("n1")).is_ok());
        assert!(state.lookup_player(&PlayerId::new("p2")).is_err());
    }

    #[tokio::test]
    async fn test_refresh_all_is_all_or_nothing() {
        let state = state().with_feed_source(Arc::new(StaticFeeds {
            rankings: Some(FRESH_RANKINGS),
            schedule: None,
        }));

        let err = state.refresh_all().await.unwrap_err();
        assert!(matches!(err, GatewayError::Fetch(_)));
        assert_eq!(state.registry().len(), 10);

        let state = state.with_feed_source(Arc::new(StaticFeeds {
            rankings: Some(FRESH_RANKINGS),
            schedule: Some(FRESH_SCHEDULE),
        }));
        assert_eq!(state.refresh_all().await.unwrap(), (2, 2));
        assert_eq!(state.schedule().upcoming()[0].id, "t8");
    }
}

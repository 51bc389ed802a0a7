//! REST API endpoints for the RosterGateway
//!
//! This module provides endpoints for browsing the golfer pool and the
//! tournament schedule, for running groups, and for building, editing and
//! submitting each member's roster within a group.

use player_registry::{Tournament, TournamentQuery};
use roster_engine::{
    Group, MemberRole, NewGroup, Player, PlayerId, PlayerStatus, PoolQuery, Roster,
    RosterSelector, RosterState, SelectionEvent,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::Filter;

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

/// Roster view returned by every roster endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RosterResponse {
    pub group_id: Uuid,
    pub participant: String,
    pub players: Vec<SelectionEvent>,
    pub player_count: usize,
    pub max_players: usize,
    pub total_points: f64,
    pub max_points: f64,
    pub remaining_budget: f64,
    pub state: RosterState,
    pub submittable: bool,
    pub submitted_at: Option<String>,
}

impl RosterResponse {
    fn build(group_id: Uuid, participant: &str, roster: &Roster, selector: &RosterSelector) -> Self {
        Self {
            group_id,
            participant: participant.to_string(),
            players: roster.entries().to_vec(),
            player_count: roster.len(),
            max_players: selector.rules.max_players,
            total_points: roster.total_points(),
            max_points: selector.rules.max_points,
            remaining_budget: selector.remaining_budget(roster),
            state: roster.state(&selector.rules),
            submittable: selector.is_submittable(roster),
            submitted_at: roster.submitted_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Pool entry annotated for one participant's roster
#[derive(Debug, Serialize, Deserialize)]
pub struct CandidateResponse {
    #[serde(flatten)]
    pub player: Player,
    pub selected: bool,
    pub can_add: bool,
}

/// Group with its derived figures
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    #[serde(flatten)]
    pub group: Group,
    pub member_count: usize,
    pub is_full: bool,
    pub prize_pool: f64,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            member_count: group.members.len(),
            is_full: group.is_full(),
            prize_pool: group.prize_pool(),
            group,
        }
    }
}

/// One member's team inside a group
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub username: String,
    pub role: MemberRole,
    pub roster: RosterResponse,
}

#[derive(Debug, Serialize)]
pub struct MemberTeamsResponse {
    pub group: GroupResponse,
    pub teams: Vec<TeamResponse>,
}

/// Request body for add and replace
#[derive(Debug, Deserialize, Serialize)]
pub struct PickRequest {
    pub player_id: PlayerId,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JoinRequest {
    pub username: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RestrictedModeBody {
    pub enabled: bool,
}

/// Operator update for a golfer's event state
#[derive(Debug, Deserialize, Serialize)]
pub struct PlayerStateUpdate {
    pub status: Option<PlayerStatus>,
    pub has_started: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournaments: Option<usize>,
    pub timestamp: String,
}

impl RefreshResponse {
    fn new(message: &str, players: Option<usize>, tournaments: Option<usize>) -> Self {
        Self {
            message: message.to_string(),
            players,
            tournaments,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type Reply = warp::reply::WithStatus<warp::reply::Json>;

fn json_ok<T: Serialize>(body: &T) -> Reply {
    warp::reply::with_status(warp::reply::json(body), StatusCode::OK)
}

fn reply_with<T, F>(result: GatewayResult<T>, on_ok: F) -> Result<Reply, Infallible>
where
    F: FnOnce(T) -> Reply,
{
    Ok(match result {
        Ok(value) => on_ok(value),
        Err(err) => err.into_reply(),
    })
}

fn roster_reply(state: &GatewayState, group_id: Uuid, participant: &str, status: StatusCode) -> Reply {
    let roster = state.roster_snapshot(group_id, participant);
    let response = RosterResponse::build(group_id, participant, &roster, &state.selector());
    warp::reply::with_status(warp::reply::json(&response), status)
}

/// Search and sort the golfer pool
pub async fn list_players(query: PoolQuery, state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    let registry = state.registry();
    let players: Vec<&Player> = registry.query(&query);
    Ok(json_ok(&players))
}

/// Get one golfer by id
pub async fn get_player(player_id: String, state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    reply_with(state.lookup_player(&PlayerId::new(player_id)), |player| json_ok(&player))
}

/// Tournaments still open for picks
pub async fn list_tournaments(
    query: TournamentQuery,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    let schedule = state.schedule();
    let tournaments: Vec<&Tournament> = schedule.search(&query);
    Ok(json_ok(&tournaments))
}

pub async fn create_group(body: NewGroup, state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    reply_with(state.create_group(body), |group| {
        warp::reply::with_status(warp::reply::json(&GroupResponse::from(group)), StatusCode::CREATED)
    })
}

pub async fn list_groups(state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    let groups: Vec<GroupResponse> = state.groups().into_iter().map(GroupResponse::from).collect();
    Ok(json_ok(&groups))
}

pub async fn get_group(group_id: Uuid, state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    reply_with(state.group(group_id), |group| json_ok(&GroupResponse::from(group)))
}

pub async fn join_group(
    group_id: Uuid,
    body: JoinRequest,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    reply_with(state.join_group(group_id, &body.username), |group| {
        warp::reply::with_status(warp::reply::json(&GroupResponse::from(group)), StatusCode::CREATED)
    })
}

/// Every member's team with its totals
pub async fn member_teams(group_id: Uuid, state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    let selector = state.selector();
    reply_with(state.member_teams(group_id), |(group, rosters)| {
        let teams = group
            .members
            .iter()
            .zip(rosters.iter())
            .map(|(member, roster)| TeamResponse {
                username: member.username.clone(),
                role: member.role,
                roster: RosterResponse::build(group_id, &member.username, roster, &selector),
            })
            .collect();
        json_ok(&MemberTeamsResponse { group: GroupResponse::from(group), teams })
    })
}

pub async fn get_roster(
    group_id: Uuid,
    participant: String,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    reply_with(state.roster(group_id, &participant), |roster| {
        json_ok(&RosterResponse::build(group_id, &participant, &roster, &state.selector()))
    })
}

/// Pool annotated with selection status for a member
pub async fn list_candidates(
    group_id: Uuid,
    participant: String,
    query: PoolQuery,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    let roster = match state.roster(group_id, &participant) {
        Ok(roster) => roster,
        Err(err) => return Ok(err.into_reply()),
    };
    let selector = state.selector();
    let registry = state.registry();
    let candidates: Vec<CandidateResponse> = registry
        .query(&query)
        .into_iter()
        .map(|player| CandidateResponse {
            selected: roster.contains(&player.id),
            can_add: selector.can_add(player, &roster),
            player: player.clone(),
        })
        .collect();
    Ok(json_ok(&candidates))
}

pub async fn add_player(
    group_id: Uuid,
    participant: String,
    body: PickRequest,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    let result = state.add_player(group_id, &participant, &body.player_id);
    reply_with(result, |_| roster_reply(&state, group_id, &participant, StatusCode::CREATED))
}

pub async fn remove_player(
    group_id: Uuid,
    participant: String,
    player_id: String,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    let result = state.remove_player(group_id, &participant, &PlayerId::new(player_id));
    reply_with(result, |_| roster_reply(&state, group_id, &participant, StatusCode::OK))
}

pub async fn replace_player(
    group_id: Uuid,
    participant: String,
    outgoing_id: String,
    body: PickRequest,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    let result =
        state.replace_player(group_id, &participant, &PlayerId::new(outgoing_id), &body.player_id);
    reply_with(result, |_| roster_reply(&state, group_id, &participant, StatusCode::OK))
}

pub async fn submit_roster(
    group_id: Uuid,
    participant: String,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    let result = state.submit_roster(group_id, &participant);
    reply_with(result, |_| roster_reply(&state, group_id, &participant, StatusCode::OK))
}

pub async fn get_restricted_mode(state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    Ok(json_ok(&RestrictedModeBody { enabled: state.restricted_mode() }))
}

pub async fn set_restricted_mode(
    body: RestrictedModeBody,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    state.set_restricted_mode(body.enabled);
    Ok(json_ok(&RestrictedModeBody { enabled: state.restricted_mode() }))
}

/// Record a withdrawal or a tee-off
pub async fn update_player_state(
    player_id: String,
    body: PlayerStateUpdate,
    state: Arc<GatewayState>,
) -> Result<Reply, Infallible> {
    let mut registry = state.registry_mut();
    match registry.set_player_state(&PlayerId::new(player_id), body.status, body.has_started) {
        Ok(player) => Ok(json_ok(player)),
        Err(err) => Ok(GatewayError::from(err).into_reply()),
    }
}

pub async fn refresh_rankings(state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    reply_with(state.refresh_rankings().await, |players| {
        json_ok(&RefreshResponse::new("Rankings refreshed", Some(players), None))
    })
}

pub async fn refresh_tournaments(state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    reply_with(state.refresh_schedule().await, |tournaments| {
        json_ok(&RefreshResponse::new("Tournament schedule refreshed", None, Some(tournaments)))
    })
}

pub async fn refresh_all(state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    reply_with(state.refresh_all().await, |(players, tournaments)| {
        json_ok(&RefreshResponse::new("All data refreshed", Some(players), Some(tournaments)))
    })
}

pub async fn health(state: Arc<GatewayState>) -> Result<Reply, Infallible> {
    let players = state.registry().len();
    Ok(json_ok(&serde_json::json!({
        "status": "healthy",
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "services": {
            "registry": format!("{players} players"),
            "golf_api": if state.can_refresh() { "configured" } else { "unavailable" },
        }
    })))
}

/// Create all REST API routes
pub fn create_routes(
    state: Arc<GatewayState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    // Pool endpoints
    let players = warp::path!("api" / "players")
        .and(warp::get())
        .and(warp::query::<PoolQuery>())
        .and(state_filter.clone())
        .and_then(list_players);

    let player = warp::path!("api" / "players" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_player);

    let tournaments = warp::path!("api" / "tournaments")
        .and(warp::get())
        .and(warp::query::<TournamentQuery>())
        .and(state_filter.clone())
        .and_then(list_tournaments);

    // Group endpoints
    let group_create = warp::path!("api" / "groups")
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(create_group);

    let group_list = warp::path!("api" / "groups")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(list_groups);

    let group = warp::path!("api" / "groups" / Uuid)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_group);

    let join = warp::path!("api" / "groups" / Uuid / "members")
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(join_group);

    let teams = warp::path!("api" / "groups" / Uuid / "teams")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(member_teams);

    // Roster endpoints
    let roster = warp::path!("api" / "groups" / Uuid / "rosters" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_roster);

    let candidates = warp::path!("api" / "groups" / Uuid / "rosters" / String / "candidates")
        .and(warp::get())
        .and(warp::query::<PoolQuery>())
        .and(state_filter.clone())
        .and_then(list_candidates);

    let add = warp::path!("api" / "groups" / Uuid / "rosters" / String / "players")
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(add_player);

    let remove = warp::path!("api" / "groups" / Uuid / "rosters" / String / "players" / String)
        .and(warp::delete())
        .and(state_filter.clone())
        .and_then(remove_player);

    let replace = warp::path!("api" / "groups" / Uuid / "rosters" / String / "players" / String)
        .and(warp::put())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(replace_player);

    let submit = warp::path!("api" / "groups" / Uuid / "rosters" / String / "submit")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(submit_roster);

    // Settings and operator endpoints
    let restricted_get = warp::path!("api" / "settings" / "restricted-mode")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_restricted_mode);

    let restricted_put = warp::path!("api" / "settings" / "restricted-mode")
        .and(warp::put())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(set_restricted_mode);

    let player_state = warp::path!("api" / "admin" / "players" / String / "state")
        .and(warp::put())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(update_player_state);

    // Live data refresh
    let refresh_rankings_route = warp::path!("api" / "refresh-rankings")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(refresh_rankings);

    let refresh_tournaments_route = warp::path!("api" / "refresh-tournaments")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(refresh_tournaments);

    let refresh_all_route = warp::path!("api" / "refresh-all")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(refresh_all);

    // Health check endpoint
    let health_route = warp::path!("api" / "health")
        .and(warp::get())
        .and(state_filter)
        .and_then(health);

    // Combine all routes
    players
        .or(player)
        .or(tournaments)
        .or(group_create)
        .or(group_list)
        .or(group)
        .or(join)
        .or(teams)
        .or(roster)
        .or(candidates)
        .or(add)
        .or(remove)
        .or(replace)
        .or(submit)
        .or(restricted_get)
        .or(restricted_put)
        .or(player_state)
        .or(refresh_rankings_route)
        .or(refresh_tournaments_route)
        .or(refresh_all_route)
        .or(health_route)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"]),
        )
}

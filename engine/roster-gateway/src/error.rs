//! Error types for the RosterGateway

use golf_data_fetcher::FetchError;
use player_registry::RegistryError;
use roster_engine::{GroupError, PlayerId, RosterError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use warp::http::StatusCode;

/// Errors that can occur in the RosterGateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error("Group {0} not found")]
    GroupNotFound(Uuid),

    #[error("{username} is not a member of group {group_id}")]
    NotAMember { group_id: Uuid, username: String },

    #[error("Player {0} not found in the pool")]
    PlayerNotFound(PlayerId),

    #[error("Registry error: {0}")]
    Registry(RegistryError),

    #[error("Feed refresh failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("No live data feed is configured")]
    RefreshUnavailable,
}

impl From<RegistryError> for GatewayError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::PlayerNotFound(id) => GatewayError::PlayerNotFound(id),
            other => GatewayError::Registry(other),
        }
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Roster(RosterError::NotFound { .. })
            | GatewayError::PlayerNotFound(_)
            | GatewayError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::NotAMember { .. } => StatusCode::FORBIDDEN,
            GatewayError::Roster(RosterError::AlreadySubmitted)
            | GatewayError::Group(GroupError::GroupFull { .. } | GroupError::AlreadyMember { .. }) => {
                StatusCode::CONFLICT
            }
            GatewayError::Roster(_) | GatewayError::Group(GroupError::Invalid(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GatewayError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Fetch(_) => StatusCode::BAD_GATEWAY,
            GatewayError::RefreshUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Roster(err) => err.code(),
            GatewayError::Group(err) => err.code(),
            GatewayError::GroupNotFound(_) => "GROUP_NOT_FOUND",
            GatewayError::NotAMember { .. } => "NOT_A_MEMBER",
            GatewayError::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
            GatewayError::Registry(_) => "REGISTRY_ERROR",
            GatewayError::Fetch(_) => "FETCH_FAILED",
            GatewayError::RefreshUnavailable => "REFRESH_UNAVAILABLE",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            GatewayError::Roster(RosterError::NotSubmittable { unmet }) => {
                Some(serde_json::json!({ "unmet": unmet }))
            }
            GatewayError::Roster(
                RosterError::DuplicatePlayer { player_id }
                | RosterError::NotFound { player_id }
                | RosterError::RestrictedReplacement { player_id },
            )
            | GatewayError::PlayerNotFound(player_id) => {
                Some(serde_json::json!({ "player_id": player_id }))
            }
            GatewayError::Roster(RosterError::BudgetExceeded { total, limit }) => {
                Some(serde_json::json!({ "total": total, "limit": limit }))
            }
            GatewayError::Roster(RosterError::CapacityExceeded { max_players }) => {
                Some(serde_json::json!({ "max_players": max_players }))
            }
            GatewayError::Group(GroupError::GroupFull { group_id, max_members }) => {
                Some(serde_json::json!({ "group_id": group_id, "max_members": max_members }))
            }
            GatewayError::NotAMember { group_id, username }
            | GatewayError::Group(GroupError::AlreadyMember { group_id, username }) => {
                Some(serde_json::json!({ "group_id": group_id, "username": username }))
            }
            GatewayError::GroupNotFound(group_id) => Some(serde_json::json!({ "group_id": group_id })),
            _ => None,
        }
    }

    /// Render as a JSON error reply
    pub fn into_reply(self) -> warp::reply::WithStatus<warp::reply::Json> {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                details: self.details(),
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        warp::reply::with_status(warp::reply::json(&body), status)
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

/// Result type for RosterGateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

//! Error types for roster mutations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::PlayerId;

/// Why a roster cannot be submitted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum SubmitBlocker {
    WrongSize { required: usize, actual: usize },
    OverBudget { limit: f64, total: f64 },
}

impl fmt::Display for SubmitBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitBlocker::WrongSize { required, actual } => {
                write!(f, "roster has {actual} players, exactly {required} required")
            }
            SubmitBlocker::OverBudget { limit, total } => {
                write!(f, "roster totals {total:.3} points, limit is {limit}")
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error("Roster is full: {max_players} players already selected")]
    CapacityExceeded { max_players: usize },

    #[error("Player {player_id} is already on the roster")]
    DuplicatePlayer { player_id: PlayerId },

    #[error("Points budget exceeded: {total:.3} would exceed {limit}")]
    BudgetExceeded { total: f64, limit: f64 },

    #[error("Player {player_id} is not on the roster")]
    NotFound { player_id: PlayerId },

    #[error("Player {player_id} has already started and cannot come in as a replacement")]
    RestrictedReplacement { player_id: PlayerId },

    #[error("Roster is not submittable: {}", join_blockers(.unmet))]
    NotSubmittable { unmet: Vec<SubmitBlocker> },

    #[error("Roster was already submitted")]
    AlreadySubmitted,
}

fn join_blockers(unmet: &[SubmitBlocker]) -> String {
    unmet.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl RosterError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            RosterError::DuplicatePlayer { .. } => "DUPLICATE_PLAYER",
            RosterError::BudgetExceeded { .. } => "BUDGET_EXCEEDED",
            RosterError::NotFound { .. } => "NOT_FOUND",
            RosterError::RestrictedReplacement { .. } => "RESTRICTED_REPLACEMENT",
            RosterError::NotSubmittable { .. } => "NOT_SUBMITTABLE",
            RosterError::AlreadySubmitted => "ALREADY_SUBMITTED",
        }
    }
}

//! Roster rules configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{MAX_PLAYERS, MAX_POINTS};

/// Caps a roster must respect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterRules {
    /// Exact number of players required for submission, and the add cap
    pub max_players: usize,

    /// Cumulative points budget
    pub max_points: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    #[error("max_players must be at least 1")]
    ZeroPlayers,

    #[error("max_points must be a finite, non-negative number, got {0}")]
    InvalidBudget(f64),
}

impl Default for RosterRules {
    fn default() -> Self {
        Self { max_players: MAX_PLAYERS, max_points: MAX_POINTS }
    }
}

impl RosterRules {
    pub fn new(max_players: usize, max_points: f64) -> Result<Self, RulesError> {
        let rules = Self { max_players, max_points };
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.max_players == 0 {
            return Err(RulesError::ZeroPlayers);
        }
        if !self.max_points.is_finite() || self.max_points < 0.0 {
            return Err(RulesError::InvalidBudget(self.max_points));
        }
        Ok(())
    }

    /// True when `total` fits inside the budget
    #[inline]
    pub fn within_budget(&self, total: f64) -> bool {
        total <= self.max_points
    }
}

//! Roster selection rules
//!
//! Predicates (`can_*`, `is_submittable`) are pure. Mutations validate first
//! and leave the roster untouched when they return an error.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RosterRules;
use crate::error::{RosterError, SubmitBlocker};
use crate::roster::Roster;
use crate::types::{Player, PlayerId, SelectionEvent};
use crate::Result;

/// Applies [`RosterRules`] to rosters.
///
/// `restricted_mode` is the event-phase flag: while set, a golfer who has
/// already started cannot be brought in through `replace`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSelector {
    pub rules: RosterRules,
    pub restricted_mode: bool,
}

impl RosterSelector {
    pub fn new(rules: RosterRules) -> Self {
        Self { rules, restricted_mode: false }
    }

    pub fn with_restricted_mode(mut self, restricted_mode: bool) -> Self {
        self.restricted_mode = restricted_mode;
        self
    }

    pub fn can_add(&self, candidate: &Player, roster: &Roster) -> bool {
        self.check_add(candidate, roster).is_ok()
    }

    /// Append `candidate` with the current time as its selection timestamp
    pub fn add<'r>(&self, candidate: &Player, roster: &'r mut Roster) -> Result<&'r SelectionEvent> {
        ensure_open(roster)?;
        self.check_add(candidate, roster)?;

        roster.push(SelectionEvent::now(candidate.clone()));
        debug!(
            "Added {} ({:.3} pts), roster now {}/{} at {:.3} pts",
            candidate.id,
            candidate.points,
            roster.len(),
            self.rules.max_players,
            roster.total_points()
        );
        Ok(&roster.entries()[roster.len() - 1])
    }

    pub fn remove(&self, player_id: &PlayerId, roster: &mut Roster) -> Result<SelectionEvent> {
        ensure_open(roster)?;
        let index = roster
            .position(player_id)
            .ok_or_else(|| RosterError::NotFound { player_id: player_id.clone() })?;

        let removed = roster.remove_at(index);
        debug!("Removed {}, roster now {}/{}", player_id, roster.len(), self.rules.max_players);
        Ok(removed)
    }

    /// Whether `incoming` may take the slot held by `outgoing_id`
    pub fn can_replace(&self, incoming: &Player, outgoing_id: &PlayerId, roster: &Roster) -> bool {
        self.check_replace(incoming, outgoing_id, roster).is_ok()
    }

    /// Swap the entry for `outgoing_id` with a freshly timestamped entry for
    /// `incoming`, keeping its position. Returns the entry that left.
    pub fn replace(
        &self,
        outgoing_id: &PlayerId,
        incoming: &Player,
        roster: &mut Roster,
    ) -> Result<SelectionEvent> {
        ensure_open(roster)?;
        let index = self.check_replace(incoming, outgoing_id, roster)?;

        let outgoing = roster.swap_at(index, SelectionEvent::now(incoming.clone()));
        debug!(
            "Replaced {} with {}, roster at {:.3} pts",
            outgoing_id,
            incoming.id,
            roster.total_points()
        );
        Ok(outgoing)
    }

    pub fn is_submittable(&self, roster: &Roster) -> bool {
        self.submit_blockers(roster).is_empty()
    }

    /// Freeze the roster. Fails with every unmet condition listed.
    pub fn submit(&self, roster: &mut Roster) -> Result<()> {
        ensure_open(roster)?;
        let unmet = self.submit_blockers(roster);
        if !unmet.is_empty() {
            return Err(RosterError::NotSubmittable { unmet });
        }

        roster.freeze(Utc::now());
        debug!("Roster submitted with {:.3} pts", roster.total_points());
        Ok(())
    }

    /// Budget left before the cap
    pub fn remaining_budget(&self, roster: &Roster) -> f64 {
        self.rules.max_points - roster.total_points()
    }

    /// Pool members that could be added right now, in pool order
    pub fn eligible_candidates<'p>(&self, pool: &'p [Player], roster: &Roster) -> Vec<&'p Player> {
        pool.iter().filter(|p| self.can_add(p, roster)).collect()
    }

    fn check_add(&self, candidate: &Player, roster: &Roster) -> Result<()> {
        if roster.len() >= self.rules.max_players {
            return Err(RosterError::CapacityExceeded { max_players: self.rules.max_players });
        }
        if roster.contains(&candidate.id) {
            return Err(RosterError::DuplicatePlayer { player_id: candidate.id.clone() });
        }
        let total = roster.total_with_added(candidate.points);
        if !self.rules.within_budget(total) {
            return Err(RosterError::BudgetExceeded { total, limit: self.rules.max_points });
        }
        Ok(())
    }

    /// Validates a swap and returns the slot index of the outgoing player.
    /// Slot count is unchanged by a swap, so capacity is not checked.
    fn check_replace(
        &self,
        incoming: &Player,
        outgoing_id: &PlayerId,
        roster: &Roster,
    ) -> Result<usize> {
        let index = roster
            .position(outgoing_id)
            .ok_or_else(|| RosterError::NotFound { player_id: outgoing_id.clone() })?;

        if incoming.id != *outgoing_id && roster.contains(&incoming.id) {
            return Err(RosterError::DuplicatePlayer { player_id: incoming.id.clone() });
        }

        let total = roster.total_with_swapped(index, incoming.points);
        if !self.rules.within_budget(total) {
            return Err(RosterError::BudgetExceeded { total, limit: self.rules.max_points });
        }

        if self.restricted_mode && incoming.has_started {
            return Err(RosterError::RestrictedReplacement { player_id: incoming.id.clone() });
        }
        Ok(index)
    }

    fn submit_blockers(&self, roster: &Roster) -> Vec<SubmitBlocker> {
        let mut unmet = Vec::new();
        if roster.len() != self.rules.max_players {
            unmet.push(SubmitBlocker::WrongSize {
                required: self.rules.max_players,
                actual: roster.len(),
            });
        }
        let total = roster.total_points();
        if !self.rules.within_budget(total) {
            unmet.push(SubmitBlocker::OverBudget { limit: self.rules.max_points, total });
        }
        unmet
    }
}

fn ensure_open(roster: &Roster) -> Result<()> {
    if roster.is_submitted() {
        return Err(RosterError::AlreadySubmitted);
    }
    Ok(())
}

//! A participant's roster for one competition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RosterRules;
use crate::types::{PlayerId, SelectionEvent};

/// Where a roster sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterState {
    Empty,
    /// 1 to max_players - 1 members
    Partial,
    /// max_players members, over budget
    Full,
    /// max_players members within budget
    Submittable,
    /// Frozen
    Submitted,
}

/// Ordered picks, mutated only through [`crate::RosterSelector`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    entries: Vec<SelectionEvent>,
    submitted_at: Option<DateTime<Utc>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SelectionEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &PlayerId) -> Option<&SelectionEvent> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.entries.iter().map(SelectionEvent::id)
    }

    /// Sum of member points costs
    pub fn total_points(&self) -> f64 {
        sum_costs(self.entries.iter().map(SelectionEvent::points))
    }

    /// Total after appending a member costing `points`
    pub(crate) fn total_with_added(&self, points: f64) -> f64 {
        sum_costs(self.entries.iter().map(SelectionEvent::points).chain(std::iter::once(points)))
    }

    /// Total after slot `index` is swapped for a member costing `points`.
    /// Sums in slot order so the result is bit-identical to `total_points`
    /// on the swapped roster.
    pub(crate) fn total_with_swapped(&self, index: usize, points: f64) -> f64 {
        sum_costs(
            self.entries
                .iter()
                .enumerate()
                .map(|(i, e)| if i == index { points } else { e.points() }),
        )
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn state(&self, rules: &RosterRules) -> RosterState {
        if self.is_submitted() {
            return RosterState::Submitted;
        }
        match self.len() {
            0 => RosterState::Empty,
            n if n < rules.max_players => RosterState::Partial,
            _ if rules.within_budget(self.total_points()) => RosterState::Submittable,
            _ => RosterState::Full,
        }
    }

    pub(crate) fn position(&self, id: &PlayerId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    pub(crate) fn push(&mut self, entry: SelectionEvent) {
        self.entries.push(entry);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> SelectionEvent {
        self.entries.remove(index)
    }

    pub(crate) fn swap_at(&mut self, index: usize, entry: SelectionEvent) -> SelectionEvent {
        std::mem::replace(&mut self.entries[index], entry)
    }

    pub(crate) fn freeze(&mut self, at: DateTime<Utc>) {
        self.submitted_at = Some(at);
    }
}

fn sum_costs(costs: impl Iterator<Item = f64>) -> f64 {
    costs.fold(0.0, |total, cost| total + cost)
}

//! Roster Engine - team-picking rules for fantasy golf
//!
//! A participant builds a roster of golfers under two caps: a maximum number
//! of players and a cumulative points budget. Once the event has begun the
//! restricted-replacement mode stops golfers who already teed off from being
//! swapped in. Rosters are entered in groups, each with its own member cap.

pub mod config;
pub mod error;
pub mod group;
pub mod pool;
pub mod roster;
pub mod selector;
pub mod types;

pub use config::{RosterRules, RulesError};
pub use error::{RosterError, SubmitBlocker};
pub use group::{Group, GroupError, Member, MemberRole, NewGroup};
pub use pool::{filter_and_sort, PoolQuery, SortKey};
pub use roster::{Roster, RosterState};
pub use selector::RosterSelector;
pub use types::{Player, PlayerId, PlayerStatus, SelectionEvent};

/// Default roster size
pub const MAX_PLAYERS: usize = 8;

/// Default points budget
pub const MAX_POINTS: f64 = 35.0;

// Result type alias
pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests;

//! Player Registry - the golfer pool behind roster selection
//!
//! This crate turns the cached world-ranking and tournament-schedule files
//! into the in-memory candidate pool and tournament list.

pub mod registry;
pub mod schedule;
pub mod types;

pub use registry::PlayerRegistry;
pub use schedule::{Tournament, TournamentQuery, TournamentSchedule, TournamentSort};
pub use types::{RankedPlayer, RankingsFeed, RegistryError};

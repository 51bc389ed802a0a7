//! Candidate pool search and ordering

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Rank ascending
    #[default]
    Rank,
    /// Points descending
    Points,
    /// Name, case-folded
    Name,
}

impl SortKey {
    fn compare(self, a: &Player, b: &Player) -> Ordering {
        match self {
            SortKey::Rank => a.rank.cmp(&b.rank),
            SortKey::Points => b.points.total_cmp(&a.points),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolQuery {
    /// Case-insensitive substring of name or country
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

impl PoolQuery {
    pub fn matches(&self, player: &Player) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                player.name.to_lowercase().contains(&term)
                    || player.country.to_lowercase().contains(&term)
            }
        }
    }
}

/// Filter then sort. Ties keep their original pool order.
pub fn filter_and_sort<'p>(pool: &'p [Player], query: &PoolQuery) -> Vec<&'p Player> {
    let mut matched: Vec<&Player> = pool.iter().filter(|p| query.matches(p)).collect();
    matched.sort_by(|a, b| query.sort.compare(a, b));
    matched
}

//! Tournament schedule as cached from the sports-data feed

use crate::types::RegistryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentSchedule {
    pub tour: Option<Tour>,
    pub season: Option<Season>,
    pub tournaments: Vec<Tournament>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tour {
    pub id: Option<String>,
    pub alias: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Season {
    pub id: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub event_type: Option<String>,
    pub purse: Option<f64>,
    pub currency: Option<String>,
    pub points: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub course_timezone: Option<String>,
    pub network: Option<String>,
    pub total_rounds: Option<u32>,
    pub status: String,
    pub venue: Option<Venue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Venue {
    pub id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Orderings offered on the tournament list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentSort {
    /// Start date ascending, undated last
    #[default]
    Date,
    /// Purse descending, unknown last
    Purse,
    /// Ranking points on offer descending, unknown last
    Points,
    /// Name, case-folded
    Name,
}

impl TournamentSort {
    fn compare(self, a: &Tournament, b: &Tournament) -> Ordering {
        match self {
            TournamentSort::Date => (a.start_date.is_none(), a.start_date)
                .cmp(&(b.start_date.is_none(), b.start_date)),
            TournamentSort::Purse => descending(a.purse, b.purse),
            TournamentSort::Points => descending(a.points, b.points),
            TournamentSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentQuery {
    /// Case-insensitive substring of name, venue city or venue state
    pub search: Option<String>,
    #[serde(default)]
    pub sort: TournamentSort,
}

impl TournamentQuery {
    pub fn matches(&self, tournament: &Tournament) -> bool {
        let term = match self.search.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(term) => term.to_lowercase(),
        };
        let venue = tournament.venue.as_ref();
        let contains = |field: Option<&String>| {
            field.map_or(false, |value| value.to_lowercase().contains(&term))
        };
        tournament.name.to_lowercase().contains(&term)
            || contains(venue.and_then(|v| v.city.as_ref()))
            || contains(venue.and_then(|v| v.state.as_ref()))
    }
}

impl Tournament {
    pub fn is_scheduled(&self) -> bool {
        self.status.eq_ignore_ascii_case("scheduled")
    }
}

impl TournamentSchedule {
    /// Load the cached schedule JSON file
    pub async fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self, RegistryError> {
        info!("Loading tournament schedule from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let schedule: TournamentSchedule = serde_json::from_str(&json_content)?;

        info!("Loaded {} tournaments", schedule.tournaments.len());
        Ok(schedule)
    }

    /// Tournaments still open for picks, earliest first. Undated events go last.
    pub fn upcoming(&self) -> Vec<&Tournament> {
        self.search(&TournamentQuery::default())
    }

    /// Open tournaments matching `query`. Ties keep their feed order.
    pub fn search(&self, query: &TournamentQuery) -> Vec<&Tournament> {
        let mut open: Vec<&Tournament> = self
            .tournaments
            .iter()
            .filter(|t| t.is_scheduled() && query.matches(t))
            .collect();
        open.sort_by(|a, b| query.sort.compare(a, b));
        open
    }
}

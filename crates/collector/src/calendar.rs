//! Contribution data for a single player, flattened out of the GraphQL shape

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Everything the analyzer needs about one player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserContributions {
    pub login: String,
    pub total_contributions: i64,
    /// Calendar weeks in chronological order
    pub weeks: Vec<CalendarWeek>,
    /// Owned repositories, most recently pushed first
    pub repositories: Vec<Repository>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
    pub contribution_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub primary_language: Option<Language>,
    /// Default-branch history, `None` for empty repositories
    pub commits: Option<Vec<CommitRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub committed_date: DateTime<Utc>,
    /// Login of the linked GitHub account, if the author email maps to one
    pub author_login: Option<String>,
}

impl ContributionDay {
    pub const SUNDAY: u8 = 0;
    pub const SATURDAY: u8 = 6;

    pub fn is_weekend(&self) -> bool {
        self.weekday == Self::SUNDAY || self.weekday == Self::SATURDAY
    }
}

//! Weekend Warrior Stats Analyzer
//!
//! Turns a player's contribution calendar into weekend stats, badges and a
//! leaderboard standing.

pub mod achievements;
mod aggregate;
pub mod hourly;
mod standing;
mod stats;

pub use achievements::{Achievement, AchievementId, Rarity};
pub use stats::*;

use thiserror::Error;
use tracing::info;
use weekend_warrior_collector::calendar::UserContributions;
use weekend_warrior_collector::github::GithubCollector;
use weekend_warrior_collector::{CollectorError, ErrorKind};
use weekend_warrior_database::LeaderboardStore;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error(transparent)]
    Collector(#[from] CollectorError),
}

impl AnalyzerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Collector(e) => e.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Weekend stats analyzer
pub struct Analyzer;

impl Analyzer {
    /// Compute a player's weekend stats without touching the leaderboard
    pub fn summarize(username: &str, contributions: &UserContributions) -> WeekendSummary {
        aggregate::summarize(username, contributions)
    }

    /// Save a summary to the leaderboard and attach the player's standing
    pub async fn rank(store: Option<&dyn LeaderboardStore>, summary: WeekendSummary) -> WeekendStats {
        let standing = standing::record(store, &summary).await;
        WeekendStats { summary, standing }
    }

    /// Fetch, summarize and rank a player in one go
    pub async fn lookup(
        collector: &GithubCollector,
        store: Option<&dyn LeaderboardStore>,
        username: &str,
    ) -> Result<WeekendStats> {
        let contributions = collector.fetch_contributions(username).await?;

        // Prefer GitHub's casing so one player never gets two leaderboard rows
        let login = if contributions.login.is_empty() {
            username
        } else {
            contributions.login.as_str()
        };

        let summary = Self::summarize(login, &contributions);
        let stats = Self::rank(store, summary).await;

        info!(
            username = login,
            commits = stats.summary.total_weekend_commits,
            rank = stats.standing.global_rank,
            "Computed weekend stats"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekend_warrior_database::Database;

    #[tokio::test]
    async fn test_stats_serialize_flat_camel_case() {
        let db = Database::in_memory().await.unwrap();
        let summary = Analyzer::summarize("octocat", &UserContributions::default());
        let stats = Analyzer::rank(Some(&db as &dyn LeaderboardStore), summary).await;

        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["username"], "octocat");
        assert_eq!(json["totalWeekendCommits"], 0);
        assert_eq!(json["globalRank"], 1);
        assert_eq!(json["totalPlayers"], 1);
        assert_eq!(json["globalAverages"]["avgCommits"], 0);
        assert_eq!(json["commitsByHour"].as_array().unwrap().len(), 24);
        assert_eq!(json["achievements"].as_array().unwrap().len(), 9);
        assert_eq!(json["achievements"][0]["id"], "weekend-warrior");
        assert_eq!(json["busiestDay"], serde_json::json!({"date": "", "commits": 0}));
    }
}

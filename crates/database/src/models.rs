//! Database models for the leaderboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player's latest weekend stats, one row per username
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_weekend_commits: i64,
    pub saturday_commits: i64,
    pub sunday_commits: i64,
    pub dedication_percentage: i64,
    pub longest_streak: i64,
    pub achievements_unlocked: i64,
    pub last_updated: DateTime<Utc>,
}

/// Leaderboard entry annotated with its position in the sorted listing.
///
/// The position is an ordinal over the sort order, so tied players get
/// different numbers. It is not the same value as [`UserRank::rank`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    pub rank: i64,
}

/// Input for saving a player's stats
#[derive(Debug, Clone)]
pub struct NewLeaderboardEntry {
    pub username: String,
    pub total_weekend_commits: i64,
    pub saturday_commits: i64,
    pub sunday_commits: i64,
    pub dedication_percentage: i64,
    pub longest_streak: i64,
    pub achievements_unlocked: i64,
}

/// A player's rank among everyone on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRank {
    /// 1 + number of players with strictly more weekend commits
    pub rank: i64,
    pub total_players: i64,
}

/// Board-wide means, rounded to the nearest integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAverages {
    pub avg_commits: i64,
    pub avg_dedication: i64,
    pub avg_streak: i64,
}

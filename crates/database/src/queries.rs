//! Database query functions

use crate::models::*;
use crate::schema::Database;
use crate::{DatabaseError, Result};
use chrono::Utc;

impl Database {
    // ==================== Writes ====================

    /// Insert or fully replace a player's entry, stamping it with the current time
    pub async fn upsert_entry(&self, entry: NewLeaderboardEntry) -> Result<LeaderboardEntry> {
        let last_updated = Utc::now();

        sqlx::query(
            "INSERT INTO leaderboard
             (username, total_weekend_commits, saturday_commits, sunday_commits,
              dedication_percentage, longest_streak, achievements_unlocked, last_updated)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(username) DO UPDATE SET
                total_weekend_commits = excluded.total_weekend_commits,
                saturday_commits = excluded.saturday_commits,
                sunday_commits = excluded.sunday_commits,
                dedication_percentage = excluded.dedication_percentage,
                longest_streak = excluded.longest_streak,
                achievements_unlocked = excluded.achievements_unlocked,
                last_updated = excluded.last_updated",
        )
        .bind(&entry.username)
        .bind(entry.total_weekend_commits)
        .bind(entry.saturday_commits)
        .bind(entry.sunday_commits)
        .bind(entry.dedication_percentage)
        .bind(entry.longest_streak)
        .bind(entry.achievements_unlocked)
        .bind(last_updated)
        .execute(self.pool())
        .await?;

        Ok(LeaderboardEntry {
            username: entry.username,
            total_weekend_commits: entry.total_weekend_commits,
            saturday_commits: entry.saturday_commits,
            sunday_commits: entry.sunday_commits,
            dedication_percentage: entry.dedication_percentage,
            longest_streak: entry.longest_streak,
            achievements_unlocked: entry.achievements_unlocked,
            last_updated,
        })
    }

    // ==================== Reads ====================

    /// Get a player's entry by username
    pub async fn get_entry(&self, username: &str) -> Result<Option<LeaderboardEntry>> {
        let row = sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT username, total_weekend_commits, saturday_commits, sunday_commits,
                    dedication_percentage, longest_streak, achievements_unlocked, last_updated
             FROM leaderboard WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// Count every player on the board
    pub async fn count_players(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leaderboard")
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }

    /// Count players with strictly more weekend commits than `commits`
    pub async fn count_players_above(&self, commits: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leaderboard WHERE total_weekend_commits > ?",
        )
        .bind(commits)
        .fetch_one(self.pool())
        .await?;

        Ok(count)
    }

    /// Count players with strictly fewer weekend commits than `commits`
    pub async fn count_players_below(&self, commits: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leaderboard WHERE total_weekend_commits < ?",
        )
        .bind(commits)
        .fetch_one(self.pool())
        .await?;

        Ok(count)
    }

    /// Get the top `limit` players, most weekend commits first.
    ///
    /// Ties keep the order in which players first joined the board. SQLite
    /// treats a negative `LIMIT` as unbounded, so `limit` must be positive.
    pub async fn get_top_entries(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        if limit < 1 {
            return Err(DatabaseError::InvalidLimit(limit));
        }

        let rows = sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT username, total_weekend_commits, saturday_commits, sunday_commits,
                    dedication_percentage, longest_streak, achievements_unlocked, last_updated
             FROM leaderboard
             ORDER BY total_weekend_commits DESC, id ASC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Average commits, dedication and streak across the board
    pub async fn get_global_averages(&self) -> Result<GlobalAverages> {
        let (avg_commits, avg_dedication, avg_streak) =
            sqlx::query_as::<_, (Option<f64>, Option<f64>, Option<f64>)>(
                "SELECT AVG(total_weekend_commits), AVG(dedication_percentage), AVG(longest_streak)
                 FROM leaderboard",
            )
            .fetch_one(self.pool())
            .await?;

        Ok(GlobalAverages {
            avg_commits: avg_commits.unwrap_or(0.0).round() as i64,
            avg_dedication: avg_dedication.unwrap_or(0.0).round() as i64,
            avg_streak: avg_streak.unwrap_or(0.0).round() as i64,
        })
    }
}

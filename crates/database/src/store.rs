//! Leaderboard store abstraction
//!
//! Call sites hold an `Arc<dyn LeaderboardStore>` handed to them at startup
//! instead of reaching for a shared connection.

use crate::models::*;
use crate::schema::Database;
use crate::Result;
use async_trait::async_trait;
use tracing::debug;

/// A keyed store of leaderboard entries, one per username.
///
/// Reads are not snapshot-consistent with a preceding write: a concurrent
/// save by another player between a save and a rank read can shift the
/// result.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Upsert by username, fully replacing whatever was stored before
    async fn save(&self, entry: NewLeaderboardEntry) -> Result<LeaderboardEntry>;

    /// `1 + count(strictly higher scores)`, or `None` for unknown players
    async fn rank(&self, username: &str) -> Result<Option<UserRank>>;

    /// `round(100 * count(strictly lower scores) / total)`, or `None` for unknown players
    async fn percentile(&self, username: &str) -> Result<Option<i64>>;

    /// Sorted listing truncated to `limit`, annotated with 1-based positions.
    /// A `limit` below 1 is rejected with [`crate::DatabaseError::InvalidLimit`].
    async fn list(&self, limit: i64) -> Result<Vec<RankedEntry>>;

    async fn global_averages(&self) -> Result<GlobalAverages>;
}

#[async_trait]
impl LeaderboardStore for Database {
    async fn save(&self, entry: NewLeaderboardEntry) -> Result<LeaderboardEntry> {
        let saved = self.upsert_entry(entry).await?;
        debug!(username = %saved.username, commits = saved.total_weekend_commits, "Saved leaderboard entry");
        Ok(saved)
    }

    async fn rank(&self, username: &str) -> Result<Option<UserRank>> {
        let Some(entry) = self.get_entry(username).await? else {
            return Ok(None);
        };

        let above = self.count_players_above(entry.total_weekend_commits).await?;
        let total_players = self.count_players().await?;

        Ok(Some(UserRank {
            rank: above + 1,
            total_players,
        }))
    }

    async fn percentile(&self, username: &str) -> Result<Option<i64>> {
        let Some(entry) = self.get_entry(username).await? else {
            return Ok(None);
        };

        let total = self.count_players().await?;
        let below = self.count_players_below(entry.total_weekend_commits).await?;

        if total == 0 {
            return Ok(Some(0));
        }

        Ok(Some(((below as f64 / total as f64) * 100.0).round() as i64))
    }

    async fn list(&self, limit: i64) -> Result<Vec<RankedEntry>> {
        let entries = self.get_top_entries(limit).await?;

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| RankedEntry {
                entry,
                rank: idx as i64 + 1,
            })
            .collect())
    }

    async fn global_averages(&self) -> Result<GlobalAverages> {
        self.get_global_averages().await
    }
}

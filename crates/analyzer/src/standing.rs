//! Record a summary on the leaderboard and read back the player's standing

use crate::stats::{Standing, WeekendSummary};
use tracing::{debug, warn};
use weekend_warrior_database::LeaderboardStore;

/// Save the summary and compute rank, percentile and board averages.
///
/// Leaderboard failures never fail the lookup; the player gets
/// [`Standing::offline`] instead.
pub async fn record(store: Option<&dyn LeaderboardStore>, summary: &WeekendSummary) -> Standing {
    let Some(store) = store else {
        debug!(username = %summary.username, "Leaderboard disabled, using offline standing");
        return Standing::offline();
    };

    match try_record(store, summary).await {
        Ok(standing) => standing,
        Err(e) => {
            warn!(username = %summary.username, error = %e, "Failed to save to leaderboard");
            Standing::offline()
        }
    }
}

async fn try_record(
    store: &dyn LeaderboardStore,
    summary: &WeekendSummary,
) -> weekend_warrior_database::Result<Standing> {
    store.save(summary.to_entry()).await?;

    // Not snapshot-consistent with the save above; other players may land in between
    let rank = store.rank(&summary.username).await?;
    let percentile = store.percentile(&summary.username).await?;
    let global_averages = store.global_averages().await?;

    Ok(Standing {
        global_rank: rank.map_or(1, |r| r.rank),
        total_players: rank.map_or(1, |r| r.total_players),
        percentile: percentile.unwrap_or(1),
        global_averages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use async_trait::async_trait;
    use weekend_warrior_collector::calendar::UserContributions;
    use weekend_warrior_database::{
        Database, DatabaseError, GlobalAverages, LeaderboardEntry, NewLeaderboardEntry,
        RankedEntry, UserRank,
    };

    /// A store whose backing database is gone
    struct UnreachableStore;

    #[async_trait]
    impl LeaderboardStore for UnreachableStore {
        async fn save(&self, _: NewLeaderboardEntry) -> weekend_warrior_database::Result<LeaderboardEntry> {
            Err(DatabaseError::Connection(sqlx::Error::PoolClosed))
        }

        async fn rank(&self, _: &str) -> weekend_warrior_database::Result<Option<UserRank>> {
            Err(DatabaseError::Connection(sqlx::Error::PoolClosed))
        }

        async fn percentile(&self, _: &str) -> weekend_warrior_database::Result<Option<i64>> {
            Err(DatabaseError::Connection(sqlx::Error::PoolClosed))
        }

        async fn list(&self, _: i64) -> weekend_warrior_database::Result<Vec<RankedEntry>> {
            Err(DatabaseError::Connection(sqlx::Error::PoolClosed))
        }

        async fn global_averages(&self) -> weekend_warrior_database::Result<GlobalAverages> {
            Err(DatabaseError::Connection(sqlx::Error::PoolClosed))
        }
    }

    fn summary_for(username: &str) -> WeekendSummary {
        summarize(username, &UserContributions::default())
    }

    #[tokio::test]
    async fn test_unreachable_store_degrades() {
        let store: &dyn LeaderboardStore = &UnreachableStore;
        let standing = record(Some(store), &summary_for("octocat")).await;

        assert_eq!(standing, Standing::offline());
        assert_eq!(standing.global_rank, 1);
        assert_eq!(standing.total_players, 1);
        assert_eq!(standing.percentile, 1);
        assert_eq!(standing.global_averages, GlobalAverages::default());
    }

    #[tokio::test]
    async fn test_missing_store_degrades() {
        let standing = record(None, &summary_for("octocat")).await;
        assert_eq!(standing, Standing::offline());
    }

    #[tokio::test]
    async fn test_first_player_standing() {
        let db = Database::in_memory().await.unwrap();

        let store: &dyn LeaderboardStore = &db;
        let standing = record(Some(store), &summary_for("octocat")).await;

        assert_eq!(standing.global_rank, 1);
        assert_eq!(standing.total_players, 1);
        assert_eq!(standing.percentile, 0);

        let listing = db.list(10).await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].entry.username, "octocat");
        assert_eq!(listing[0].entry.achievements_unlocked, 0);
    }
}

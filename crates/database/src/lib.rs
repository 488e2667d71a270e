//! Weekend Warrior Database Layer
//!
//! SQLite-backed leaderboard storage for weekend coding stats.

mod models;
mod queries;
mod schema;
mod store;

pub use models::*;
pub use schema::Database;
pub use store::LeaderboardStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Invalid leaderboard limit {0}, must be at least 1")]
    InvalidLimit(i64),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

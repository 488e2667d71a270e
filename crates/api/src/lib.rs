//! Weekend Warrior Web API
//!
//! Axum-based REST API and static file server.

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::sync::Arc;
use weekend_warrior_collector::github::GithubCollector;
use weekend_warrior_database::LeaderboardStore;

/// Shared application state
pub struct AppState {
    pub collector: GithubCollector,
    /// `None` when no leaderboard database is configured
    pub store: Option<Arc<dyn LeaderboardStore>>,
}

impl AppState {
    pub fn new(collector: GithubCollector, store: Option<Arc<dyn LeaderboardStore>>) -> Self {
        Self { collector, store }
    }
}

pub type SharedState = Arc<AppState>;

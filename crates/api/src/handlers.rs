//! API request handlers

use crate::{ApiError, SharedState};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use weekend_warrior_analyzer::Analyzer;
use weekend_warrior_collector::{validate_username, ErrorKind};
use weekend_warrior_database::{LeaderboardStore, RankedEntry};

const DEFAULT_LEADERBOARD_LIMIT: i64 = 50;
const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "github": state.collector.has_token(),
        "leaderboard": state.store.is_some(),
    }))
}

#[derive(Deserialize)]
pub struct StatsRequest {
    username: Option<String>,
}

/// Look up a player's weekend stats and record them on the leaderboard
pub async fn get_stats(
    State(state): State<SharedState>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> impl IntoResponse {
    let username = match payload {
        Ok(Json(StatsRequest {
            username: Some(username),
        })) if !username.is_empty() => username,
        _ => return ApiError::invalid_input("Username is required").into_response(),
    };

    if validate_username(&username).is_err() {
        return ApiError::invalid_input("Invalid GitHub username format").into_response();
    }

    match Analyzer::lookup(&state.collector, state.store.as_deref(), &username).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            error!(username = %username, error = %e, "Stats lookup failed");
            ApiError::from_lookup(e.kind()).into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    limit: Option<String>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    leaderboard: Vec<RankedEntry>,
    total: usize,
    limit: i64,
}

/// Get the top players, most weekend commits first
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> impl IntoResponse {
    let limit = match parse_limit(query.limit.as_deref()) {
        Some(limit) => limit,
        None => return ApiError::invalid_input("Limit must be between 1 and 100").into_response(),
    };

    let leaderboard = match state.store.as_deref() {
        Some(store) => store.list(limit).await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch leaderboard");
            Vec::new()
        }),
        None => Vec::new(),
    };

    Json(LeaderboardResponse {
        total: leaderboard.len(),
        leaderboard,
        limit,
    })
    .into_response()
}

fn parse_limit(raw: Option<&str>) -> Option<i64> {
    let limit = match raw {
        None => DEFAULT_LEADERBOARD_LIMIT,
        Some(raw) => raw.trim().parse::<i64>().ok()?,
    };

    (1..=MAX_LEADERBOARD_LIMIT).contains(&limit).then_some(limit)
}

#[derive(Deserialize)]
pub struct AvatarQuery {
    username: Option<String>,
}

/// Proxy a player's GitHub avatar so share images can embed it
pub async fn get_avatar(
    State(state): State<SharedState>,
    Query(query): Query<AvatarQuery>,
) -> impl IntoResponse {
    let Some(username) = query.username.filter(|u| !u.is_empty()) else {
        return ApiError::invalid_input("Username required").into_response();
    };

    match state.collector.fetch_avatar(&username).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "public, max-age=86400"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == ErrorKind::InvalidInput => {
            ApiError::invalid_input("Invalid GitHub username format").into_response()
        }
        Err(e) => {
            error!(username = %username, error = %e, "Avatar proxy failed");
            ApiError::new(ErrorKind::Unknown, "Failed to fetch avatar").into_response()
        }
    }
}

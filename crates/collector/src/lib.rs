//! Weekend Warrior Data Collectors
//!
//! Fetches a player's contribution calendar and repository history from GitHub.

pub mod calendar;
pub mod github;

use std::time::Duration;
use thiserror::Error;

/// Calendar year the game is scored on
pub const SEASON_YEAR: i32 = 2025;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("User \"{0}\" not found")]
    NotFound(String),

    #[error("Invalid GitHub username format: {0:?}")]
    InvalidUsername(String),

    #[error("GitHub token not configured, set GITHUB_TOKEN")]
    MissingToken,

    #[error("GitHub API authentication failed, invalid token")]
    Unauthorized,

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Failure classes surfaced to callers, assigned where the failure is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    RateLimited,
    Misconfigured,
    Unknown,
}

impl CollectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUsername(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::MissingToken | Self::Unauthorized => ErrorKind::Misconfigured,
            Self::Http(_) | Self::Api(_) | Self::Parse(_) => ErrorKind::Unknown,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;

/// Configuration for collectors
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub github_token: Option<String>,
    pub user_agent: String,
    pub graphql_url: String,
    pub avatar_base_url: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            github_token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            user_agent: "Weekend-Warrior-App/1.0".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
            avatar_base_url: "https://github.com".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Check a login against GitHub's username rules: 1 to 39 ASCII
/// alphanumerics or single hyphens, never leading or trailing with one.
pub fn validate_username(username: &str) -> Result<()> {
    let invalid = || CollectorError::InvalidUsername(username.to_string());

    let bytes = username.as_bytes();
    if bytes.is_empty() || bytes.len() > 39 {
        return Err(invalid());
    }

    let mut prev_hyphen = true;
    for &b in bytes {
        match b {
            b'-' if prev_hyphen => return Err(invalid()),
            b'-' => prev_hyphen = true,
            b if b.is_ascii_alphanumeric() => prev_hyphen = false,
            _ => return Err(invalid()),
        }
    }

    if prev_hyphen {
        return Err(invalid());
    }

    Ok(())
}

//! GitHub API collector

use crate::calendar::{
    CalendarWeek, CommitRecord, ContributionDay, Language, Repository, UserContributions,
};
use crate::{validate_username, CollectorConfig, CollectorError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

const SEASON_FROM: &str = "2025-01-01T00:00:00Z";
const SEASON_TO: &str = "2025-12-31T23:59:59Z";

const CONTRIBUTIONS_QUERY: &str = r#"
query UserContributions($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    login
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
            weekday
          }
        }
      }
    }
    repositories(first: 20, orderBy: {field: PUSHED_AT, direction: DESC}, ownerAffiliations: OWNER) {
      nodes {
        name
        primaryLanguage {
          name
          color
        }
        defaultBranchRef {
          target {
            ... on Commit {
              history(first: 100) {
                nodes {
                  committedDate
                  author {
                    user {
                      login
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// GitHub API client
pub struct GithubCollector {
    client: Client,
    config: CollectorConfig,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    login: String,
    contributions_collection: ContributionsCollection,
    repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionCalendar {
    total_contributions: i64,
    weeks: Vec<WeekNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekNode {
    contribution_days: Vec<DayNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayNode {
    contribution_count: i64,
    date: NaiveDate,
    weekday: u8,
}

#[derive(Debug, Deserialize)]
struct RepositoryConnection {
    #[serde(default)]
    nodes: Vec<Option<RepoNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoNode {
    name: String,
    primary_language: Option<LanguageNode>,
    default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
struct LanguageNode {
    name: String,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    target: Option<TargetNode>,
}

#[derive(Debug, Deserialize)]
struct TargetNode {
    history: Option<HistoryNode>,
}

#[derive(Debug, Deserialize)]
struct HistoryNode {
    #[serde(default)]
    nodes: Vec<CommitNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    committed_date: DateTime<Utc>,
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    user: Option<AuthorUser>,
}

#[derive(Debug, Deserialize)]
struct AuthorUser {
    login: String,
}

impl GithubCollector {
    /// Create a new GitHub collector
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Whether a GitHub token is available for GraphQL lookups
    pub fn has_token(&self) -> bool {
        self.config.github_token.is_some()
    }

    /// Fetch a player's 2025 contribution calendar and recent repository history
    pub async fn fetch_contributions(&self, username: &str) -> Result<UserContributions> {
        validate_username(username)?;

        let Some(token) = self.config.github_token.as_deref() else {
            warn!("GITHUB_TOKEN is not set, cannot query GitHub");
            return Err(CollectorError::MissingToken);
        };

        info!(username = username, "Fetching GitHub contributions");

        let body = json!({
            "query": CONTRIBUTIONS_QUERY,
            "variables": {
                "username": username,
                "from": SEASON_FROM,
                "to": SEASON_TO,
            },
        });

        let response = self
            .client
            .post(&self.config.graphql_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        self.check_rate_limit(&response)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(CollectorError::Unauthorized),
            // Secondary rate limits come back as a bare 403
            StatusCode::FORBIDDEN => return Err(CollectorError::RateLimited(60)),
            status if !status.is_success() => {
                return Err(CollectorError::Api(format!("GitHub API error: {}", status)));
            }
            _ => {}
        }

        let text = response.text().await?;
        let contributions = parse_contributions(username, &text)?;

        debug!(
            username = username,
            weeks = contributions.weeks.len(),
            repositories = contributions.repositories.len(),
            "Fetched GitHub contributions"
        );

        Ok(contributions)
    }

    /// Download a player's avatar PNG
    pub async fn fetch_avatar(&self, username: &str) -> Result<Vec<u8>> {
        validate_username(username)?;

        let url = format!("{}/{}.png", self.config.avatar_base_url, username);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CollectorError::NotFound(username.to_string()));
        }

        if !response.status().is_success() {
            return Err(CollectorError::Api(format!(
                "Avatar fetch failed: {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        debug!(username = username, size = bytes.len(), "Fetched avatar");
        Ok(bytes.to_vec())
    }

    fn check_rate_limit(&self, response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CollectorError::RateLimited(retry_after(response)));
        }

        if status == StatusCode::FORBIDDEN {
            if let Some(remaining) = response.headers().get("x-ratelimit-remaining") {
                if remaining == "0" {
                    return Err(CollectorError::RateLimited(retry_after(response)));
                }
            }
        }
        Ok(())
    }
}

/// Seconds until the rate limit window resets, falling back to a minute
fn retry_after(response: &reqwest::Response) -> u64 {
    let headers = response.headers();

    if let Some(secs) = headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        return secs;
    }

    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    match reset {
        Some(reset) => reset.saturating_sub(Utc::now().timestamp() as u64),
        None => 60,
    }
}

/// Decode a GraphQL response body into a player's contributions
fn parse_contributions(username: &str, body: &str) -> Result<UserContributions> {
    let response: GraphqlResponse =
        serde_json::from_str(body).map_err(|e| CollectorError::Parse(e.to_string()))?;

    if let Some(error) = response.errors.first() {
        return Err(match error.kind.as_deref() {
            Some("NOT_FOUND") => CollectorError::NotFound(username.to_string()),
            Some("RATE_LIMITED") => CollectorError::RateLimited(60),
            _ if error.message.contains("Could not resolve to a User") => {
                CollectorError::NotFound(username.to_string())
            }
            _ => CollectorError::Api(format!("GitHub GraphQL error: {}", error.message)),
        });
    }

    let user = response
        .data
        .and_then(|data| data.user)
        .ok_or_else(|| CollectorError::NotFound(username.to_string()))?;

    let calendar = user.contributions_collection.contribution_calendar;

    let weeks = calendar
        .weeks
        .into_iter()
        .map(|week| CalendarWeek {
            days: week
                .contribution_days
                .into_iter()
                .map(|day| ContributionDay {
                    date: day.date,
                    weekday: day.weekday,
                    contribution_count: day.contribution_count,
                })
                .collect(),
        })
        .collect();

    let repositories = user
        .repositories
        .nodes
        .into_iter()
        .flatten()
        .map(|repo| Repository {
            name: repo.name,
            primary_language: repo.primary_language.map(|lang| Language {
                name: lang.name,
                color: lang.color,
            }),
            commits: repo
                .default_branch_ref
                .and_then(|branch| branch.target)
                .and_then(|target| target.history)
                .map(|history| {
                    history
                        .nodes
                        .into_iter()
                        .map(|commit| CommitRecord {
                            committed_date: commit.committed_date,
                            author_login: commit.author.and_then(|a| a.user).map(|u| u.login),
                        })
                        .collect()
                }),
        })
        .collect();

    Ok(UserContributions {
        login: user.login,
        total_contributions: calendar.total_contributions,
        weeks,
        repositories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const RESPONSE: &str = r##"{
        "data": {
            "user": {
                "login": "octocat",
                "contributionsCollection": {
                    "contributionCalendar": {
                        "totalContributions": 7,
                        "weeks": [
                            {"contributionDays": [
                                {"contributionCount": 3, "date": "2025-01-04", "weekday": 6}
                            ]},
                            {"contributionDays": [
                                {"contributionCount": 4, "date": "2025-01-05", "weekday": 0},
                                {"contributionCount": 0, "date": "2025-01-06", "weekday": 1}
                            ]}
                        ]
                    }
                },
                "repositories": {
                    "nodes": [
                        {
                            "name": "hello-world",
                            "primaryLanguage": {"name": "Rust", "color": "#dea584"},
                            "defaultBranchRef": {"target": {"history": {
                                "totalCount": 2,
                                "nodes": [
                                    {"committedDate": "2025-01-04T10:00:00Z", "author": {"user": {"login": "octocat"}}},
                                    {"committedDate": "2025-01-06T10:00:00Z", "author": {"user": null}}
                                ]
                            }}}
                        },
                        {"name": "empty", "primaryLanguage": null, "defaultBranchRef": null},
                        null
                    ]
                }
            }
        }
    }"##;

    #[test]
    fn test_parse_contributions() {
        let contributions = parse_contributions("octocat", RESPONSE).unwrap();

        assert_eq!(contributions.login, "octocat");
        assert_eq!(contributions.total_contributions, 7);
        assert_eq!(contributions.weeks.len(), 2);
        assert_eq!(contributions.weeks[1].days.len(), 2);
        assert_eq!(
            contributions.weeks[0].days[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()
        );
        assert!(contributions.weeks[0].days[0].is_weekend());
        assert!(!contributions.weeks[1].days[1].is_weekend());

        assert_eq!(contributions.repositories.len(), 2);
        let repo = &contributions.repositories[0];
        assert_eq!(repo.primary_language.as_ref().unwrap().name, "Rust");
        let commits = repo.commits.as_ref().unwrap();
        assert_eq!(commits[0].author_login.as_deref(), Some("octocat"));
        assert_eq!(commits[1].author_login, None);
        assert!(contributions.repositories[1].commits.is_none());
    }

    #[test]
    fn test_parse_unknown_user() {
        let body = r#"{
            "data": {"user": null},
            "errors": [{"type": "NOT_FOUND", "message": "Could not resolve to a User with the login of 'nobody'."}]
        }"#;

        let err = parse_contributions("nobody", body).unwrap_err();
        assert!(matches!(err, CollectorError::NotFound(ref name) if name == "nobody"));

        let err = parse_contributions("nobody", r#"{"data": {"user": null}}"#).unwrap_err();
        assert!(matches!(err, CollectorError::NotFound(_)));
    }

    #[test]
    fn test_parse_graphql_errors() {
        let limited = r#"{"errors": [{"type": "RATE_LIMITED", "message": "API rate limit exceeded"}]}"#;
        assert!(matches!(
            parse_contributions("octocat", limited),
            Err(CollectorError::RateLimited(_))
        ));

        let other = r#"{"errors": [{"message": "Something broke"}]}"#;
        assert!(matches!(
            parse_contributions("octocat", other),
            Err(CollectorError::Api(_))
        ));

        assert!(matches!(
            parse_contributions("octocat", "<html>"),
            Err(CollectorError::Parse(_))
        ));
    }

    /// Serve one canned HTTP response on a local port and return its base URL
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_request(&mut stream).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    /// Drain headers and body so the client never sees a reset
    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if buf.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    async fn fetch_with_response(response: &'static str) -> Result<UserContributions> {
        let base = serve_once(response).await;
        let collector = GithubCollector::new(CollectorConfig {
            github_token: Some("test-token".to_string()),
            graphql_url: format!("{base}/graphql"),
            ..CollectorConfig::default()
        })
        .unwrap();

        collector.fetch_contributions("octocat").await
    }

    #[tokio::test]
    async fn test_http_status_classification() {
        let err = fetch_with_response(
            "HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CollectorError::Unauthorized));
        assert_eq!(err.kind(), ErrorKind::Misconfigured);

        let err = fetch_with_response(
            "HTTP/1.1 403 Forbidden\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CollectorError::RateLimited(60)));

        let err = fetch_with_response(
            "HTTP/1.1 403 Forbidden\r\nx-ratelimit-remaining: 0\r\nretry-after: 7\r\n\
             content-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CollectorError::RateLimited(7)));
        assert_eq!(err.kind(), ErrorKind::RateLimited);

        let err = fetch_with_response(
            "HTTP/1.1 429 Too Many Requests\r\nretry-after: 9\r\n\
             content-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CollectorError::RateLimited(9)));

        let err = fetch_with_response(
            "HTTP/1.1 502 Bad Gateway\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CollectorError::Api(ref msg) if msg.contains("502")));
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_graphql_not_found_over_http() {
        let err = fetch_with_response(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 84\r\n\
             connection: close\r\n\r\n\
             {\"data\":{\"user\":null},\"errors\":[{\"type\":\"NOT_FOUND\",\"message\":\"Could not resolve\"}]}",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CollectorError::NotFound(ref name) if name == "octocat"));
    }

    #[tokio::test]
    async fn test_avatar_not_found() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;
        let collector = GithubCollector::new(CollectorConfig {
            avatar_base_url: base,
            ..CollectorConfig::default()
        })
        .unwrap();

        let err = collector.fetch_avatar("octocat").await.unwrap_err();
        assert!(matches!(err, CollectorError::NotFound(ref name) if name == "octocat"));
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_request() {
        let config = CollectorConfig {
            github_token: None,
            graphql_url: "http://127.0.0.1:9/graphql".to_string(),
            ..CollectorConfig::default()
        };
        let collector = GithubCollector::new(config).unwrap();

        assert!(!collector.has_token());
        assert!(matches!(
            collector.fetch_contributions("octocat").await,
            Err(CollectorError::MissingToken)
        ));
        assert!(matches!(
            collector.fetch_contributions("-bad-").await,
            Err(CollectorError::InvalidUsername(_))
        ));
    }
}

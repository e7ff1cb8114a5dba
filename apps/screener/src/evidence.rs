//! Evidence collection: a candidate's public code-hosting activity.
//!
//! A missing username produces an empty profile here. Unknown accounts are
//! reported as NotFound, which the pipeline degrades to an empty profile that
//! scores zero evidence downstream.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ScreeningError;

const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "screener/0.1";
/// A repository pushed to within this many days counts as active.
const ACTIVE_WINDOW_DAYS: i64 = 180;
const MAX_USERNAME_LEN: usize = 39;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceProfile {
    pub username: String,
    /// Detected languages as reported by the host.
    pub languages: BTreeSet<String>,
    pub total_repos: u32,
    pub original_repos: u32,
    pub forked_repos: u32,
    pub active_repos: u32,
    pub total_stars: u32,
    pub total_size_kb: u64,
}

impl EvidenceProfile {
    /// Zero-valued profile for a candidate with no usable evidence.
    pub fn empty(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_repos == 0 && self.languages.is_empty()
    }
}

#[async_trait]
pub trait EvidenceCollector: Send + Sync {
    async fn analyze(&self, username: &str) -> Result<EvidenceProfile, ScreeningError>;
}

/// Repository fields the aggregation needs.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSummary {
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub size: u64,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Folds a repository listing into an EvidenceProfile.
pub fn summarize_repositories(
    username: &str,
    repos: &[RepoSummary],
    now: DateTime<Utc>,
) -> EvidenceProfile {
    let mut profile = EvidenceProfile::empty(username);
    let active_since = now - chrono::Duration::days(ACTIVE_WINDOW_DAYS);

    for repo in repos {
        profile.total_repos += 1;
        if repo.fork {
            profile.forked_repos += 1;
        } else {
            profile.original_repos += 1;
            profile.total_stars += repo.stargazers_count;
            if let Some(language) = &repo.language {
                profile.languages.insert(language.clone());
            }
        }
        if repo.pushed_at.is_some_and(|pushed| pushed >= active_since) {
            profile.active_repos += 1;
        }
        profile.total_size_kb += repo.size;
    }

    profile
}

/// Reads public repositories from the GitHub REST API.
pub struct GithubEvidenceCollector {
    client: Client,
    token: Option<String>,
}

impl GithubEvidenceCollector {
    pub fn new(token: Option<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent(USER_AGENT)
                .build()?,
            token,
        })
    }
}

/// GitHub logins are 1 to 39 ASCII alphanumerics or single inner hyphens.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && !username.starts_with('-')
        && !username.ends_with('-')
        && !username.contains("--")
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Maps a non-success, non-404 GitHub status to a retry class. Host rate
/// limits are Transient: the Quota class belongs to the extraction quota.
fn status_error(status: StatusCode, username: &str) -> ScreeningError {
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => ScreeningError::Transient(
            format!("GitHub rate limit hit while reading '{username}'"),
        ),
        status if status.is_server_error() => {
            ScreeningError::Transient(format!("GitHub returned {status}"))
        }
        status => {
            ScreeningError::Validation(format!("GitHub returned {status} for '{username}'"))
        }
    }
}

#[async_trait]
impl EvidenceCollector for GithubEvidenceCollector {
    async fn analyze(&self, username: &str) -> Result<EvidenceProfile, ScreeningError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(EvidenceProfile::empty(""));
        }
        if !is_valid_username(username) {
            return Err(ScreeningError::NotFound(format!(
                "'{username}' is not a GitHub login"
            )));
        }

        let url = format!("{GITHUB_API_URL}/users/{username}/repos?per_page=100&sort=pushed");
        let mut request = self
            .client
            .get(&url)
            .header("accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScreeningError::Transient(format!("GitHub request failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ScreeningError::NotFound(format!(
                    "GitHub user '{username}'"
                )));
            }
            status if !status.is_success() => return Err(status_error(status, username)),
            _ => {}
        }

        let repos: Vec<RepoSummary> = response
            .json()
            .await
            .map_err(|e| ScreeningError::Transient(format!("Bad GitHub payload: {e}")))?;

        debug!(username, repos = repos.len(), "Collected GitHub repositories");
        Ok(summarize_repositories(username, &repos, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repo(language: Option<&str>, fork: bool, stars: u32, pushed_days_ago: i64) -> RepoSummary {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        RepoSummary {
            language: language.map(str::to_string),
            fork,
            stargazers_count: stars,
            size: 100,
            pushed_at: Some(now - chrono::Duration::days(pushed_days_ago)),
        }
    }

    #[test]
    fn test_summarize_counts_originals_and_forks() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let repos = vec![
            repo(Some("Rust"), false, 10, 5),
            repo(Some("Python"), false, 2, 400),
            repo(Some("Go"), true, 50, 1),
            repo(None, false, 0, 30),
        ];

        let profile = summarize_repositories("dev", &repos, now);
        assert_eq!(profile.total_repos, 4);
        assert_eq!(profile.original_repos, 3);
        assert_eq!(profile.forked_repos, 1);
        assert_eq!(profile.active_repos, 3);
        assert_eq!(profile.total_stars, 12);
        assert_eq!(profile.total_size_kb, 400);
        let languages: Vec<_> = profile.languages.iter().cloned().collect();
        assert_eq!(languages, vec!["Python", "Rust"]);
    }

    #[test]
    fn test_empty_listing_is_empty_profile() {
        let profile = summarize_repositories("ghost", &[], Utc::now());
        assert!(profile.is_empty());
        assert_eq!(profile.username, "ghost");
    }

    #[test]
    fn test_repo_summary_deserializes_github_payload() {
        let json = r#"[{
            "name": "tool",
            "language": "Rust",
            "fork": false,
            "stargazers_count": 3,
            "size": 120,
            "pushed_at": "2024-05-01T10:00:00Z"
        }]"#;
        let repos: Vec<RepoSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(repos[0].language.as_deref(), Some("Rust"));
        assert!(repos[0].pushed_at.is_some());
    }

    #[tokio::test]
    async fn test_blank_username_skips_the_network() {
        let collector = GithubEvidenceCollector::new(None).unwrap();
        let profile = collector.analyze("   ").await.unwrap();
        assert!(profile.is_empty());
    }

    #[tokio::test]
    async fn test_path_like_username_skips_the_network() {
        let collector = GithubEvidenceCollector::new(None).unwrap();
        let err = collector.analyze("a/../orgs/x").await.unwrap_err();
        assert!(matches!(err, ScreeningError::NotFound(_)));
    }

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("octo-cat"));
        assert!(is_valid_username("Dev42"));
        assert!(!is_valid_username("a/../orgs/x"));
        assert!(!is_valid_username("user?per_page=1"));
        assert!(!is_valid_username("-lead"));
        assert!(!is_valid_username("trail-"));
        assert!(!is_valid_username("double--dash"));
        assert!(!is_valid_username(&"a".repeat(40)));
    }

    #[test]
    fn test_host_rate_limit_is_transient_not_quota() {
        for status in [StatusCode::FORBIDDEN, StatusCode::TOO_MANY_REQUESTS] {
            assert!(matches!(
                status_error(status, "dev"),
                ScreeningError::Transient(_)
            ));
        }
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "dev"),
            ScreeningError::Transient(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, "dev"),
            ScreeningError::Validation(_)
        ));
    }
}

//! Link validation: checks that a candidate's portfolio links resolve and
//! rates them by where they point.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkValidation {
    pub url: String,
    pub is_valid: bool,
    pub quality_score: u32,
}

impl LinkValidation {
    pub fn invalid(url: &str) -> Self {
        Self {
            url: url.to_string(),
            is_valid: false,
            quality_score: 0,
        }
    }
}

#[async_trait]
pub trait LinkValidator: Send + Sync {
    async fn validate(&self, url: &str) -> LinkValidation;
}

const CODE_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org", "codeberg.org"];
const PROFILE_HOSTS: &[&str] = &["linkedin.com", "stackoverflow.com", "kaggle.com", "behance.net", "dribbble.com"];

/// Quality of a reachable link, by host.
pub fn host_quality(url: &Url) -> u32 {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let on = |hosts: &[&str]| {
        hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{h}")))
    };

    if on(CODE_HOSTS) {
        90
    } else if on(PROFILE_HOSTS) {
        75
    } else {
        60
    }
}

/// Parses `raw` and keeps it only if it is an http(s) URL with a host.
pub fn parse_link(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

/// Mean quality over all links; `None` when there are no links to judge.
pub fn link_quality(validations: &[LinkValidation]) -> Option<f64> {
    if validations.is_empty() {
        return None;
    }
    let sum: u32 = validations.iter().map(|v| v.quality_score).sum();
    Some(sum as f64 / validations.len() as f64)
}

/// Probes links with a HEAD request.
pub struct HttpLinkValidator {
    client: Client,
}

impl HttpLinkValidator {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .redirect(reqwest::redirect::Policy::limited(5))
                .build()?,
        })
    }
}

#[async_trait]
impl LinkValidator for HttpLinkValidator {
    async fn validate(&self, raw: &str) -> LinkValidation {
        let Some(url) = parse_link(raw) else {
            return LinkValidation::invalid(raw);
        };

        match self.client.head(url.clone()).send().await {
            Ok(response) if response.status().is_success() => LinkValidation {
                url: raw.to_string(),
                is_valid: true,
                quality_score: host_quality(&url),
            },
            Ok(response) => {
                debug!(url = raw, status = %response.status(), "Link did not resolve");
                LinkValidation::invalid(raw)
            }
            Err(e) => {
                debug!(url = raw, error = %e, "Link probe failed");
                LinkValidation::invalid(raw)
            }
        }
    }
}

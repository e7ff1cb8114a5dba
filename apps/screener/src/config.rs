use std::str::FromStr;

use anyhow::{Context, Result};

use crate::cache::{
    CacheTtls, DEFAULT_ANALYSIS_TTL_SECS, DEFAULT_EVIDENCE_TTL_SECS, DEFAULT_SEMANTIC_TTL_SECS,
};
use crate::pipeline::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::pipeline::ScreenerSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub github_token: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub interactive_rpm: u32,
    pub interactive_buffer_ms: u64,
    pub batch_rpm: u32,
    pub batch_buffer_ms: u64,
    pub max_attempts: u32,
    pub evidence_cache_ttl_secs: i64,
    pub analysis_cache_ttl_secs: i64,
    pub semantic_cache_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            github_token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            interactive_rpm: parse_env("INTERACTIVE_RPM", 10)?,
            interactive_buffer_ms: parse_env("INTERACTIVE_BUFFER_MS", 1_000)?,
            batch_rpm: parse_env("BATCH_RPM", 5)?,
            batch_buffer_ms: parse_env("BATCH_BUFFER_MS", 3_000)?,
            max_attempts: parse_env("MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            evidence_cache_ttl_secs: parse_env(
                "EVIDENCE_CACHE_TTL_SECS",
                DEFAULT_EVIDENCE_TTL_SECS,
            )?,
            analysis_cache_ttl_secs: parse_env(
                "ANALYSIS_CACHE_TTL_SECS",
                DEFAULT_ANALYSIS_TTL_SECS,
            )?,
            semantic_cache_ttl_secs: parse_env(
                "SEMANTIC_CACHE_TTL_SECS",
                DEFAULT_SEMANTIC_TTL_SECS,
            )?,
        })
    }

    pub fn screener_settings(&self) -> ScreenerSettings {
        ScreenerSettings {
            interactive_rpm: self.interactive_rpm,
            interactive_buffer_ms: self.interactive_buffer_ms,
            batch_rpm: self.batch_rpm,
            batch_buffer_ms: self.batch_buffer_ms,
            retry: RetryPolicy {
                max_attempts: self.max_attempts.max(1),
                ..RetryPolicy::default()
            },
        }
    }

    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            evidence: chrono::Duration::seconds(self.evidence_cache_ttl_secs),
            analysis: chrono::Duration::seconds(self.analysis_cache_ttl_secs),
            semantic: chrono::Duration::seconds(self.semantic_cache_ttl_secs),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

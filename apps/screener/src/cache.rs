//! Content-addressed TTL caches.
//!
//! Each concern gets its own namespace. Expiry is checked lazily on `get`;
//! there is no background sweeper and entries are never refreshed in place.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::evidence::EvidenceProfile;
use crate::extraction::Extraction;
use crate::pipeline::CandidateAnalysis;

pub const DEFAULT_EVIDENCE_TTL_SECS: i64 = 24 * 60 * 60;
pub const DEFAULT_ANALYSIS_TTL_SECS: i64 = 24 * 60 * 60;
pub const DEFAULT_SEMANTIC_TTL_SECS: i64 = 60 * 60;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    /// An entry is still valid at exactly `created_at + ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > self.ttl
    }
}

/// Key/value store used by the pipeline. `get` never returns expired data.
pub trait Cache<T>: Send + Sync {
    fn get(&self, key: &str) -> Option<T>;
    fn set(&self, key: String, value: T);
}

pub struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send> Cache<T> for TtlCache<T> {
    fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let expired = entries.get(key)?.is_expired(now);
        if expired {
            debug!(cache = self.name, key, "Cache entry expired");
            entries.remove(key);
            return None;
        }

        debug!(cache = self.name, key, "Cache hit");
        entries.get(key).map(|entry| entry.data.clone())
    }

    fn set(&self, key: String, value: T) {
        let entry = CacheEntry {
            data: value,
            created_at: self.clock.now(),
            ttl: self.ttl,
        };
        self.entries.lock().insert(key, entry);
    }
}

#[derive(Debug, Clone)]
pub struct CacheTtls {
    pub evidence: Duration,
    pub analysis: Duration,
    pub semantic: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            evidence: Duration::seconds(DEFAULT_EVIDENCE_TTL_SECS),
            analysis: Duration::seconds(DEFAULT_ANALYSIS_TTL_SECS),
            semantic: Duration::seconds(DEFAULT_SEMANTIC_TTL_SECS),
        }
    }
}

/// The three isolated namespaces shared by every request in the process.
#[derive(Clone)]
pub struct ScreeningCaches {
    /// Evidence profiles by username.
    pub evidence: Arc<dyn Cache<EvidenceProfile>>,
    /// Finished analyses by (candidate, JD).
    pub analysis: Arc<dyn Cache<CandidateAnalysis>>,
    /// Extraction output, including the semantic matches, by (candidate, JD).
    pub semantic: Arc<dyn Cache<Extraction>>,
}

impl ScreeningCaches {
    pub fn in_memory(ttls: &CacheTtls, clock: Arc<dyn Clock>) -> Self {
        Self {
            evidence: Arc::new(TtlCache::new("evidence", ttls.evidence, clock.clone())),
            analysis: Arc::new(TtlCache::new("analysis", ttls.analysis, clock.clone())),
            semantic: Arc::new(TtlCache::new("semantic", ttls.semantic, clock)),
        }
    }
}

/// Hex SHA-256 of arbitrary content.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Key for per-(candidate, JD) namespaces.
pub fn pair_key(candidate: &[u8], jd_text: &str) -> String {
    format!("{}:{}", content_hash(candidate), content_hash(jd_text.as_bytes()))
}

/// Key for the evidence namespace.
pub fn username_key(username: &str) -> String {
    username.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_entry_survives_until_ttl() {
        let clock = clock();
        let cache: TtlCache<String> = TtlCache::new("test", Duration::hours(1), clock.clone());
        cache.set("k".into(), "v".into());

        clock.advance(Duration::minutes(59));
        assert_eq!(cache.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_expired_entry_is_removed_on_read() {
        let clock = clock();
        let cache: TtlCache<String> = TtlCache::new("test", Duration::hours(1), clock.clone());
        cache.set("k".into(), "v".into());

        clock.advance(Duration::minutes(61));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_exact_ttl_is_still_valid() {
        let clock = clock();
        let cache: TtlCache<u32> = TtlCache::new("test", Duration::hours(1), clock.clone());
        cache.set("k".into(), 7);

        clock.advance(Duration::hours(1));
        assert_eq!(cache.get("k"), Some(7));
    }

    #[test]
    fn test_set_overwrites_and_restarts_ttl() {
        let clock = clock();
        let cache: TtlCache<u32> = TtlCache::new("test", Duration::hours(1), clock.clone());
        cache.set("k".into(), 1);
        clock.advance(Duration::minutes(50));
        cache.set("k".into(), 2);
        clock.advance(Duration::minutes(50));
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_pair_key_shape() {
        let key = pair_key(b"resume", "jd");
        let (left, right) = key.split_once(':').unwrap();
        assert_eq!(left.len(), 64);
        assert_eq!(right, content_hash(b"jd"));
        assert_ne!(pair_key(b"resume", "jd"), pair_key(b"resume", "other jd"));
    }

    #[test]
    fn test_username_key_is_case_insensitive() {
        assert_eq!(username_key("  OctoCat "), username_key("octocat"));
    }

    #[test]
    fn test_default_ttls() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.evidence, Duration::hours(24));
        assert_eq!(ttls.analysis, Duration::hours(24));
        assert_eq!(ttls.semantic, Duration::hours(1));
    }
}

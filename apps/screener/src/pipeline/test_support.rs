//! In-process collaborators for pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use crate::cache::{CacheTtls, ManualClock, ScreeningCaches};
use crate::errors::ScreeningError;
use crate::evidence::{EvidenceCollector, EvidenceProfile};
use crate::extraction::{
    CandidateCluster, Extraction, Extractor, QualityAssessment, ResumeProfile,
};
use crate::links::{host_quality, parse_link, LinkValidation, LinkValidator};
use crate::pipeline::{CandidateInput, Collaborators, Screener, ScreenerSettings};
use crate::scoring::fit::JobCategory;
use crate::skills::coordinator::ExternalMatch;
use crate::skills::models::{JobSkills, SkillSet};

pub const JD: &str = "Senior Python engineer. Docker experience preferred. 3+ years.";

pub fn candidate(resume_text: &str, github_username: Option<&str>) -> CandidateInput {
    CandidateInput {
        label: None,
        resume_text: resume_text.to_string(),
        github_username: github_username.map(str::to_string),
        links: vec![],
    }
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Every whitespace-separated word of the résumé becomes a technical skill.
/// The JD side is always Python (critical) and Docker (preferred).
#[derive(Default)]
pub struct StubExtractor {
    pub calls: AtomicUsize,
    scripted: Mutex<HashMap<String, Vec<ScreeningError>>>,
    external: Mutex<HashMap<String, Vec<ExternalMatch>>>,
}

impl StubExtractor {
    /// Attaches external match pairs to every extraction of this résumé.
    pub fn with_matches(&self, resume_text: &str, pairs: Vec<ExternalMatch>) {
        self.external.lock().insert(resume_text.to_string(), pairs);
    }

    /// Queues errors returned, in order, for the next calls with this résumé.
    pub fn fail_with(&self, resume_text: &str, errors: Vec<ScreeningError>) {
        self.scripted.lock().insert(resume_text.to_string(), errors);
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn extract(
        &self,
        resume_text: &str,
        _jd_text: &str,
    ) -> Result<Extraction, ScreeningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(errors) = self.scripted.lock().get_mut(resume_text) {
            if !errors.is_empty() {
                return Err(errors.remove(0));
            }
        }

        Ok(Extraction {
            resume: ResumeProfile {
                skills: SkillSet {
                    technical: resume_text.split_whitespace().map(str::to_string).collect(),
                    ..Default::default()
                },
                experience_years: 4.0,
                education_level: "bachelor".to_string(),
            },
            jd: JobSkills {
                skills: SkillSet {
                    technical: list(&["Python"]),
                    tools: list(&["Docker"]),
                    soft: vec![],
                },
                critical: list(&["Python"]),
                preferred: list(&["Docker"]),
                bonus: vec![],
                required_experience: 3.0,
            },
            quality: QualityAssessment {
                score: 70.0,
                ..Default::default()
            },
            cluster: CandidateCluster::default(),
            matches: self.external.lock().get(resume_text).cloned(),
            job_category: JobCategory::Technical,
        })
    }
}

/// Known accounts get a small Python profile; "ghost" does not exist.
#[derive(Default)]
pub struct StubEvidence {
    pub calls: AtomicUsize,
    scripted: Mutex<HashMap<String, ScreeningError>>,
}

impl StubEvidence {
    pub fn fail_once(&self, username: &str, err: ScreeningError) {
        self.scripted.lock().insert(username.to_string(), err);
    }
}

#[async_trait]
impl EvidenceCollector for StubEvidence {
    async fn analyze(&self, username: &str) -> Result<EvidenceProfile, ScreeningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.scripted.lock().remove(username) {
            return Err(err);
        }
        if username == "ghost" {
            return Err(ScreeningError::NotFound(format!("user '{username}'")));
        }

        Ok(EvidenceProfile {
            languages: ["Python".to_string()].into_iter().collect(),
            total_repos: 4,
            original_repos: 4,
            active_repos: 2,
            total_stars: 12,
            ..EvidenceProfile::empty(username)
        })
    }
}

/// Parseable links are valid; nothing touches the network.
pub struct StubLinks;

pub fn external(jd_skill: &str, resume_skill: Option<&str>, confidence: f64) -> ExternalMatch {
    ExternalMatch {
        jd_skill: jd_skill.to_string(),
        resume_skill: resume_skill.map(str::to_string),
        confidence,
        category: None,
        priority: None,
    }
}

#[async_trait]
impl LinkValidator for StubLinks {
    async fn validate(&self, url: &str) -> LinkValidation {
        match parse_link(url) {
            Some(parsed) => LinkValidation {
                url: url.to_string(),
                is_valid: true,
                quality_score: host_quality(&parsed),
            },
            None => LinkValidation::invalid(url),
        }
    }
}

pub struct Harness {
    pub screener: Screener,
    pub extractor: Arc<StubExtractor>,
    pub evidence: Arc<StubEvidence>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        let extractor = Arc::new(StubExtractor::default());
        let evidence = Arc::new(StubEvidence::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        ));

        let screener = Screener::new(
            Collaborators {
                extractor: extractor.clone(),
                evidence: evidence.clone(),
                links: Arc::new(StubLinks),
            },
            ScreeningCaches::in_memory(&CacheTtls::default(), clock.clone()),
            ScreenerSettings::default(),
        );

        Self {
            screener,
            extractor,
            evidence,
            clock,
        }
    }
}

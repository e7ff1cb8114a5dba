//! Screening pipeline: one candidate against one job description.
//!
//! Per attempt:
//! 1. Extraction (semantic cache, else rate-limited extractor call)
//! 2. Match resolution: local first, external result only when local is weak
//! 3. Evidence profile (evidence cache, unknown accounts degrade to empty)
//! 4. Claim verification against detected languages
//! 5. Link validation
//! 6. Scoring, gap analysis, recommendation
//!
//! Attempts are wrapped by the retry state machine in `retry`; finished
//! analyses are cached per (candidate, JD) pair.

pub mod batch;
pub mod retry;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{content_hash, pair_key, username_key, ScreeningCaches};
use crate::errors::ScreeningError;
use crate::evidence::{EvidenceCollector, EvidenceProfile};
use crate::extraction::{
    CandidateCluster, Extraction, Extractor, QualityAssessment, ResumeProfile,
};
use crate::links::{link_quality, LinkValidation, LinkValidator};
use crate::pipeline::retry::{run_with_retry, RetryPolicy};
use crate::rate_limiter::RateLimiter;
use crate::scoring::fit::JobCategory;
use crate::scoring::proof::{verify_claims, SkillProof};
use crate::scoring::{build_recommendation, score_candidate, ScoreBreakdown, ScoreInputs};
use crate::skills::coordinator::{resolve_matches, MatchSource};
use crate::skills::gaps::{analyze_gaps, GapReport};
use crate::skills::models::JobSkills;

/// One candidate as submitted for screening.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateInput {
    /// Display name echoed back in results, e.g. the résumé file name.
    #[serde(default)]
    pub label: Option<String>,
    pub resume_text: String,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl CandidateInput {
    /// Everything that identifies this submission, as hashed into cache keys.
    pub fn content_bytes(&self) -> Vec<u8> {
        let mut bytes = self.resume_text.as_bytes().to_vec();
        bytes.push(0);
        bytes.extend(self.github_username.as_deref().unwrap_or_default().bytes());
        for link in &self.links {
            bytes.push(0);
            bytes.extend(link.bytes());
        }
        bytes
    }

    pub fn content_hash(&self) -> String {
        content_hash(&self.content_bytes())
    }

    fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            let hash = self.content_hash();
            hash[..12].to_string()
        })
    }
}

/// Full result of a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnalysis {
    pub candidate_hash: String,
    pub job_category: JobCategory,
    pub resume: ResumeProfile,
    pub jd: JobSkills,
    pub quality: QualityAssessment,
    pub cluster: CandidateCluster,
    pub evidence: EvidenceProfile,
    pub matches: MatchSource,
    pub proofs: Vec<SkillProof>,
    pub links: Vec<LinkValidation>,
    pub scores: ScoreBreakdown,
    pub gaps: GapReport,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Success,
    Failed,
    Cached,
}

/// Per-candidate outcome. Failed candidates carry score 0 and the error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub candidate_hash: String,
    pub label: Option<String>,
    /// 1-based position after ranking; unset until a batch is ranked.
    pub rank: Option<u32>,
    pub score: u32,
    pub status: CandidateStatus,
    pub analysis: Option<CandidateAnalysis>,
    pub error: Option<String>,
}

impl CandidateResult {
    fn from_analysis(
        input: &CandidateInput,
        analysis: CandidateAnalysis,
        status: CandidateStatus,
    ) -> Self {
        Self {
            candidate_hash: analysis.candidate_hash.clone(),
            label: input.label.clone(),
            rank: None,
            score: analysis.scores.composite,
            status,
            analysis: Some(analysis),
            error: None,
        }
    }

    fn failed(input: &CandidateInput, err: &ScreeningError) -> Self {
        Self {
            candidate_hash: input.content_hash(),
            label: input.label.clone(),
            rank: None,
            score: 0,
            status: CandidateStatus::Failed,
            analysis: None,
            error: Some(err.to_string()),
        }
    }
}

/// Which limiter guards the extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Batch,
}

/// External services the pipeline talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub extractor: Arc<dyn Extractor>,
    pub evidence: Arc<dyn EvidenceCollector>,
    pub links: Arc<dyn LinkValidator>,
}

#[derive(Debug, Clone)]
pub struct ScreenerSettings {
    pub interactive_rpm: u32,
    pub interactive_buffer_ms: u64,
    pub batch_rpm: u32,
    pub batch_buffer_ms: u64,
    pub retry: RetryPolicy,
}

impl Default for ScreenerSettings {
    fn default() -> Self {
        Self {
            interactive_rpm: 10,
            interactive_buffer_ms: 1_000,
            batch_rpm: 5,
            batch_buffer_ms: 3_000,
            retry: RetryPolicy::default(),
        }
    }
}

/// Process-wide screening context: collaborators, caches, and limiters.
pub struct Screener {
    collaborators: Collaborators,
    caches: ScreeningCaches,
    interactive_limiter: RateLimiter,
    batch_limiter: RateLimiter,
    retry: RetryPolicy,
}

impl Screener {
    pub fn new(
        collaborators: Collaborators,
        caches: ScreeningCaches,
        settings: ScreenerSettings,
    ) -> Self {
        Self {
            collaborators,
            caches,
            interactive_limiter: RateLimiter::new(
                "interactive",
                settings.interactive_rpm,
                settings.interactive_buffer_ms,
            ),
            batch_limiter: RateLimiter::new(
                "batch",
                settings.batch_rpm,
                settings.batch_buffer_ms,
            ),
            retry: settings.retry,
        }
    }

    fn limiter(&self, mode: Mode) -> &RateLimiter {
        match mode {
            Mode::Interactive => &self.interactive_limiter,
            Mode::Batch => &self.batch_limiter,
        }
    }

    /// Analyzes a single candidate. Failures surface as errors rather than a
    /// Failed result.
    pub async fn analyze(
        &self,
        input: &CandidateInput,
        jd_text: &str,
    ) -> Result<CandidateResult, ScreeningError> {
        validate_jd(jd_text)?;

        let key = pair_key(&input.content_bytes(), jd_text);
        if let Some(analysis) = self.caches.analysis.get(&key) {
            info!(candidate = %input.display_label(), "Serving cached analysis");
            return Ok(CandidateResult::from_analysis(input, analysis, CandidateStatus::Cached));
        }

        let analysis = self.analyze_with_retry(input, jd_text, Mode::Interactive).await?;
        self.caches.analysis.set(key, analysis.clone());
        Ok(CandidateResult::from_analysis(input, analysis, CandidateStatus::Success))
    }

    /// Cache check, retried analysis, cache write. Never fails: errors turn
    /// into a Failed result.
    pub(crate) async fn process_candidate(
        &self,
        input: &CandidateInput,
        jd_text: &str,
        mode: Mode,
    ) -> CandidateResult {
        let key = pair_key(&input.content_bytes(), jd_text);
        if let Some(analysis) = self.caches.analysis.get(&key) {
            debug!(candidate = %input.display_label(), "Analysis cache hit");
            return CandidateResult::from_analysis(input, analysis, CandidateStatus::Cached);
        }

        match self.analyze_with_retry(input, jd_text, mode).await {
            Ok(analysis) => {
                self.caches.analysis.set(key, analysis.clone());
                CandidateResult::from_analysis(input, analysis, CandidateStatus::Success)
            }
            Err(err) => {
                warn!(candidate = %input.display_label(), "Candidate failed: {err}");
                CandidateResult::failed(input, &err)
            }
        }
    }

    async fn analyze_with_retry(
        &self,
        input: &CandidateInput,
        jd_text: &str,
        mode: Mode,
    ) -> Result<CandidateAnalysis, ScreeningError> {
        let label = input.display_label();
        run_with_retry(&self.retry, self.limiter(mode), &label, |attempt| {
            debug!(candidate = %label, attempt, "Starting analysis attempt");
            self.run_pipeline(input, jd_text, mode)
        })
        .await
    }

    /// One attempt of the full pipeline.
    async fn run_pipeline(
        &self,
        input: &CandidateInput,
        jd_text: &str,
        mode: Mode,
    ) -> Result<CandidateAnalysis, ScreeningError> {
        if input.resume_text.trim().is_empty() {
            return Err(ScreeningError::Validation(
                "resume text is empty".to_string(),
            ));
        }

        let candidate_bytes = input.content_bytes();
        let extraction = self.extract(input, &candidate_bytes, jd_text, mode).await?;

        let matches = resolve_matches(
            &extraction.jd,
            &extraction.resume.skills,
            extraction.matches.as_deref(),
        );
        debug!(source = matches.label(), "Resolved skill matches");

        let evidence = self.collect_evidence(input.github_username.as_deref()).await?;
        let proofs = verify_claims(&extraction.resume.skills, &evidence);

        let mut links = Vec::with_capacity(input.links.len());
        for url in &input.links {
            links.push(self.collaborators.links.validate(url).await);
        }

        let scores = score_candidate(&ScoreInputs {
            match_set: matches.match_set(),
            jd: &extraction.jd,
            resume_text: &input.resume_text,
            candidate_years: extraction.resume.experience_years,
            proofs: &proofs,
            evidence: &evidence,
            quality: extraction.quality.score,
            link_quality: link_quality(&links),
            job_category: extraction.job_category,
        });
        let gaps = analyze_gaps(matches.match_set());
        let recommendation = build_recommendation(scores.composite, &gaps);

        let Extraction {
            resume,
            jd,
            quality,
            cluster,
            job_category,
            ..
        } = extraction;

        Ok(CandidateAnalysis {
            candidate_hash: content_hash(&candidate_bytes),
            job_category,
            resume,
            jd,
            quality,
            cluster,
            evidence,
            matches,
            proofs,
            links,
            scores,
            gaps,
            recommendation,
        })
    }

    async fn extract(
        &self,
        input: &CandidateInput,
        candidate_bytes: &[u8],
        jd_text: &str,
        mode: Mode,
    ) -> Result<Extraction, ScreeningError> {
        let key = pair_key(candidate_bytes, jd_text);
        if let Some(extraction) = self.caches.semantic.get(&key) {
            return Ok(extraction);
        }

        self.limiter(mode).wait_if_needed().await;
        let extraction = self
            .collaborators
            .extractor
            .extract(&input.resume_text, jd_text)
            .await?;
        self.caches.semantic.set(key, extraction.clone());
        Ok(extraction)
    }

    async fn collect_evidence(
        &self,
        username: Option<&str>,
    ) -> Result<EvidenceProfile, ScreeningError> {
        let Some(username) = username.map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(EvidenceProfile::empty(""));
        };

        let key = username_key(username);
        if let Some(profile) = self.caches.evidence.get(&key) {
            return Ok(profile);
        }

        let profile = match self.collaborators.evidence.analyze(username).await {
            Ok(profile) => profile,
            Err(ScreeningError::NotFound(msg)) => {
                warn!(username, "No evidence available: {msg}");
                EvidenceProfile::empty(username)
            }
            Err(err) => return Err(err),
        };
        self.caches.evidence.set(key, profile.clone());
        Ok(profile)
    }
}

fn validate_jd(jd_text: &str) -> Result<(), ScreeningError> {
    if jd_text.trim().is_empty() {
        return Err(ScreeningError::Validation(
            "job description is empty".to_string(),
        ));
    }
    Ok(())
}

//! Batch screening: many candidates against one JD, strictly one at a time.
//!
//! Candidates run in input order through the batch limiter. A failed
//! candidate becomes a Failed result and never aborts the batch. Ranks are
//! assigned once every candidate has a score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::ScreeningError;
use crate::pipeline::{
    validate_jd, CandidateInput, CandidateResult, CandidateStatus, Mode, Screener,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub total_candidates: usize,
    /// Candidates analyzed fresh in this batch.
    pub processed: usize,
    pub failed: usize,
    pub cached: usize,
    pub duration_ms: u64,
    /// Ranked results, best first.
    pub results: Vec<CandidateResult>,
}

/// Sorts by score descending and numbers the results 1..=n. The sort is
/// stable, so equal scores keep their input order.
pub fn assign_ranks(results: &mut [CandidateResult]) {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    for (index, result) in results.iter_mut().enumerate() {
        result.rank = Some(index as u32 + 1);
    }
}

impl Screener {
    pub async fn run_batch(
        &self,
        jd_text: &str,
        candidates: &[CandidateInput],
    ) -> Result<BatchJob, ScreeningError> {
        validate_jd(jd_text)?;
        if candidates.is_empty() {
            return Err(ScreeningError::Validation(
                "batch has no candidates".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        info!(batch = %id, candidates = candidates.len(), "Starting batch");

        let mut results = Vec::with_capacity(candidates.len());
        let (mut processed, mut failed, mut cached) = (0, 0, 0);

        for (index, input) in candidates.iter().enumerate() {
            let result = self.process_candidate(input, jd_text, Mode::Batch).await;
            match result.status {
                CandidateStatus::Success => processed += 1,
                CandidateStatus::Failed => failed += 1,
                CandidateStatus::Cached => cached += 1,
            }
            info!(
                batch = %id,
                position = index + 1,
                total = candidates.len(),
                status = ?result.status,
                score = result.score,
                "Candidate finished"
            );
            results.push(result);
        }

        assign_ranks(&mut results);

        let duration_ms = clock.elapsed().as_millis() as u64;
        info!(batch = %id, processed, failed, cached, duration_ms, "Batch complete");

        Ok(BatchJob {
            id,
            started_at,
            total_candidates: candidates.len(),
            processed,
            failed,
            cached,
            duration_ms,
            results,
        })
    }
}

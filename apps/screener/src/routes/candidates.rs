use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::pipeline::batch::BatchJob;
use crate::pipeline::{CandidateInput, CandidateResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub jd_text: String,
    #[serde(flatten)]
    pub candidate: CandidateInput,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub jd_text: String,
    pub candidates: Vec<CandidateInput>,
}

/// POST /api/v1/candidates/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<CandidateResult>, AppError> {
    let result = state.screener.analyze(&req.candidate, &req.jd_text).await?;
    Ok(Json(result))
}

/// POST /api/v1/candidates/batch
/// Runs to completion before responding; failed candidates are reported inline.
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchJob>, AppError> {
    let job = state
        .screener
        .run_batch(&req.jd_text, &req.candidates)
        .await?;
    Ok(Json(job))
}

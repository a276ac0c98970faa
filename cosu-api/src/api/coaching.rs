//! Transcript coaching endpoints
//!
//! - POST /analyze: text score vector plus reasoning
//! - POST /draft: three improvement tips
//! - POST /sample: answer rewritten at a target score
//!
//! These work from an existing transcript and make a single generative call
//! each; no audio is involved.

use axum::{extract::State, routing::post, Json, Router};
use cosu_common::DimensionVector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::{
    parse_score_vector, require_transcript, resolve_exam, resolve_task, validate_target_score,
    validate_time_limit, ApiJson,
};
use crate::assessment::{AssessmentRequest, RewriteRequest, TextAssessment, TipRecord, TipRequest};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /analyze and POST /draft request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRequest {
    pub transcript: Option<String>,
    /// Acoustic baseline for /analyze, final score for /draft
    pub score: Option<Value>,
    pub exam_type: Option<String>,
    pub task_type: Option<String>,
}

/// POST /sample request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequest {
    pub transcript: Option<String>,
    pub target_score: Option<f64>,
    pub exam_type: Option<String>,
    pub task_type: Option<String>,
    pub time_limit_sec: Option<f64>,
    /// Scores the rewrite starts from; zeros when absent
    pub current_score: Option<Value>,
}

/// POST /draft response
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub tips: Vec<TipRecord>,
}

/// POST /sample response
#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub sample: String,
}

/// Score vector or the zero substitute, with whether it was supplied
fn score_or_zero(endpoint: &str, value: Option<&Value>) -> Result<(DimensionVector, bool), ApiError> {
    match parse_score_vector("score", value)? {
        Some(v) => Ok((v, true)),
        None => {
            tracing::warn!(endpoint, "No score supplied, substituting a zero vector");
            Ok((DimensionVector::zero(), false))
        }
    }
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TranscriptRequest>,
) -> ApiResult<Json<TextAssessment>> {
    let transcript = require_transcript(request.transcript.as_deref())?;
    let exam = resolve_exam(request.exam_type.as_deref())?;
    let task = resolve_task(exam, request.task_type.as_deref())?;
    let (baseline, measured) = score_or_zero("/analyze", request.score.as_ref())?;

    let assessment_request = AssessmentRequest {
        transcript,
        exam,
        task,
        baseline,
        tolerance: state.text_scorer.tolerance(),
    };
    let cancel = state.shutdown.child_token();
    let assessment = state
        .text_scorer
        .assess(&assessment_request, measured, &cancel)
        .await?;

    tracing::info!(exam = %exam, task = task.id, overall = assessment.scores.overall, "Transcript analyzed");
    Ok(Json(assessment))
}

/// POST /draft
pub async fn draft(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TranscriptRequest>,
) -> ApiResult<Json<DraftResponse>> {
    let transcript = require_transcript(request.transcript.as_deref())?;
    let exam = resolve_exam(request.exam_type.as_deref())?;
    let task = resolve_task(exam, request.task_type.as_deref())?;
    let (final_score, _) = score_or_zero("/draft", request.score.as_ref())?;

    let tip_request = TipRequest {
        transcript,
        exam,
        task,
        final_score,
    };
    let cancel = state.shutdown.child_token();
    let tips = state.tips.generate(&tip_request, &cancel).await?;

    tracing::info!(exam = %exam, task = task.id, "Improvement tips generated");
    Ok(Json(DraftResponse { tips }))
}

/// POST /sample
pub async fn sample(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SampleRequest>,
) -> ApiResult<Json<SampleResponse>> {
    let transcript = require_transcript(request.transcript.as_deref())?;
    let target_score = validate_target_score(request.target_score)?
        .ok_or_else(|| ApiError::validation("targetScore is required"))?;
    let exam = resolve_exam(request.exam_type.as_deref())?;
    let task = resolve_task(exam, request.task_type.as_deref())?;
    let time_limit_sec = validate_time_limit(request.time_limit_sec)?;
    let current_score = parse_score_vector("currentScore", request.current_score.as_ref())?
        .unwrap_or_else(DimensionVector::zero);

    let rewrite_request = RewriteRequest {
        transcript,
        exam,
        task,
        target_score,
        current_score,
        time_limit_sec,
    };
    let cancel = state.shutdown.child_token();
    let sample = state.rewriter.rewrite(&rewrite_request, &cancel).await?;

    tracing::info!(exam = %exam, task = task.id, target_score, chars = sample.len(), "Sample answer generated");
    Ok(Json(SampleResponse { sample }))
}

/// Build coaching routes
pub fn coaching_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/draft", post(draft))
        .route("/sample", post(sample))
}

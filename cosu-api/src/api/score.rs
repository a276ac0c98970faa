//! Full scoring endpoint
//!
//! POST /score runs the whole pipeline on one audio attempt.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use super::request::{resolve_exam, resolve_task, validate_target_score, validate_time_limit, ApiJson};
use crate::error::{ApiError, ApiResult};
use crate::pipeline::{ScoreReport, ScoringRequest};
use crate::services::AudioClip;
use crate::AppState;

/// POST /score request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub audio_base64: Option<String>,
    pub exam_type: Option<String>,
    pub task_type: Option<String>,
    /// Accepted for the client's convenience; scoring does not use it
    pub target_score: Option<f64>,
    /// Accepted for the client's convenience; scoring does not use it
    pub time_limit_sec: Option<f64>,
}

/// POST /score
pub async fn score(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ScoreRequest>,
) -> ApiResult<Json<ScoreReport>> {
    let audio_base64 = request
        .audio_base64
        .as_deref()
        .ok_or_else(|| ApiError::validation("audioBase64 is required"))?;
    let audio = AudioClip::from_base64(audio_base64)?;
    let exam = resolve_exam(request.exam_type.as_deref())?;
    let task = resolve_task(exam, request.task_type.as_deref())?;
    validate_target_score(request.target_score)?;
    validate_time_limit(request.time_limit_sec)?;

    let cancel = state.shutdown.child_token();
    let outcome = state
        .pipeline
        .run(&ScoringRequest { audio, exam, task }, &cancel)
        .await?;

    tracing::debug!(
        request_id = %outcome.request_id,
        trace = ?outcome.trace,
        tip_error = ?outcome.tip_error,
        "Score response ready"
    );

    Ok(Json(outcome.report))
}

/// Build scoring routes
pub fn score_routes() -> Router<AppState> {
    Router::new().route("/score", post(score))
}

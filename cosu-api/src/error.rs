//! Error types for cosu-api
//!
//! Three layers:
//! - [`CoachError`]: what went wrong (validation, collaborator failure,
//!   unusable generative output, timeout, rate limit, cancellation)
//! - [`PipelineError`]: a `CoachError` tagged with the pipeline stage it came from
//! - [`ApiError`]: HTTP boundary error rendered as a JSON payload

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

use crate::pipeline::PipelineStage;

/// External collaborators the service talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalService {
    Transcription,
    AcousticScoring,
    GenerativeEngine,
}

impl ExternalService {
    pub fn as_str(self) -> &'static str {
        match self {
            ExternalService::Transcription => "transcription service",
            ExternalService::AcousticScoring => "acoustic scoring service",
            ExternalService::GenerativeEngine => "generative engine",
        }
    }

    /// Service-specific failure variant for a non-timeout, non-rate-limit error
    pub fn failure(self, message: impl Into<String>) -> CoachError {
        let message = message.into();
        match self {
            ExternalService::Transcription => CoachError::Transcription(message),
            ExternalService::AcousticScoring => CoachError::AcousticService(message),
            ExternalService::GenerativeEngine => CoachError::GenerativeService(message),
        }
    }

    /// Classify a transport-level `reqwest` failure
    pub fn transport_error(self, err: reqwest::Error, timeout_secs: u64) -> CoachError {
        if err.is_timeout() {
            CoachError::ExternalServiceTimeout {
                service: self,
                timeout_secs,
            }
        } else {
            self.failure(format!("network error: {}", err))
        }
    }

    /// Classify a non-success HTTP status returned by the collaborator
    pub fn status_error(self, status: reqwest::StatusCode, body: &str) -> CoachError {
        match status.as_u16() {
            401 | 403 => self.failure("authentication failed (check the API key)"),
            429 => CoachError::RateLimited { service: self },
            408 | 504 => CoachError::ExternalServiceTimeout {
                service: self,
                timeout_secs: 0,
            },
            code => {
                let body = body.trim();
                let snippet: String = body.chars().take(300).collect();
                self.failure(format!("HTTP {}: {}", code, snippet))
            }
        }
    }
}

impl fmt::Display for ExternalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coaching error taxonomy
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoachError {
    /// Missing or malformed request fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transcription service failure (auth, transport, bad response)
    #[error("Transcription failed: {0}")]
    Transcription(String),

    /// Acoustic scoring service failure
    #[error("Acoustic scoring failed: {0}")]
    AcousticService(String),

    /// Generative engine transport failure
    #[error("Generative engine failed: {0}")]
    GenerativeService(String),

    /// Generative reply that is not valid for the expected shape
    #[error("Assessment parse error: {0}")]
    AssessmentParse(String),

    /// Collaborator did not answer in time
    #[error("{service} timed out")]
    ExternalServiceTimeout {
        service: ExternalService,
        timeout_secs: u64,
    },

    /// Collaborator refused the request for rate reasons
    #[error("{service} rate limited the request")]
    RateLimited { service: ExternalService },

    /// Request was cancelled before completion (shutdown or caller gone)
    #[error("Request cancelled")]
    Cancelled,
}

impl CoachError {
    /// Stable error code for the JSON payload
    pub fn code(&self) -> &'static str {
        match self {
            CoachError::Validation(_) => "VALIDATION_ERROR",
            CoachError::Transcription(_) => "TRANSCRIPTION_ERROR",
            CoachError::AcousticService(_) => "ACOUSTIC_SERVICE_ERROR",
            CoachError::GenerativeService(_) => "GENERATIVE_SERVICE_ERROR",
            CoachError::AssessmentParse(_) => "ASSESSMENT_PARSE_ERROR",
            CoachError::ExternalServiceTimeout { .. } => "EXTERNAL_SERVICE_TIMEOUT",
            CoachError::RateLimited { .. } => "RATE_LIMITED",
            CoachError::Cancelled => "CANCELLED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoachError::Validation(_) => StatusCode::BAD_REQUEST,
            CoachError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            CoachError::ExternalServiceTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            CoachError::Transcription(_)
            | CoachError::AcousticService(_)
            | CoachError::GenerativeService(_)
            | CoachError::AssessmentParse(_) => StatusCode::BAD_GATEWAY,
            CoachError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<cosu_common::Error> for CoachError {
    fn from(err: cosu_common::Error) -> Self {
        CoachError::Validation(err.to_string())
    }
}

/// Failure of a required pipeline stage
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Pipeline stage '{stage}' failed: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: CoachError,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, source: CoachError) -> Self {
        Self { stage, source }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Coaching failure outside the orchestrated pipeline
    #[error(transparent)]
    Coach(#[from] CoachError),

    /// Stage-tagged pipeline failure
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Coach(CoachError::Validation(message.into()))
    }
}

impl From<cosu_common::Error> for ApiError {
    fn from(err: cosu_common::Error) -> Self {
        ApiError::Coach(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Coach(ref err) => (
                err.status(),
                json!({
                    "error": {
                        "code": err.code(),
                        "message": err.to_string(),
                    }
                }),
            ),
            ApiError::Pipeline(ref err) => (
                err.source.status(),
                json!({
                    "error": {
                        "code": err.source.code(),
                        "message": err.source.to_string(),
                        "stage": err.stage.as_str(),
                    }
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

//! Request body extraction and field validation
//!
//! Bodies are camelCase JSON. Malformed JSON and invalid fields both surface
//! as `VALIDATION_ERROR` payloads rather than axum's plain-text rejections.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use cosu_common::{DimensionVector, ExamType, TaskRubric, MAX_SCORE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// JSON body extractor whose rejection is an [`ApiError`]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::validation(rejection.body_text())),
        }
    }
}

/// Exam from an optional identifier; absent means TOEFL, unknown is rejected
pub fn resolve_exam(exam_type: Option<&str>) -> Result<ExamType, ApiError> {
    match exam_type.map(str::trim).filter(|e| !e.is_empty()) {
        None => Ok(ExamType::Toefl),
        Some(id) => Ok(id.parse::<ExamType>()?),
    }
}

/// Task for the exam; absent means the exam's first task
pub fn resolve_task(exam: ExamType, task_type: Option<&str>) -> Result<&'static TaskRubric, ApiError> {
    Ok(exam.profile().resolve_task(task_type)?)
}

/// Non-empty transcript
pub fn require_transcript(transcript: Option<&str>) -> Result<&str, ApiError> {
    transcript
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::validation("transcript is required"))
}

/// Optional score vector; must be a JSON object when present
///
/// Fields are read leniently (missing or non-numeric → 0) and clamped.
pub fn parse_score_vector(field: &str, value: Option<&Value>) -> Result<Option<DimensionVector>, ApiError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Object(_)) => Ok(Some(DimensionVector::from_lenient_json(v))),
        Some(_) => Err(ApiError::validation(format!("{} must be an object", field))),
    }
}

/// Target score on the canonical scale
pub fn validate_target_score(target: Option<f64>) -> Result<Option<f64>, ApiError> {
    match target {
        None => Ok(None),
        Some(t) if t.is_finite() && (0.0..=MAX_SCORE).contains(&t) => Ok(Some(t)),
        Some(t) => Err(ApiError::validation(format!(
            "targetScore must be between 0 and {}, got {}",
            MAX_SCORE, t
        ))),
    }
}

/// Positive time limit in whole seconds
pub fn validate_time_limit(time_limit_sec: Option<f64>) -> Result<Option<u32>, ApiError> {
    match time_limit_sec {
        None => Ok(None),
        Some(t) if t.is_finite() && t > 0.0 && t <= u32::MAX as f64 => Ok(Some(t.round().max(1.0) as u32)),
        Some(t) => Err(ApiError::validation(format!(
            "timeLimitSec must be a positive number of seconds, got {}",
            t
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoachError;
    use serde_json::json;

    fn is_validation(err: ApiError) -> bool {
        matches!(err, ApiError::Coach(CoachError::Validation(_)))
    }

    #[test]
    fn test_resolve_exam() {
        assert_eq!(resolve_exam(None).unwrap(), ExamType::Toefl);
        assert_eq!(resolve_exam(Some("  ")).unwrap(), ExamType::Toefl);
        assert_eq!(resolve_exam(Some("IELTS")).unwrap(), ExamType::Ielts);
        assert!(is_validation(resolve_exam(Some("gre")).unwrap_err()));
    }

    #[test]
    fn test_resolve_task() {
        assert_eq!(resolve_task(ExamType::Pte, None).unwrap().id, "describeImage");
        assert_eq!(resolve_task(ExamType::Ielts, Some("part2")).unwrap().id, "part2");
        assert!(is_validation(resolve_task(ExamType::Ielts, Some("task1")).unwrap_err()));
    }

    #[test]
    fn test_require_transcript() {
        assert_eq!(require_transcript(Some(" hello ")).unwrap(), "hello");
        assert!(is_validation(require_transcript(Some("  ")).unwrap_err()));
        assert!(is_validation(require_transcript(None).unwrap_err()));
    }

    #[test]
    fn test_parse_score_vector() {
        assert_eq!(parse_score_vector("score", None).unwrap(), None);
        assert_eq!(parse_score_vector("score", Some(&Value::Null)).unwrap(), None);
        assert_eq!(
            parse_score_vector("score", Some(&json!({"delivery": 18, "overall": "19"}))).unwrap(),
            Some(DimensionVector::new(18.0, 0.0, 0.0, 19.0))
        );
        assert!(is_validation(parse_score_vector("score", Some(&json!(18))).unwrap_err()));
    }

    #[test]
    fn test_validate_target_and_time_limit() {
        assert_eq!(validate_target_score(Some(23.0)).unwrap(), Some(23.0));
        assert!(is_validation(validate_target_score(Some(31.0)).unwrap_err()));
        assert!(is_validation(validate_target_score(Some(-1.0)).unwrap_err()));

        assert_eq!(validate_time_limit(Some(45.0)).unwrap(), Some(45));
        assert_eq!(validate_time_limit(None).unwrap(), None);
        assert!(is_validation(validate_time_limit(Some(0.0)).unwrap_err()));
    }
}

//! Acoustic scoring service client
//!
//! Sends the raw audio to the acoustic model service (`POST {base}/score`,
//! multipart field `file`) and reads back a four-dimension vector. Missing or
//! non-numeric fields read as 0; the vector is clamped to the canonical scale.

use async_trait::async_trait;
use cosu_common::DimensionVector;
use serde_json::Value;
use std::time::Duration;

use super::{AcousticScorer, AudioClip, USER_AGENT};
use crate::error::{CoachError, ExternalService};

const SERVICE: ExternalService = ExternalService::AcousticScoring;

/// Acoustic scoring HTTP client
pub struct AcousticScoringClient {
    http_client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl AcousticScoringClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, CoachError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SERVICE.failure(format!("client construction failed: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/score", base_url.trim_end_matches('/')),
            timeout_secs,
        })
    }

    /// Interpret the service's JSON reply
    pub fn parse_response(body: &Value) -> Result<DimensionVector, CoachError> {
        if !body.is_object() {
            return Err(SERVICE.failure(format!("expected a JSON object, got {}", body)));
        }
        Ok(DimensionVector::from_lenient_json(body))
    }
}

#[async_trait]
impl AcousticScorer for AcousticScoringClient {
    async fn score(&self, audio: &AudioClip) -> Result<DimensionVector, CoachError> {
        let part = reqwest::multipart::Part::bytes(audio.bytes().to_vec())
            .file_name(audio.file_name())
            .mime_str(audio.mime_type())
            .map_err(|e| CoachError::Validation(format!("unsupported audio MIME type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(bytes = audio.len(), endpoint = %self.endpoint, "Requesting acoustic score");

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SERVICE.transport_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SERVICE.status_error(status, &error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SERVICE.failure(format!("response is not JSON: {}", e)))?;

        let vector = Self::parse_response(&body)?;
        tracing::info!(
            delivery = vector.delivery,
            language_use = vector.language_use,
            topic_dev = vector.topic_dev,
            overall = vector.overall,
            "Acoustic scoring complete"
        );
        Ok(vector)
    }
}

//! Speech-to-text client
//!
//! Uploads the audio attempt to an OpenAI-compatible
//! `/audio/transcriptions` endpoint and returns the plain transcript.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{AudioClip, Transcriber, USER_AGENT};
use crate::error::{CoachError, ExternalService};

const SERVICE: ExternalService = ExternalService::Transcription;

/// Transcription response body
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper transcription client
pub struct WhisperTranscriber {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl WhisperTranscriber {
    pub fn new(
        base_url: &str,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, CoachError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SERVICE.failure(format!("client construction failed: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            api_key,
            model,
            timeout_secs,
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &AudioClip) -> Result<String, CoachError> {
        let part = reqwest::multipart::Part::bytes(audio.bytes().to_vec())
            .file_name(audio.file_name())
            .mime_str(audio.mime_type())
            .map_err(|e| CoachError::Validation(format!("unsupported audio MIME type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        tracing::debug!(
            bytes = audio.len(),
            mime = audio.mime_type(),
            model = %self.model,
            "Requesting transcription"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SERVICE.transport_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SERVICE.status_error(status, &error_text));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SERVICE.failure(format!("unexpected response: {}", e)))?;

        let transcript = body.text.trim().to_string();
        tracing::info!(chars = transcript.len(), "Transcription complete");
        Ok(transcript)
    }
}

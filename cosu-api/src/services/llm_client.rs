//! Generative engine client
//!
//! OpenAI-compatible `/chat/completions` call carrying one user message.
//! The reply text is returned as-is; interpreting it is the job of
//! `assessment::response`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerativeEngine, USER_AGENT};
use crate::error::{CoachError, ExternalService};

const SERVICE: ExternalService = ExternalService::GenerativeEngine;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice; empty when the engine returned none
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

/// Chat-completions client
pub struct OpenAiChatEngine {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
}

impl OpenAiChatEngine {
    pub fn new(
        base_url: &str,
        api_key: String,
        model: String,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, CoachError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SERVICE.failure(format!("client construction failed: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model,
            temperature,
            timeout_secs,
        })
    }
}

#[async_trait]
impl GenerativeEngine for OpenAiChatEngine {
    async fn complete(&self, instruction: &str) -> Result<String, CoachError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [ChatMessage {
                role: "user",
                content: instruction,
            }],
        };

        tracing::debug!(
            model = %self.model,
            instruction_chars = instruction.len(),
            "Calling generative engine"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SERVICE.transport_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SERVICE.status_error(status, &error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SERVICE.failure(format!("unexpected response: {}", e)))?;

        let text = body.into_text();
        tracing::debug!(reply_chars = text.len(), "Generative engine replied");
        Ok(text)
    }
}

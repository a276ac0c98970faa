//! Test support for cosu-api
//!
//! In-process fakes for the three collaborators plus router helpers. No
//! test touches the network.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cosu_api::error::{CoachError, ExternalService};
use cosu_api::services::{AcousticScorer, AudioClip, GenerativeEngine, Transcriber};
use cosu_api::{build_router, AppState, Collaborators};
use cosu_common::config::AssessmentConfig;
use cosu_common::DimensionVector;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub const TRANSCRIPT: &str = "I prefer studying alone because the library is quiet and I can focus.";
pub const AUDIO_BASE64: &str = "aGVsbG8=";

/// Acoustic vector used by most tests (Low band)
pub fn acoustic_vector() -> DimensionVector {
    DimensionVector::new(15.0, 16.0, 14.0, 15.0)
}

/// Text score reply inside the ±2 window of [`acoustic_vector`]
pub fn analysis_reply() -> String {
    json!({
        "delivery": 17, "language_use": 15, "topic_dev": 16, "overall": 16,
        "reasoning": {
            "delivery": "Some hesitation but steady pace.",
            "language_use": "Simple but mostly correct.",
            "topic_dev": "One reason, thin example.",
            "exam_specific": "Fits an independent task."
        }
    })
    .to_string()
}

fn tip(dimension: &str) -> Value {
    json!({
        "dimension": dimension,
        "title": format!("Work on {}", dimension),
        "detail": "Specific detail.",
        "next_practice": "Record a 45-second answer daily."
    })
}

/// Three-tip reply, fenced the way chat models often return JSON
pub fn tips_reply() -> String {
    let body = json!({ "tips": [tip("delivery"), tip("language_use"), tip("delivery")] });
    format!("```json\n{}\n```", body)
}

pub fn two_tips_reply() -> String {
    json!({ "tips": [tip("delivery"), tip("topic_dev")] }).to_string()
}

pub const REWRITE_REPLY: &str = "  Personally, I prefer studying alone, mainly because the library is quiet.  \n";

/// Transcriber returning a fixed result
pub struct FakeTranscriber {
    result: Result<String, CoachError>,
    barrier: Option<Arc<Barrier>>,
}

impl FakeTranscriber {
    pub fn ok(transcript: &str) -> Self {
        Self {
            result: Ok(transcript.to_string()),
            barrier: None,
        }
    }

    pub fn failing(err: CoachError) -> Self {
        Self {
            result: Err(err),
            barrier: None,
        }
    }

    /// Wait at `barrier` before answering
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, _audio: &AudioClip) -> Result<String, CoachError> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.result.clone()
    }
}

/// Acoustic scorer returning a fixed result
pub struct FakeAcoustic {
    result: Result<DimensionVector, CoachError>,
    barrier: Option<Arc<Barrier>>,
}

impl FakeAcoustic {
    pub fn ok(vector: DimensionVector) -> Self {
        Self {
            result: Ok(vector),
            barrier: None,
        }
    }

    pub fn failing(err: CoachError) -> Self {
        Self {
            result: Err(err),
            barrier: None,
        }
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }
}

#[async_trait]
impl AcousticScorer for FakeAcoustic {
    async fn score(&self, _audio: &AudioClip) -> Result<DimensionVector, CoachError> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.result.clone()
    }
}

/// Generative engine answering by instruction kind, recording every instruction
pub struct ScriptedEngine {
    analysis: Result<String, CoachError>,
    tips: Result<String, CoachError>,
    rewrite: Result<String, CoachError>,
    instructions: Mutex<Vec<String>>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self {
            analysis: Ok(analysis_reply()),
            tips: Ok(tips_reply()),
            rewrite: Ok(REWRITE_REPLY.to_string()),
            instructions: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedEngine {
    pub fn analysis(mut self, reply: Result<String, CoachError>) -> Self {
        self.analysis = reply;
        self
    }

    pub fn tips(mut self, reply: Result<String, CoachError>) -> Self {
        self.tips = reply;
        self
    }

    pub fn rewrite(mut self, reply: Result<String, CoachError>) -> Self {
        self.rewrite = reply;
        self
    }

    pub fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeEngine for ScriptedEngine {
    async fn complete(&self, instruction: &str) -> Result<String, CoachError> {
        self.instructions.lock().unwrap().push(instruction.to_string());
        if instruction.contains("strict speaking examiner") {
            self.analysis.clone()
        } else if instruction.contains("EXACTLY 3") {
            self.tips.clone()
        } else if instruction.contains("Rewrite the candidate's answer") {
            self.rewrite.clone()
        } else {
            Err(CoachError::GenerativeService("unexpected instruction".to_string()))
        }
    }
}

pub fn rate_limited(service: ExternalService) -> CoachError {
    CoachError::RateLimited { service }
}

/// Collaborator set with the default happy-path fakes
pub struct Fakes {
    pub transcriber: FakeTranscriber,
    pub acoustic: FakeAcoustic,
    pub engine: Arc<ScriptedEngine>,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            transcriber: FakeTranscriber::ok(TRANSCRIPT),
            acoustic: FakeAcoustic::ok(acoustic_vector()),
            engine: Arc::new(ScriptedEngine::default()),
        }
    }
}

impl Fakes {
    pub fn collaborators(self) -> Collaborators {
        Collaborators {
            transcriber: Arc::new(self.transcriber),
            acoustic: Arc::new(self.acoustic),
            engine: self.engine,
        }
    }

    pub fn state(self) -> AppState {
        AppState::new(self.collaborators(), AssessmentConfig::default(), CancellationToken::new())
    }

    pub fn router(self) -> Router {
        build_router(self.state())
    }
}

/// POST a JSON body and return status plus parsed response body
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Float comparison for a JSON number
pub fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .map(|v| (v - expected).abs() < 1e-9)
        .unwrap_or(false)
}

//! cosu-api library interface
//!
//! Speaking-exam coaching service: transcribes and scores an audio attempt,
//! fuses the acoustic and text signals, maps the result onto the candidate's
//! exam scale and generates coaching feedback.

pub mod api;
pub mod assessment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use cosu_common::config::AssessmentConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::assessment::{TargetLevelRewriter, TextScorer, TipGenerator};
use crate::pipeline::Pipeline;
use crate::services::{AcousticScorer, GenerativeEngine, Transcriber};

/// Largest accepted request body (base64 audio)
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// External collaborators, constructed once at startup
#[derive(Clone)]
pub struct Collaborators {
    pub transcriber: Arc<dyn Transcriber>,
    pub acoustic: Arc<dyn AcousticScorer>,
    pub engine: Arc<dyn GenerativeEngine>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub text_scorer: Arc<TextScorer>,
    pub tips: Arc<TipGenerator>,
    pub rewriter: Arc<TargetLevelRewriter>,
    /// Root cancellation token; cancelled on shutdown
    pub shutdown: CancellationToken,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(collaborators: Collaborators, settings: AssessmentConfig, shutdown: CancellationToken) -> Self {
        let Collaborators {
            transcriber,
            acoustic,
            engine,
        } = collaborators;

        Self {
            pipeline: Arc::new(Pipeline::new(
                transcriber,
                acoustic,
                engine.clone(),
                settings.clone(),
            )),
            text_scorer: Arc::new(TextScorer::new(engine.clone(), settings)),
            tips: Arc::new(TipGenerator::new(engine.clone())),
            rewriter: Arc::new(TargetLevelRewriter::new(engine)),
            shutdown,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::score_routes())
        .merge(api::coaching_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

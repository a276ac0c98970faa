//! Pipeline orchestrator
//!
//! Runs one scoring request end to end:
//! - **Transcription** and **acoustic scoring** (concurrent, both consume the raw audio;
//!   the first failure cancels the other)
//! - **Text scoring** against the acoustic baseline
//! - **Fusion** and **mapping** onto the exam's native scale
//! - **Tip generation** (best-effort)
//!
//! # Error Handling
//! - Required stages abort the run with a stage-tagged [`PipelineError`]
//! - Tip generation failures degrade to an empty tip list
//! - Every external call is raced against the request's cancellation token

mod state;

pub use state::{PipelineStage, PipelineState};

use cosu_common::config::AssessmentConfig;
use cosu_common::{fuse_scores, map_final_score_to_ui, DimensionVector, ExamType, ExamUiScore, FusionResult, TaskRubric};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::assessment::{AssessmentRequest, TextAssessment, TextScorer, TipGenerator, TipRecord, TipRequest};
use crate::error::{CoachError, PipelineError};
use crate::services::{cancellable, AcousticScorer, AudioClip, GenerativeEngine, Transcriber};

/// One scoring request
#[derive(Debug, Clone)]
pub struct ScoringRequest {
    pub audio: AudioClip,
    pub exam: ExamType,
    pub task: &'static TaskRubric,
}

/// Scoring result returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub transcript: String,
    pub acoustic_score: DimensionVector,
    pub text_score: TextAssessment,
    pub final_score: FusionResult,
    pub exam_ui_score: ExamUiScore,
    /// Possibly empty when tip generation failed
    pub improvements: Vec<TipRecord>,
}

/// Report plus run metadata
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub request_id: Uuid,
    pub report: ScoreReport,
    /// States visited, in order
    pub trace: Vec<PipelineState>,
    /// Why the tip list is empty, if tip generation failed
    pub tip_error: Option<CoachError>,
}

/// Per-run bookkeeping
struct Run {
    request_id: Uuid,
    trace: Vec<PipelineState>,
}

impl Run {
    fn start() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            trace: vec![PipelineState::Init],
        }
    }

    fn enter(&mut self, state: PipelineState) {
        debug!(request_id = %self.request_id, state = %state, "Pipeline state");
        self.trace.push(state);
    }

    /// Log a stage failure; only required stages move the run to FAILED
    fn record_failure(&mut self, stage: PipelineStage, source: &CoachError) {
        if stage.is_required() {
            error!(request_id = %self.request_id, stage = %stage, error = %source, "Pipeline stage failed");
            self.trace.push(PipelineState::Failed);
        } else {
            warn!(
                request_id = %self.request_id,
                stage = %stage,
                error = %source,
                "Optional stage failed, continuing without it"
            );
        }
    }

    fn fail(&mut self, stage: PipelineStage, source: CoachError) -> PipelineError {
        self.record_failure(stage, &source);
        PipelineError::new(stage, source)
    }
}

/// Pipeline orchestrator
pub struct Pipeline {
    transcriber: Arc<dyn Transcriber>,
    acoustic: Arc<dyn AcousticScorer>,
    text_scorer: TextScorer,
    tips: TipGenerator,
}

impl Pipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        acoustic: Arc<dyn AcousticScorer>,
        engine: Arc<dyn GenerativeEngine>,
        settings: AssessmentConfig,
    ) -> Self {
        Self {
            transcriber,
            acoustic,
            text_scorer: TextScorer::new(engine.clone(), settings),
            tips: TipGenerator::new(engine),
        }
    }

    /// Run the full scoring pipeline
    pub async fn run(
        &self,
        request: &ScoringRequest,
        cancel: &CancellationToken,
    ) -> Result<PipelineOutcome, PipelineError> {
        let mut run = Run::start();
        info!(
            request_id = %run.request_id,
            exam = %request.exam,
            task = request.task.id,
            audio_bytes = request.audio.len(),
            "Scoring request started"
        );

        // Transcription and acoustic scoring only need the audio
        run.enter(PipelineState::Transcribing);
        run.enter(PipelineState::AcousticScoring);
        // The first required failure drops the other call
        let (transcript, acoustic) = tokio::try_join!(
            async {
                cancellable(cancel, self.transcriber.transcribe(&request.audio))
                    .await
                    .map_err(|e| (PipelineStage::Transcription, e))
            },
            async {
                cancellable(cancel, self.acoustic.score(&request.audio))
                    .await
                    .map_err(|e| (PipelineStage::AcousticScoring, e))
            },
        )
        .map_err(|(stage, e)| run.fail(stage, e))?;
        let acoustic = acoustic.clamped();

        run.enter(PipelineState::TextScoring);
        let assessment_request = AssessmentRequest {
            transcript: &transcript,
            exam: request.exam,
            task: request.task,
            baseline: acoustic,
            tolerance: self.text_scorer.tolerance(),
        };
        let text_score = self
            .text_scorer
            .assess(&assessment_request, true, cancel)
            .await
            .map_err(|e| run.fail(PipelineStage::TextScoring, e))?;

        run.enter(PipelineState::Fusing);
        let final_score = fuse_scores(&acoustic, &text_score.scores);

        run.enter(PipelineState::Mapping);
        let exam_ui_score = map_final_score_to_ui(&final_score, request.exam);

        run.enter(PipelineState::TipGeneration);
        let tip_request = TipRequest {
            transcript: &transcript,
            exam: request.exam,
            task: request.task,
            final_score: final_score.fused,
        };
        let (improvements, tip_error) = match self.tips.generate(&tip_request, cancel).await {
            Ok(tips) => (tips, None),
            Err(e) => {
                run.record_failure(PipelineStage::TipGeneration, &e);
                (Vec::new(), Some(e))
            }
        };

        run.enter(PipelineState::Done);
        info!(
            request_id = %run.request_id,
            overall = final_score.fused.overall,
            band = %final_score.band.label,
            ui_overall = exam_ui_score.overall,
            tips = improvements.len(),
            "Scoring request complete"
        );

        Ok(PipelineOutcome {
            request_id: run.request_id,
            report: ScoreReport {
                transcript,
                acoustic_score: acoustic,
                text_score,
                final_score,
                exam_ui_score,
                improvements,
            },
            trace: run.trace,
            tip_error,
        })
    }
}

//! Pipeline states and stages

use serde::Serialize;
use std::fmt;

/// Stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Transcription,
    AcousticScoring,
    TextScoring,
    Fusion,
    Mapping,
    TipGeneration,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Transcription => "transcription",
            PipelineStage::AcousticScoring => "acoustic_scoring",
            PipelineStage::TextScoring => "text_scoring",
            PipelineStage::Fusion => "fusion",
            PipelineStage::Mapping => "mapping",
            PipelineStage::TipGeneration => "tip_generation",
        }
    }

    /// Whether a failure here aborts the run
    pub fn is_required(self) -> bool {
        !matches!(self, PipelineStage::TipGeneration)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orchestrator state machine
///
/// `INIT → TRANSCRIBING → ACOUSTIC_SCORING → TEXT_SCORING → FUSING → MAPPING
/// → TIP_GENERATION → DONE`, with `FAILED` reachable from any required stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Init,
    Transcribing,
    AcousticScoring,
    TextScoring,
    Fusing,
    Mapping,
    TipGeneration,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Init => "INIT",
            PipelineState::Transcribing => "TRANSCRIBING",
            PipelineState::AcousticScoring => "ACOUSTIC_SCORING",
            PipelineState::TextScoring => "TEXT_SCORING",
            PipelineState::Fusing => "FUSING",
            PipelineState::Mapping => "MAPPING",
            PipelineState::TipGeneration => "TIP_GENERATION",
            PipelineState::Done => "DONE",
            PipelineState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_tip_generation_is_optional() {
        assert!(PipelineStage::Transcription.is_required());
        assert!(PipelineStage::Mapping.is_required());
        assert!(!PipelineStage::TipGeneration.is_required());
    }

    #[test]
    fn test_state_wire_names() {
        assert_eq!(
            serde_json::to_value(PipelineState::AcousticScoring).unwrap(),
            "ACOUSTIC_SCORING"
        );
        assert_eq!(PipelineState::TipGeneration.to_string(), "TIP_GENERATION");
    }
}

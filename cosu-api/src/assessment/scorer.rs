//! Text scoring against the acoustic baseline
//!
//! The engine is asked to stay within the tolerance of the baseline; when
//! enforcement is on, the parsed vector is clamped to that window as well.

use cosu_common::config::AssessmentConfig;
use cosu_common::score::clamp_score;
use cosu_common::DimensionVector;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::instructions::{analysis_instruction, AssessmentRequest};
use super::response::{parse_text_assessment, TextAssessment};
use crate::error::CoachError;
use crate::services::{cancellable, GenerativeEngine};

/// Clamp each field of `text` to `baseline ± tolerance`, then to [0, 30]
pub fn enforce_baseline_tolerance(
    text: &DimensionVector,
    baseline: &DimensionVector,
    tolerance: f64,
) -> DimensionVector {
    let tolerance = tolerance.max(0.0);
    text.zip_with(baseline, |t, b| clamp_score(t.max(b - tolerance).min(b + tolerance)))
}

/// Text-scoring step: instruction, engine call, parse, tolerance
pub struct TextScorer {
    engine: Arc<dyn GenerativeEngine>,
    settings: AssessmentConfig,
}

impl TextScorer {
    pub fn new(engine: Arc<dyn GenerativeEngine>, settings: AssessmentConfig) -> Self {
        Self { engine, settings }
    }

    pub fn tolerance(&self) -> f64 {
        self.settings.baseline_tolerance
    }

    /// Score a transcript
    ///
    /// `measured_baseline` is false when the baseline was substituted rather
    /// than measured; enforcement is skipped in that case.
    pub async fn assess(
        &self,
        request: &AssessmentRequest<'_>,
        measured_baseline: bool,
        cancel: &CancellationToken,
    ) -> Result<TextAssessment, CoachError> {
        let instruction = analysis_instruction(request);
        let reply = cancellable(cancel, self.engine.complete(&instruction)).await?;
        let mut assessment = parse_text_assessment(&reply)?;

        if self.settings.enforce_baseline_tolerance && measured_baseline {
            let bounded = enforce_baseline_tolerance(
                &assessment.scores,
                &request.baseline,
                self.settings.baseline_tolerance,
            );
            if bounded != assessment.scores {
                tracing::info!(
                    reported = ?assessment.scores,
                    adjusted = ?bounded,
                    tolerance = self.settings.baseline_tolerance,
                    "Text score outside baseline tolerance, clamped"
                );
                assessment.scores = bounded;
            }
        }

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enforce_within_window_is_identity() {
        let baseline = DimensionVector::new(15.0, 16.0, 14.0, 15.0);
        let text = DimensionVector::new(17.0, 15.0, 16.0, 16.0);
        assert_eq!(enforce_baseline_tolerance(&text, &baseline, 2.0), text);
    }

    #[test]
    fn test_enforce_clamps_outliers() {
        let baseline = DimensionVector::new(15.0, 16.0, 29.0, 1.0);
        let text = DimensionVector::new(25.0, 10.0, 30.0, 0.0);
        assert_eq!(
            enforce_baseline_tolerance(&text, &baseline, 2.0),
            DimensionVector::new(17.0, 14.0, 30.0, 0.0)
        );
    }

    #[test]
    fn test_zero_tolerance_pins_to_baseline() {
        let baseline = DimensionVector::new(12.0, 13.0, 14.0, 13.0);
        let text = DimensionVector::uniform(20.0);
        assert_eq!(enforce_baseline_tolerance(&text, &baseline, 0.0), baseline);
    }
}

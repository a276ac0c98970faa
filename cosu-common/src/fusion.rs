//! Score fusion
//!
//! Combines the acoustic vector and the text vector into one final vector
//! with weights that depend on the average of the two *input* overalls. The
//! reported band is classified from that same average, never from the fused
//! result.

use crate::rubrics::{get_band, ScoreBand};
use crate::score::{clamp_score, round2, DimensionVector};
use serde::Serialize;

/// Weight pair applied to the two signals; always sums to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionWeights {
    pub acoustic: f64,
    pub text: f64,
}

impl FusionWeights {
    /// Weights for an average overall: the lower it is, the more the acoustic signal counts
    ///
    /// Thresholds are continuous (`<= 17`, `<= 22`), so averages in the gaps
    /// between band ranges still get the pair of the range below.
    pub fn for_overall(avg_overall: f64) -> Self {
        let s = clamp_score(avg_overall);
        if s <= 17.0 {
            Self { acoustic: 0.7, text: 0.3 }
        } else if s <= 22.0 {
            Self { acoustic: 0.6, text: 0.4 }
        } else {
            Self { acoustic: 0.5, text: 0.5 }
        }
    }
}

/// Both inputs after clamping
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedInputs {
    pub acoustic: DimensionVector,
    pub text: DimensionVector,
}

/// Outcome of a fusion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionResult {
    /// Final vector, clamped and rounded to two decimals
    pub fused: DimensionVector,
    pub weights: FusionWeights,
    /// Band of the pre-fusion average overall
    pub band: ScoreBand,
    #[serde(rename = "normalizedInputs")]
    pub normalized_inputs: NormalizedInputs,
}

/// Fuse the acoustic and text vectors
///
/// 1. Clamp both inputs to [0, 30].
/// 2. Average the two overalls and classify the average into a band.
/// 3. Pick the weight pair for the average.
/// 4. Blend each field, clamp, round to two decimals.
pub fn fuse_scores(acoustic: &DimensionVector, text: &DimensionVector) -> FusionResult {
    let acoustic = acoustic.clamped();
    let text = text.clamped();

    let avg_overall = (acoustic.overall + text.overall) / 2.0;
    let band = get_band(avg_overall);
    let weights = FusionWeights::for_overall(avg_overall);

    let fused = acoustic.zip_with(&text, |a, t| {
        round2(clamp_score(weights.acoustic * a + weights.text * t))
    });

    tracing::debug!(
        avg_overall,
        band = %band.label,
        w_acoustic = weights.acoustic,
        w_text = weights.text,
        fused_overall = fused.overall,
        "Fused acoustic and text scores"
    );

    FusionResult {
        fused,
        weights,
        band: *band,
        normalized_inputs: NormalizedInputs { acoustic, text },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubrics::BandLabel;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_weights_sum_to_one() {
        for avg in [0.0, 17.0, 17.5, 22.0, 22.5, 30.0] {
            let w = FusionWeights::for_overall(avg);
            assert_eq!(w.acoustic + w.text, 1.0);
        }
    }

    #[test]
    fn test_agreeing_inputs_fuse_to_themselves() {
        let v = DimensionVector::uniform(20.0);
        let result = fuse_scores(&v, &v);
        assert_eq!(result.fused, v);
        assert_eq!(result.band.label, BandLabel::Mid);
    }

    #[test]
    fn test_low_band_weighting_example() {
        let acoustic = DimensionVector::new(15.0, 16.0, 14.0, 15.0);
        let text = DimensionVector::new(17.0, 15.0, 16.0, 16.0);
        let result = fuse_scores(&acoustic, &text);

        assert_eq!(result.band.label, BandLabel::Low);
        assert_eq!(result.weights, FusionWeights { acoustic: 0.7, text: 0.3 });
        assert!(approx(result.fused.delivery, 15.6));
        assert!(approx(result.fused.language_use, 15.7));
        assert!(approx(result.fused.topic_dev, 14.6));
        assert!(approx(result.fused.overall, 15.3));
    }

    #[test]
    fn test_band_reflects_average_not_fused_overall() {
        // avg = 23 -> High, fused overall = 0.5*30 + 0.5*16 = 23
        let acoustic = DimensionVector::uniform(30.0);
        let text = DimensionVector::uniform(16.0);
        let result = fuse_scores(&acoustic, &text);
        assert_eq!(result.band.label, BandLabel::High);
        assert_eq!(result.weights.acoustic, 0.5);
    }

    #[test]
    fn test_average_between_bands() {
        // avg 17.5: no band range contains it, weights come from the <= 22 threshold
        let acoustic = DimensionVector::uniform(17.0);
        let text = DimensionVector::uniform(18.0);
        let result = fuse_scores(&acoustic, &text);
        assert_eq!(result.band.label, BandLabel::High);
        assert_eq!(result.weights, FusionWeights { acoustic: 0.6, text: 0.4 });
        assert!(approx(result.fused.overall, 17.4));
    }

    #[test]
    fn test_normalized_inputs_wire_name() {
        let v = DimensionVector::uniform(20.0);
        let wire = serde_json::to_value(fuse_scores(&v, &v)).unwrap();
        assert!(wire.get("normalizedInputs").is_some());
        assert!(wire.get("normalized_inputs").is_none());
    }

    #[test]
    fn test_out_of_range_inputs_are_normalized() {
        let acoustic = DimensionVector::new(45.0, -3.0, f64::NAN, 40.0);
        let text = DimensionVector::uniform(30.0);
        let result = fuse_scores(&acoustic, &text);
        assert_eq!(result.normalized_inputs.acoustic, DimensionVector::new(30.0, 0.0, 0.0, 30.0));
        assert_eq!(result.fused.delivery, 30.0);
        assert_eq!(result.fused.language_use, 15.0);
    }
}

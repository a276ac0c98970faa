//! Cross-exam score mapping
//!
//! Linear, boundary-exact translation of canonical 0–30 scores onto each
//! exam's native scale. The non-linear band correspondences quoted in the
//! analysis instruction are descriptive only and are not used here.

use crate::exam::{ExamType, ScaleRange};
use crate::fusion::FusionResult;
use crate::score::{clamp_score, MAX_SCORE};
use serde::Serialize;

/// IELTS band, one decimal place
pub fn to_ielts(x: f64) -> f64 {
    ((clamp_score(x) / MAX_SCORE * 9.0) * 10.0).round() / 10.0
}

/// PTE score, whole number
pub fn to_pte(x: f64) -> f64 {
    (clamp_score(x) / MAX_SCORE * 90.0).round()
}

/// Duolingo score, whole number
pub fn to_duolingo(x: f64) -> f64 {
    (clamp_score(x) / MAX_SCORE * 160.0).round()
}

/// Map one canonical score onto the exam's native scale
pub fn map_dimension_score(x: f64, exam: ExamType) -> f64 {
    match exam {
        ExamType::Toefl => clamp_score(x),
        ExamType::Ielts => to_ielts(x),
        ExamType::Pte => to_pte(x),
        ExamType::Duolingo => to_duolingo(x),
    }
}

/// Final score as shown to the candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamUiScore {
    #[serde(rename = "examType")]
    pub exam_type: ExamType,
    pub overall: f64,
    pub delivery: f64,
    pub language_use: f64,
    pub topic_dev: f64,
    /// Native scale of the exam
    #[serde(rename = "totalRange")]
    pub total_range: ScaleRange,
    /// Canonical overall before mapping
    #[serde(rename = "rawOverall")]
    pub raw_overall: f64,
}

/// Map every fused field onto the exam's native scale
pub fn map_final_score_to_ui(result: &FusionResult, exam: ExamType) -> ExamUiScore {
    let fused = &result.fused;
    ExamUiScore {
        exam_type: exam,
        overall: map_dimension_score(fused.overall, exam),
        delivery: map_dimension_score(fused.delivery, exam),
        language_use: map_dimension_score(fused.language_use, exam),
        topic_dev: map_dimension_score(fused.topic_dev, exam),
        total_range: exam.profile().native_range,
        raw_overall: fused.overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(to_ielts(30.0), 9.0);
        assert_eq!(to_ielts(0.0), 0.0);
        assert_eq!(to_pte(30.0), 90.0);
        assert_eq!(to_pte(0.0), 0.0);
        assert_eq!(to_duolingo(30.0), 160.0);
        assert_eq!(to_duolingo(0.0), 0.0);
    }

    #[test]
    fn test_midpoints() {
        assert_eq!(to_ielts(20.0), 6.0);
        assert_eq!(to_ielts(15.3), 4.6);
        assert_eq!(to_pte(15.3), 46.0);
        assert_eq!(to_duolingo(15.3), 82.0);
    }

    #[test]
    fn test_toefl_is_identity() {
        assert_eq!(map_dimension_score(15.3, ExamType::Toefl), 15.3);
    }

    #[test]
    fn test_ui_score_wire_names() {
        let v = crate::score::DimensionVector::new(18.0, 17.0, 16.0, 17.4);
        let fused = crate::fusion::fuse_scores(&v, &v);
        let wire = serde_json::to_value(map_final_score_to_ui(&fused, ExamType::Ielts)).unwrap();

        assert_eq!(wire["examType"], "ielts");
        assert_eq!(wire["overall"], 5.2);
        assert_eq!(wire["language_use"], 5.1);
        assert_eq!(wire["totalRange"]["max"], 9.0);
        assert_eq!(wire["rawOverall"], 17.4);
        assert!(wire.get("exam_type").is_none());
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        let mut prev = [0.0f64; 3];
        for step in 0..=3000 {
            let x = f64::from(step) / 100.0;
            let now = [to_ielts(x), to_pte(x), to_duolingo(x)];
            for i in 0..3 {
                assert!(now[i] >= prev[i], "mapping {} decreased at x={}", i, x);
            }
            prev = now;
        }
    }
}

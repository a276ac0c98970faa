//! Property sweeps over the pure scoring pipeline
//!
//! Banding, weighting, fusion and cross-exam mapping checked across the
//! whole canonical range rather than at single points.

use cosu_common::mapping::{to_duolingo, to_ielts, to_pte};
use cosu_common::rubrics::SCORE_BANDS;
use cosu_common::{
    fuse_scores, get_band, map_final_score_to_ui, BandLabel, DimensionVector, ExamType,
    FusionWeights,
};

/// Canonical scores from 0.00 to 30.00 in steps of 0.05
fn sweep() -> impl Iterator<Item = f64> {
    (0..=600).map(|i| f64::from(i) * 0.05)
}

#[test]
fn test_every_score_belongs_to_exactly_one_band() {
    for s in sweep() {
        let band = get_band(s);
        let containing: Vec<_> = SCORE_BANDS
            .iter()
            .filter(|b| b.lo() <= s && s <= b.hi())
            .collect();

        match containing.as_slice() {
            [only] => assert_eq!(only.label, band.label, "score {}", s),
            [] => assert_eq!(band.label, BandLabel::High, "gap score {} should fall back", s),
            _ => panic!("score {} matched {} bands", s, containing.len()),
        }
    }
}

#[test]
fn test_weights_always_sum_to_one() {
    for avg in sweep() {
        let w = FusionWeights::for_overall(avg);
        assert_eq!(w.acoustic + w.text, 1.0, "avg {}", avg);
    }
}

#[test]
fn test_fused_fields_stay_in_range() {
    let extremes = [-50.0, -0.1, 0.0, 12.3, 17.0, 17.5, 22.0, 29.99, 30.0, 30.1, 1e6];
    for a in extremes {
        for t in extremes {
            let acoustic = DimensionVector::new(a, t, a, t);
            let text = DimensionVector::new(t, a, a, t);
            let fused = fuse_scores(&acoustic, &text).fused;
            for value in [fused.delivery, fused.language_use, fused.topic_dev, fused.overall] {
                assert!((0.0..=30.0).contains(&value), "a={} t={} -> {}", a, t, value);
            }
        }
    }
}

#[test]
fn test_low_band_pair_selected_for_overall_ten() {
    let v = DimensionVector::uniform(10.0);
    let result = fuse_scores(&v, &v);
    assert_eq!(result.band.label, BandLabel::Low);
    assert_eq!(result.weights, FusionWeights { acoustic: 0.7, text: 0.3 });
    assert!((result.fused.overall - 10.0).abs() < 1e-9);
}

#[test]
fn test_fused_result_maps_onto_every_exam() {
    let acoustic = DimensionVector::new(15.0, 16.0, 14.0, 15.0);
    let text = DimensionVector::new(17.0, 15.0, 16.0, 16.0);
    let result = fuse_scores(&acoustic, &text);

    let toefl = map_final_score_to_ui(&result, ExamType::Toefl);
    assert!((toefl.overall - 15.3).abs() < 1e-9);
    assert_eq!(toefl.total_range.max, 30.0);

    let ielts = map_final_score_to_ui(&result, ExamType::Ielts);
    assert_eq!(ielts.overall, 4.6);
    assert_eq!(ielts.delivery, 4.7);
    assert_eq!(ielts.total_range.max, 9.0);
    assert!((ielts.raw_overall - 15.3).abs() < 1e-9);

    let pte = map_final_score_to_ui(&result, ExamType::Pte);
    assert_eq!(pte.overall, 46.0);
    assert_eq!(pte.total_range.min, 10.0);

    let duolingo = map_final_score_to_ui(&result, ExamType::Duolingo);
    assert_eq!(duolingo.overall, 82.0);
    assert_eq!(duolingo.exam_type, ExamType::Duolingo);
}

#[test]
fn test_mapping_boundaries_are_exact() {
    assert_eq!(to_ielts(30.0), 9.0);
    assert_eq!(to_ielts(0.0), 0.0);
    assert_eq!(to_pte(30.0), 90.0);
    assert_eq!(to_duolingo(30.0), 160.0);
}

//! Rubric registry
//!
//! Score bands, the generic per-dimension text rubric, and descriptive
//! rubrics for fixed target-score anchors. Pure data plus pure lookups.

use crate::exam::ExamType;
use crate::score::clamp_score;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Score bands
// ============================================================================

/// Band label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BandLabel {
    Low,
    Mid,
    High,
}

impl fmt::Display for BandLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BandLabel::Low => "Low",
            BandLabel::Mid => "Mid",
            BandLabel::High => "High",
        };
        f.write_str(s)
    }
}

/// Score band on the canonical scale
///
/// `range` holds the integer endpoints `[lo, hi]`, both inclusive. Scores in
/// the gap between two bands (e.g. 17.5) match no range and fall back to the
/// highest band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBand {
    pub label: BandLabel,
    pub range: [f64; 2],
    pub description: &'static str,
}

impl ScoreBand {
    pub fn lo(&self) -> f64 {
        self.range[0]
    }

    pub fn hi(&self) -> f64 {
        self.range[1]
    }
}

/// Bands in ascending order; they partition [0, 30]
pub static SCORE_BANDS: [ScoreBand; 3] = [
    ScoreBand {
        label: BandLabel::Low,
        range: [0.0, 17.0],
        description: "Clearly lacking fluency: frequent pauses, little information, frequent grammar and vocabulary errors, incomplete overall expression.",
    },
    ScoreBand {
        label: BandLabel::Mid,
        range: [18.0, 22.0],
        description: "Expresses ideas with basic fluency and most meaning is clear, but development and detail are lacking. Grammar and vocabulary still have significant room for improvement.",
    },
    ScoreBand {
        label: BandLabel::High,
        range: [23.0, 30.0],
        description: "Natural expression, clear structure, accurate grammar and vocabulary, complete content with details; approaching or at a high score.",
    },
];

/// Band for a canonical score
///
/// The score is clamped to [0, 30] first. The first band whose range
/// contains the score wins; the highest band is the fallback.
pub fn get_band(score: f64) -> &'static ScoreBand {
    let s = clamp_score(score);
    SCORE_BANDS
        .iter()
        .find(|band| band.lo() <= s && s <= band.hi())
        .unwrap_or(&SCORE_BANDS[SCORE_BANDS.len() - 1])
}

// ============================================================================
// Generic text rubric
// ============================================================================

/// Per-dimension description of a good answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRubric {
    pub delivery: &'static str,
    pub language_use: &'static str,
    pub topic_dev: &'static str,
}

pub static GENERIC_TEXT_RUBRIC: TextRubric = TextRubric {
    delivery: "Natural, clear pronunciation and intonation with a reasonable rhythm; pauses are mainly for thinking or structure rather than getting stuck; examiners can follow easily.",
    language_use: "Grammar is basically correct, sentence patterns show some variety, vocabulary expresses meaning accurately with appropriate collocations, without leaning on very simple sentences over and over.",
    topic_dev: "Clear structure (opening, reasons or details, conclusion) with enough information density and examples to support the viewpoint instead of empty or formulaic phrases.",
};

// ============================================================================
// Target-score rubrics
// ============================================================================

/// Description of what an answer at a given target score sounds like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreLevelRubric {
    pub delivery: &'static str,
    pub language_use: &'static str,
    pub topic_dev: &'static str,
    pub summary: &'static str,
}

/// Anchor scores with a dedicated rubric
pub const SCORE_LEVEL_ANCHORS: [u8; 10] = [10, 12, 15, 18, 20, 23, 25, 26, 28, 30];

static SCORE_LEVELS: Lazy<BTreeMap<u8, ScoreLevelRubric>> = Lazy::new(|| {
    let mut levels = BTreeMap::new();
    levels.insert(10, ScoreLevelRubric {
        delivery: "Many pauses and repetitions, very slow pace, many sentences left unfinished; the examiner struggles to follow.",
        language_use: "Mostly basic vocabulary, very frequent grammar errors, confused sentence structure that seriously hinders understanding.",
        topic_dev: "Ideas are barely developed, very little information, much of the time lost to hesitation and repetition.",
        summary: "Very early-stage speaking; fluency and basic sentence patterns come first.",
    });
    levels.insert(12, ScoreLevelRubric {
        delivery: "Still a lot of hesitation and pausing, but some complete sentences get out; pace is on the slow side.",
        language_use: "Common grammar errors remain frequent, limited vocabulary, stiff expression.",
        topic_dev: "Attempts to state a view, but details and examples are very thin and much of it repeats the prompt.",
        summary: "Can just about get something across in the exam, but information and accuracy are far from the target.",
    });
    levels.insert(15, ScoreLevelRubric {
        delivery: "Gets through a complete answer haltingly; pauses, restarts and repetitions are still frequent.",
        language_use: "Mostly simple words and patterns; grammar errors blur the meaning.",
        topic_dev: "The view is barely clear, few details or examples, low information and no clear structure.",
        summary: "Somewhat better than not answering, but well short of a usable exam score; work on fluency and basic structure first.",
    });
    levels.insert(18, ScoreLevelRubric {
        delivery: "Fluency is the main problem: many pauses, repetitions and fillers (um, uh), slow pace, little information per sentence.",
        language_use: "Frequent grammar errors with agreement, tense and plurals; sentences tangle and complex sentences are almost never used.",
        topic_dev: "Only a few ideas and examples; information density is low and much time goes to repetition and stalling.",
        summary: "Typical 18: can speak, but slowly and in fragments with many errors and little information; delivery is the bottleneck.",
    });
    levels.insert(20, ScoreLevelRubric {
        delivery: "Some fluency; finishes the answer fairly completely, but pauses and small stalls are still noticeable.",
        language_use: "Simple sentences work and are mostly understood, but small grammar errors and unnatural phrasing remain common.",
        topic_dev: "The view is roughly clear with one or two reasons or examples, but development is shallow and structure a little loose.",
        summary: "A just-usable score: can produce a paragraph, but logic and accuracy need work to reach 23+.",
    });
    levels.insert(23, ScoreLevelRubric {
        delivery: "Fluent overall and able to keep talking at a moderate pace; occasional pauses or self-corrections do not hurt understanding.",
        language_use: "A few grammar errors that do not seriously hinder understanding, some variety of sentence patterns, starting to use more precise and idiomatic words.",
        topic_dev: "Clear view with several reasons or examples that answer the prompt well, though detail and layering could be stronger.",
        summary: "Typical 22-23: can answer a task well, but still needs more natural intonation, clearer structure and tighter information to go higher.",
    });
    levels.insert(25, ScoreLevelRubric {
        delivery: "Natural and fluent overall; short pauses serve thinking and structure and barely affect understanding.",
        language_use: "Grammar is accurate overall with varied patterns and richer vocabulary; only small slips.",
        topic_dev: "Accurate grasp of the point, logical, with examples and enough information, though highlights and advanced structure can still improve.",
        summary: "A stable high-band answer; reaching 26-30 needs better intonation control and more depth of content.",
    });
    levels.insert(26, ScoreLevelRubric {
        delivery: "Excellent pronunciation and intonation overall, very few pronunciation issues, natural rhythm with clear but not exaggerated pitch movement.",
        language_use: "Grammar is correct overall with occasional minor slips that do not affect understanding; varied and natural word choice and collocation.",
        topic_dev: "Clear view with good structure and enough supporting detail; information density is moderate and could carry more highlights.",
        summary: "Typical 26: very good all round; fuller content and more natural intonation lift it to 28-30.",
    });
    levels.insert(28, ScoreLevelRubric {
        delivery: "Highly natural delivery with flexible intonation and appropriate stress; almost no pauses or stalls that affect understanding.",
        language_use: "Close to native-like, uses a range of structures and collocations accurately; errors are rare and unsystematic.",
        topic_dev: "Rich content with clear structure, effective examples and well-chosen connectors; sounds mature and persuasive.",
        summary: "Very strong speaking that meets the exam's excellent level, with a few details left to polish for a perfect score.",
    });
    levels.insert(30, ScoreLevelRubric {
        delivery: "Near-native naturalness; intonation, rhythm and stress are all natural and never hinder understanding.",
        language_use: "Highly accurate and flexible grammar and vocabulary; expresses complex ideas with ease.",
        topic_dev: "Tight structure, full content, apt examples and clear reasoning; unmistakably a top answer.",
        summary: "Close to an ideal answer, matching the rare perfect performances seen in the exam.",
    });
    levels
});

/// Rubric for an exact anchor score
///
/// Returns `None` unless `target_score` is exactly one of
/// [`SCORE_LEVEL_ANCHORS`]; callers fall back to a generic description.
/// All exams currently share the canonical-scale descriptions.
pub fn get_score_level_rubric(_exam: ExamType, target_score: f64) -> Option<&'static ScoreLevelRubric> {
    if !target_score.is_finite() || target_score.fract() != 0.0 {
        return None;
    }
    if !(0.0..=f64::from(u8::MAX)).contains(&target_score) {
        return None;
    }
    SCORE_LEVELS.get(&(target_score as u8))
}

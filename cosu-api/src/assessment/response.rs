//! Generative response contract
//!
//! The engine's reply is an opaque string. Three shapes are accepted:
//! - a text score vector with `reasoning` ([`parse_text_assessment`])
//! - a list of exactly three tips ([`parse_tip_list`])
//! - plain prose for rewrites ([`accept_prose`])
//!
//! Anything else is a [`CoachError::AssessmentParse`]; a malformed score
//! reply is never coerced to zeros.

use cosu_common::{Dimension, DimensionVector};
use serde::{Deserialize, Serialize};

use crate::error::CoachError;

/// Number of tips the engine must return
pub const TIP_COUNT: usize = 3;

const FENCE: &str = "```";

/// Remove an enclosing code fence (optionally tagged, e.g. ```` ```json ````)
///
/// Text without a fence is returned trimmed and otherwise untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }
    text.trim()
}

/// Per-dimension explanation from the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reasoning {
    pub delivery: String,
    pub language_use: String,
    pub topic_dev: String,
    pub exam_specific: String,
}

/// Parsed text score plus reasoning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAssessment {
    #[serde(flatten)]
    pub scores: DimensionVector,
    pub reasoning: Reasoning,
}

#[derive(Debug, Deserialize)]
struct RawTextAssessment {
    delivery: f64,
    language_use: f64,
    topic_dev: f64,
    overall: f64,
    reasoning: Reasoning,
}

/// One structured improvement tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipRecord {
    pub dimension: Dimension,
    pub title: String,
    pub detail: String,
    #[serde(rename = "next_practice", alias = "nextPractice")]
    pub next_practice: String,
}

#[derive(Debug, Deserialize)]
struct TipEnvelope {
    tips: Vec<TipRecord>,
}

fn parse_error(what: &str, err: serde_json::Error) -> CoachError {
    CoachError::AssessmentParse(format!("{}: {}", what, err))
}

/// Parse a text score reply; every score field and `reasoning` are required
///
/// Scores are clamped to the canonical scale.
pub fn parse_text_assessment(raw: &str) -> Result<TextAssessment, CoachError> {
    let body = strip_code_fences(raw);
    let parsed: RawTextAssessment =
        serde_json::from_str(body).map_err(|e| parse_error("invalid text assessment", e))?;

    Ok(TextAssessment {
        scores: DimensionVector::new(
            parsed.delivery,
            parsed.language_use,
            parsed.topic_dev,
            parsed.overall,
        )
        .clamped(),
        reasoning: parsed.reasoning,
    })
}

/// Parse a tip reply; exactly [`TIP_COUNT`] tips with valid dimensions
pub fn parse_tip_list(raw: &str) -> Result<Vec<TipRecord>, CoachError> {
    let body = strip_code_fences(raw);
    let envelope: TipEnvelope =
        serde_json::from_str(body).map_err(|e| parse_error("invalid tip list", e))?;

    if envelope.tips.len() != TIP_COUNT {
        return Err(CoachError::AssessmentParse(format!(
            "expected exactly {} tips, got {}",
            TIP_COUNT,
            envelope.tips.len()
        )));
    }
    Ok(envelope.tips)
}

/// Accept a prose reply as-is apart from trimming; empty prose is rejected
pub fn accept_prose(raw: &str) -> Result<String, CoachError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CoachError::AssessmentParse(
            "generative engine returned an empty answer".to_string(),
        ));
    }
    Ok(text.to_string())
}

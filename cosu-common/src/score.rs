//! Canonical score model
//!
//! All scores inside the system live on the canonical 0–30 scale. Every
//! vector leaving a component is clamped to that range.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Upper bound of the canonical scale
pub const MAX_SCORE: f64 = 30.0;

/// Clamp a raw score to [0, 30]; NaN and infinities collapse to 0
pub fn clamp_score(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    x.clamp(0.0, MAX_SCORE)
}

/// Round to two decimal places
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Scored dimensions that coaching artifacts can target
///
/// Declaration order is the tie-break priority used when picking the
/// weakest dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Delivery,
    LanguageUse,
    TopicDev,
}

impl Dimension {
    /// All dimensions in tie-break priority order
    pub const ALL: [Dimension; 3] = [Dimension::Delivery, Dimension::LanguageUse, Dimension::TopicDev];

    /// Wire name (`delivery`, `language_use`, `topic_dev`)
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Delivery => "delivery",
            Dimension::LanguageUse => "language_use",
            Dimension::TopicDev => "topic_dev",
        }
    }

    /// Human-readable label used in instructions
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Delivery => "Delivery",
            Dimension::LanguageUse => "Language use",
            Dimension::TopicDev => "Topic development",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four-dimension score vector on the canonical scale
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionVector {
    pub delivery: f64,
    pub language_use: f64,
    pub topic_dev: f64,
    pub overall: f64,
}

impl DimensionVector {
    pub fn new(delivery: f64, language_use: f64, topic_dev: f64, overall: f64) -> Self {
        Self {
            delivery,
            language_use,
            topic_dev,
            overall,
        }
    }

    /// All four fields set to the same value
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// All-zero vector, substituted when a baseline is absent
    pub fn zero() -> Self {
        Self::default()
    }

    /// Value of one of the three sub-dimensions
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Delivery => self.delivery,
            Dimension::LanguageUse => self.language_use,
            Dimension::TopicDev => self.topic_dev,
        }
    }

    /// Apply `f` to all four fields
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(
            f(self.delivery),
            f(self.language_use),
            f(self.topic_dev),
            f(self.overall),
        )
    }

    /// Combine two vectors field by field
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(
            f(self.delivery, other.delivery),
            f(self.language_use, other.language_use),
            f(self.topic_dev, other.topic_dev),
            f(self.overall, other.overall),
        )
    }

    /// Copy with every field clamped to [0, 30]
    pub fn clamped(&self) -> Self {
        self.map(clamp_score)
    }

    /// Build a vector from loosely-typed JSON
    ///
    /// Missing, null, or non-numeric fields read as 0. Numeric strings are
    /// accepted. The result is clamped.
    pub fn from_lenient_json(value: &Value) -> Self {
        let field = |name: &str| -> f64 {
            match value.get(name) {
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
                _ => 0.0,
            }
        };

        Self::new(
            field("delivery"),
            field("language_use"),
            field("topic_dev"),
            field("overall"),
        )
        .clamped()
    }

    /// Weakest sub-dimension
    ///
    /// The first dimension in priority order whose value is less than or
    /// equal to both others wins ties.
    pub fn weakest_dimension(&self) -> Dimension {
        Dimension::ALL
            .into_iter()
            .find(|candidate| {
                let value = self.get(*candidate);
                Dimension::ALL
                    .iter()
                    .filter(|other| *other != candidate)
                    .all(|other| value <= self.get(*other))
            })
            // Only unreachable with NaN fields; fall back to the last dimension.
            .unwrap_or(Dimension::TopicDev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(42.0), 30.0);
        assert_eq!(clamp_score(17.25), 17.25);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(15.604), 15.6);
        assert_eq!(round2(15.306), 15.31);
        assert_eq!(round2(20.0), 20.0);
    }

    #[test]
    fn test_lenient_json_missing_and_non_numeric_fields_read_as_zero() {
        let v = DimensionVector::from_lenient_json(&json!({
            "delivery": 18,
            "language_use": "17.5",
            "topic_dev": "n/a",
        }));
        assert_eq!(v, DimensionVector::new(18.0, 17.5, 0.0, 0.0));
    }

    #[test]
    fn test_lenient_json_clamps() {
        let v = DimensionVector::from_lenient_json(&json!({
            "delivery": 45, "language_use": -2, "topic_dev": 12, "overall": 31
        }));
        assert_eq!(v, DimensionVector::new(30.0, 0.0, 12.0, 30.0));
    }

    #[test]
    fn test_weakest_dimension_priority_on_ties() {
        assert_eq!(DimensionVector::uniform(20.0).weakest_dimension(), Dimension::Delivery);
        assert_eq!(
            DimensionVector::new(20.0, 18.0, 18.0, 19.0).weakest_dimension(),
            Dimension::LanguageUse
        );
        assert_eq!(
            DimensionVector::new(20.0, 21.0, 17.0, 19.0).weakest_dimension(),
            Dimension::TopicDev
        );
        assert_eq!(
            DimensionVector::new(16.0, 21.0, 16.0, 19.0).weakest_dimension(),
            Dimension::Delivery
        );
    }

    #[test]
    fn test_dimension_wire_names() {
        assert_eq!(serde_json::to_string(&Dimension::LanguageUse).unwrap(), "\"language_use\"");
        let d: Dimension = serde_json::from_str("\"topic_dev\"").unwrap();
        assert_eq!(d, Dimension::TopicDev);
    }
}

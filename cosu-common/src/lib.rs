//! # Cos_u Common Library
//!
//! Shared, network-free code for the Cos_u speaking coach services:
//! - Canonical score model (`DimensionVector`, dimensions, clamping)
//! - Exam registry (exam types, native scales, task requirements)
//! - Rubric registry (score bands, generic text rubric, target-score rubrics)
//! - Score fusion of the acoustic and text signals
//! - Cross-exam score mapping
//! - Bootstrap configuration loading

pub mod config;
pub mod error;
pub mod exam;
pub mod fusion;
pub mod mapping;
pub mod rubrics;
pub mod score;

pub use error::{Error, Result};
pub use exam::{ExamProfile, ExamType, TaskRubric};
pub use fusion::{fuse_scores, FusionResult, FusionWeights};
pub use mapping::{map_final_score_to_ui, ExamUiScore};
pub use rubrics::{get_band, get_score_level_rubric, BandLabel, ScoreBand, ScoreLevelRubric};
pub use score::{Dimension, DimensionVector, MAX_SCORE};

//! Generative assessment
//!
//! Everything that talks to the generative engine: instruction builders,
//! the response contract, text scoring and the two feedback generators.

pub mod feedback;
pub mod instructions;
pub mod response;
pub mod scorer;

pub use feedback::{TargetLevelRewriter, TipGenerator};
pub use instructions::{AssessmentRequest, RewriteRequest, TipRequest};
pub use response::{strip_code_fences, Reasoning, TextAssessment, TipRecord};
pub use scorer::{enforce_baseline_tolerance, TextScorer};

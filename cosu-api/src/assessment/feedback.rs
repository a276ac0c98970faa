//! Feedback generators
//!
//! [`TipGenerator`] asks for three tips aimed at the weakest dimension;
//! [`TargetLevelRewriter`] asks for the candidate's own answer rewritten at a
//! chosen target score.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::instructions::{rewrite_instruction, tip_instruction, RewriteRequest, TipRequest};
use super::response::{accept_prose, parse_tip_list, TipRecord};
use crate::error::CoachError;
use crate::services::{cancellable, GenerativeEngine};

/// Diagnostic tip generator
pub struct TipGenerator {
    engine: Arc<dyn GenerativeEngine>,
}

impl TipGenerator {
    pub fn new(engine: Arc<dyn GenerativeEngine>) -> Self {
        Self { engine }
    }

    pub async fn generate(
        &self,
        request: &TipRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<Vec<TipRecord>, CoachError> {
        tracing::debug!(
            weakest = %request.final_score.weakest_dimension(),
            exam = %request.exam,
            "Generating improvement tips"
        );
        let instruction = tip_instruction(request);
        let reply = cancellable(cancel, self.engine.complete(&instruction)).await?;
        parse_tip_list(&reply)
    }
}

/// Target-level rewriter
pub struct TargetLevelRewriter {
    engine: Arc<dyn GenerativeEngine>,
}

impl TargetLevelRewriter {
    pub fn new(engine: Arc<dyn GenerativeEngine>) -> Self {
        Self { engine }
    }

    pub async fn rewrite(
        &self,
        request: &RewriteRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, CoachError> {
        tracing::debug!(
            target_score = request.target_score,
            exam = %request.exam,
            "Generating target-level rewrite"
        );
        let instruction = rewrite_instruction(request);
        let reply = cancellable(cancel, self.engine.complete(&instruction)).await?;
        accept_prose(&reply)
    }
}

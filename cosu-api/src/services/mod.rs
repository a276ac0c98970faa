//! External collaborator clients
//!
//! Each collaborator sits behind an async trait so the orchestrator and the
//! HTTP layer can be exercised with in-process fakes:
//! - [`Transcriber`]: audio → transcript
//! - [`AcousticScorer`]: audio → acoustic `DimensionVector`
//! - [`GenerativeEngine`]: instruction string → reply string
//!
//! Production implementations are constructed once at startup and shared
//! through `AppState`.

pub mod acoustic_client;
pub mod audio_clip;
pub mod llm_client;
pub mod transcription_client;

pub use acoustic_client::AcousticScoringClient;
pub use audio_clip::AudioClip;
pub use llm_client::OpenAiChatEngine;
pub use transcription_client::WhisperTranscriber;

use async_trait::async_trait;
use cosu_common::DimensionVector;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::CoachError;

/// User agent sent to every collaborator
pub(crate) const USER_AGENT: &str = concat!("cosu-api/", env!("CARGO_PKG_VERSION"));

/// Speech-to-text collaborator
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &AudioClip) -> Result<String, CoachError>;
}

/// Acoustic scoring collaborator; its vector is the ground-truth signal
#[async_trait]
pub trait AcousticScorer: Send + Sync {
    async fn score(&self, audio: &AudioClip) -> Result<DimensionVector, CoachError>;
}

/// Generative text engine: one opaque instruction in, one opaque reply out
#[async_trait]
pub trait GenerativeEngine: Send + Sync {
    async fn complete(&self, instruction: &str) -> Result<String, CoachError>;
}

/// Race an external call against cancellation
///
/// On cancellation the in-flight future is dropped, which aborts the
/// underlying HTTP request.
pub async fn cancellable<T, F>(token: &CancellationToken, call: F) -> Result<T, CoachError>
where
    F: Future<Output = Result<T, CoachError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CoachError::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let token = CancellationToken::new();
        let result = cancellable(&token, async { Ok::<_, CoachError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_cancellable_aborts_pending_call() {
        let token = CancellationToken::new();
        let child = token.child_token();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = cancellable(&child, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, CoachError>(())
        })
        .await;

        assert_eq!(result, Err(CoachError::Cancelled));
    }
}

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::MessageRecord;

/// Dialogue-completion endpoint seam.
#[async_trait]
pub trait DialogueService: Send + Sync {
    /// Submit a prompt with the current history; returns the replacement
    /// history.
    async fn complete(
        &self,
        prompt: &str,
        history: &[MessageRecord],
    ) -> Result<Vec<MessageRecord>, ClientError>;
}

/// Transcription endpoint seam.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, mime: &str) -> Result<String, ClientError>;
}

/// Speech-synthesis endpoint seam.
#[async_trait]
pub trait SynthesisService: Send + Sync {
    /// Returns the synthesized audio stream as bytes.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, ClientError>;
}

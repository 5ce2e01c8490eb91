use async_trait::async_trait;
use std::io::Cursor;

use parlance_foundation::PlaybackError;

/// Playback seam for synthesized speech.
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    /// Play an audio stream. Resolves when playback has *ended*, not merely
    /// started; the coordinator must not re-arm listening while the widget
    /// is still speaking.
    async fn play_to_completion(&self, audio: Vec<u8>) -> Result<(), PlaybackError>;
}

/// Rodio-backed output. Decoding and the blocking wait run on a blocking
/// task so the event loop keeps draining capture frames.
pub struct RodioSink;

impl RodioSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaybackSink for RodioSink {
    async fn play_to_completion(&self, audio: Vec<u8>) -> Result<(), PlaybackError> {
        tokio::task::spawn_blocking(move || {
            let (_stream, handle) = rodio::OutputStream::try_default()
                .map_err(|e| PlaybackError::OutputUnavailable(e.to_string()))?;
            let sink = rodio::Sink::try_new(&handle)
                .map_err(|e| PlaybackError::OutputUnavailable(e.to_string()))?;
            let source = rodio::Decoder::new(Cursor::new(audio))
                .map_err(|e| PlaybackError::Decode(e.to_string()))?;

            sink.append(source);
            sink.sleep_until_end();
            Ok(())
        })
        .await
        .map_err(|e| PlaybackError::Join(e.to_string()))?
    }
}

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parlance_audio::FinalizedUtterance;
use parlance_client::{
    display_messages, expects_slot_selection, last_assistant_message, DialogueService,
    MessageRecord, SynthesisService, TranscriptionService,
};

use crate::interview::{CompletionSink, InterviewTracker};
use crate::playback::PlaybackSink;
use crate::telemetry::TurnMetrics;

/// How one utterance fared on its trip through the services.
#[derive(Debug)]
pub enum TurnOutcome {
    /// Full round trip, playback finished.
    Completed { assistant_text: String },
    /// Transcription came back blank; nothing was sent to dialogue.
    EmptyTranscript,
    /// Dialogue responded but its history held no assistant message.
    NoAssistantReply,
    /// A service call failed. The turn ends; the call survives.
    Failed(String),
}

/// The per-utterance round trip. One turn runs at a time; the coordinator
/// enforces that by holding the gate in processing until the outcome lands.
#[async_trait]
pub trait TurnPipeline: Send + Sync {
    async fn run_turn(&self, utterance: FinalizedUtterance) -> TurnOutcome;
}

/// transcribe -> dialogue -> synthesize -> play, with the conversation
/// history replaced wholesale by every dialogue response.
pub struct RoundTripPipeline {
    transcription: Arc<dyn TranscriptionService>,
    dialogue: Arc<dyn DialogueService>,
    synthesis: Arc<dyn SynthesisService>,
    playback: Arc<dyn PlaybackSink>,
    completion: Arc<dyn CompletionSink>,
    tracker: InterviewTracker,
    voice: String,
    history: Mutex<Vec<MessageRecord>>,
    metrics: TurnMetrics,
}

impl RoundTripPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transcription: Arc<dyn TranscriptionService>,
        dialogue: Arc<dyn DialogueService>,
        synthesis: Arc<dyn SynthesisService>,
        playback: Arc<dyn PlaybackSink>,
        completion: Arc<dyn CompletionSink>,
        tracker: InterviewTracker,
        voice: String,
        metrics: TurnMetrics,
    ) -> Self {
        Self {
            transcription,
            dialogue,
            synthesis,
            playback,
            completion,
            tracker,
            voice,
            history: Mutex::new(Vec::new()),
            metrics,
        }
    }

    pub fn history_snapshot(&self) -> Vec<MessageRecord> {
        self.history.lock().clone()
    }

    async fn check_completion(&self, updated: &[MessageRecord]) {
        let display = display_messages(updated);
        if let Some((lead, meeting)) = self.tracker.check(&display) {
            tracing::info!(email = %lead.email, "Interview complete, delivering lead and meeting");
            // Delivery failure does not fail the turn; the transcript still
            // holds everything needed for manual follow-up.
            if let Err(e) = self.completion.deliver(lead, meeting).await {
                tracing::error!(error = %e, "Completion delivery failed");
            }
        }
    }
}

#[async_trait]
impl TurnPipeline for RoundTripPipeline {
    async fn run_turn(&self, utterance: FinalizedUtterance) -> TurnOutcome {
        self.metrics.turns_started.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            duration_ms = utterance.duration_ms,
            bytes = utterance.wav_bytes.len(),
            "Turn started"
        );

        let text = match self
            .transcription
            .transcribe(utterance.wav_bytes, utterance.mime)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                self.metrics.transport_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "Transcription failed");
                return TurnOutcome::Failed(e.to_string());
            }
        };

        let prompt = text.trim();
        if prompt.is_empty() {
            self.metrics.empty_transcripts.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Blank transcript, turn discarded");
            return TurnOutcome::EmptyTranscript;
        }
        tracing::info!(transcript = prompt, "Utterance transcribed");

        let snapshot = self.history_snapshot();
        let updated = match self.dialogue.complete(prompt, &snapshot).await {
            Ok(history) => history,
            Err(e) => {
                self.metrics.transport_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "Dialogue request failed");
                return TurnOutcome::Failed(e.to_string());
            }
        };
        *self.history.lock() = updated.clone();

        self.check_completion(&updated).await;

        let Some(assistant) = last_assistant_message(&updated) else {
            tracing::warn!("Dialogue response carried no assistant message");
            return TurnOutcome::NoAssistantReply;
        };
        let assistant_text = assistant.content.clone();
        if expects_slot_selection(&assistant_text) {
            tracing::debug!("Assistant is asking for a meeting slot");
        }

        let audio = match self.synthesis.synthesize(&assistant_text, &self.voice).await {
            Ok(audio) => audio,
            Err(e) => {
                self.metrics.transport_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "Synthesis failed");
                return TurnOutcome::Failed(e.to_string());
            }
        };

        // Playback failure still completes the turn; the exchange already
        // happened and the history reflects it.
        if let Err(e) = self.playback.play_to_completion(audio).await {
            self.metrics.playback_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, "Playback failed");
        }

        self.metrics.turns_completed.fetch_add(1, Ordering::Relaxed);
        TurnOutcome::Completed { assistant_text }
    }
}

use std::time::Instant;

use crate::session::{FinalizedUtterance, RecordingSession};
use parlance_foundation::{TurnGate, TurnState, WidgetError};

/// The recording controller: exclusive owner of the active
/// [`RecordingSession`] and driver of the capture-side turn transitions.
pub struct Recorder {
    gate: TurnGate,
    sample_rate: u32,
    active: Option<RecordingSession>,
}

impl Recorder {
    pub fn new(gate: TurnGate, sample_rate: u32) -> Self {
        Self {
            gate,
            sample_rate,
            active: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Open a session. Valid only while listening with no session active.
    pub fn start_session(&mut self, now: Instant) -> Result<(), WidgetError> {
        if self.active.is_some() {
            return Err(WidgetError::Transition(
                "recording session already active".into(),
            ));
        }
        self.gate.transition(TurnState::Capturing)?;
        self.active = Some(RecordingSession::new(self.sample_rate, now));
        tracing::debug!("Recording session opened");
        Ok(())
    }

    /// Append a chunk to the active session. No-op without one.
    pub fn on_chunk(&mut self, chunk: &[i16]) {
        if let Some(session) = self.active.as_mut() {
            session.append(chunk);
        }
    }

    /// Close the active session.
    ///
    /// A session with zero chunks is discarded and the gate returns straight
    /// to listening, so empty audio is never submitted. Otherwise the session
    /// is finalized and the gate moves to processing.
    pub fn stop_session(&mut self) -> Result<Option<FinalizedUtterance>, WidgetError> {
        let session = self.active.take().ok_or_else(|| {
            WidgetError::Transition("no active recording session to stop".into())
        })?;

        if session.is_empty() {
            tracing::debug!("Discarding empty recording session");
            self.gate.transition(TurnState::Listening)?;
            return Ok(None);
        }

        let utterance = match session.finalize() {
            Ok(u) => u,
            Err(e) => {
                // Failed finalization ends the turn, not the call.
                self.gate.transition(TurnState::Listening)?;
                return Err(e.into());
            }
        };

        self.gate.transition(TurnState::Processing)?;
        tracing::debug!(
            duration_ms = utterance.duration_ms,
            bytes = utterance.wav_bytes.len(),
            "Recording session finalized"
        );
        Ok(Some(utterance))
    }

    /// Drop any active session and settle the gate back to listening. Runs
    /// on every exit path: hangup, unmount, error.
    pub fn teardown(&mut self) {
        if self.active.take().is_some() {
            tracing::debug!("Active recording session dropped on teardown");
        }
        if self.gate.current() != TurnState::Listening {
            let _ = self.gate.transition(TurnState::Listening);
        }
    }
}

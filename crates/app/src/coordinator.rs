use std::sync::Arc;
use tokio::sync::mpsc;

use parlance_audio::{CaptureFrame, Recorder};
use parlance_foundation::{TurnGate, TurnState};
use parlance_vad::{SegmentEvent, VadSampler};

use crate::pipeline::{TurnOutcome, TurnPipeline};

/// Commands the owning call handle can send into the event loop.
#[derive(Debug)]
pub enum CallCommand {
    HangUp,
}

/// The call event loop: drains capture frames, drives VAD and the recorder,
/// and hands finalized utterances to the round-trip pipeline.
///
/// The pipeline runs as a spawned task so the loop keeps draining frames
/// while a turn is in flight; those frames are observed but can never open a
/// session, which is what keeps the widget deaf to its own playback.
pub struct TurnCoordinator {
    gate: TurnGate,
    sampler: VadSampler,
    recorder: Recorder,
    pipeline: Arc<dyn TurnPipeline>,
    frame_rx: mpsc::Receiver<CaptureFrame>,
    command_rx: mpsc::Receiver<CallCommand>,
}

impl TurnCoordinator {
    pub fn new(
        gate: TurnGate,
        sampler: VadSampler,
        recorder: Recorder,
        pipeline: Arc<dyn TurnPipeline>,
        frame_rx: mpsc::Receiver<CaptureFrame>,
        command_rx: mpsc::Receiver<CallCommand>,
    ) -> Self {
        Self {
            gate,
            sampler,
            recorder,
            pipeline,
            frame_rx,
            command_rx,
        }
    }

    pub async fn run(mut self) {
        let (done_tx, mut done_rx) = mpsc::channel::<TurnOutcome>(1);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    // A dropped command channel means the call handle is gone.
                    match command {
                        Some(CallCommand::HangUp) | None => {
                            self.hang_up(&mut done_rx).await;
                            break;
                        }
                    }
                }
                frame = self.frame_rx.recv() => {
                    match frame {
                        Some(frame) => self.on_frame(frame, &done_tx),
                        None => {
                            tracing::warn!("Capture stream ended, tearing down call");
                            self.drain_in_flight(&mut done_rx).await;
                            self.recorder.teardown();
                            break;
                        }
                    }
                }
                outcome = done_rx.recv() => {
                    if let Some(outcome) = outcome {
                        self.on_turn_done(outcome);
                    }
                }
            }
        }
        tracing::debug!("Coordinator loop exited");
    }

    fn on_frame(&mut self, frame: CaptureFrame, done_tx: &mpsc::Sender<TurnOutcome>) {
        if self.gate.current() == TurnState::Processing {
            // A turn is in flight. Keep the meter warm but disarm the
            // segmenter so the speaker output cannot trigger a capture.
            self.sampler.observe(&frame.samples);
            return;
        }

        match self.sampler.process(&frame.samples, frame.timestamp) {
            Some(SegmentEvent::CaptureStart) => {
                if self.recorder.is_idle() {
                    if let Err(e) = self.recorder.start_session(frame.timestamp) {
                        tracing::warn!(error = %e, "Could not open recording session");
                        self.sampler.reset();
                        return;
                    }
                }
                self.recorder.on_chunk(&frame.samples);
            }
            Some(SegmentEvent::CaptureEnd { voiced_ms }) => {
                self.recorder.on_chunk(&frame.samples);
                tracing::debug!(voiced_ms, "Utterance segmented");
                self.finish_capture(done_tx);
            }
            None => {
                if self.gate.current() == TurnState::Capturing {
                    self.recorder.on_chunk(&frame.samples);
                }
            }
        }
    }

    /// Close the session and, if it produced audio, launch the round trip.
    fn finish_capture(&mut self, done_tx: &mpsc::Sender<TurnOutcome>) {
        match self.recorder.stop_session() {
            Ok(Some(utterance)) => {
                let pipeline = Arc::clone(&self.pipeline);
                let done_tx = done_tx.clone();
                tokio::spawn(async move {
                    let outcome = pipeline.run_turn(utterance).await;
                    let _ = done_tx.send(outcome).await;
                });
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to close recording session"),
        }
        self.sampler.reset();
    }

    fn on_turn_done(&mut self, outcome: TurnOutcome) {
        tracing::debug!(?outcome, "Turn finished");
        if self.gate.current() == TurnState::Processing {
            if let Err(e) = self.gate.transition(TurnState::Listening) {
                tracing::error!(error = %e, "Could not re-arm listening");
            }
        }
        // Discard any segmenter state built up from observed frames.
        self.sampler.reset();
    }

    /// Hangup drains rather than drops: an utterance mid-capture is flushed
    /// through the pipeline, and an in-flight turn is awaited, before the
    /// loop exits.
    async fn hang_up(&mut self, done_rx: &mut mpsc::Receiver<TurnOutcome>) {
        tracing::info!("Hanging up");

        if self.gate.current() == TurnState::Capturing {
            match self.recorder.stop_session() {
                Ok(Some(utterance)) => {
                    let outcome = self.pipeline.run_turn(utterance).await;
                    self.on_turn_done(outcome);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Failed to flush final utterance"),
            }
        } else {
            self.drain_in_flight(done_rx).await;
        }

        self.recorder.teardown();
    }

    /// Wait out a turn already in flight so its outcome is not lost on an
    /// exit path.
    async fn drain_in_flight(&mut self, done_rx: &mut mpsc::Receiver<TurnOutcome>) {
        if self.gate.current() == TurnState::Processing {
            if let Some(outcome) = done_rx.recv().await {
                self.on_turn_done(outcome);
            }
        }
    }
}

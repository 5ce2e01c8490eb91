use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use parlance_audio::{CaptureConfig, CaptureThread, Recorder};
use parlance_client::HttpApiClient;
use parlance_foundation::{TurnGate, WidgetError};
use parlance_vad::VadSampler;

use crate::config::AppConfig;
use crate::coordinator::{CallCommand, TurnCoordinator};
use crate::interview::InterviewTracker;
use crate::pipeline::RoundTripPipeline;
use crate::playback::RodioSink;
use crate::telemetry::{TurnMetrics, TurnMetricsSnapshot};

/// Process-wide call guard. Only one call may hold the microphone.
static CALL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// A live call: capture thread, coordinator task, and the command channel
/// between them. Dropping the handle without `hang_up` still stops capture
/// via the thread's own drop, but `hang_up` is the orderly path.
pub struct VoiceCall {
    capture: CaptureThread,
    coordinator: JoinHandle<()>,
    command_tx: mpsc::Sender<CallCommand>,
    metrics: TurnMetrics,
}

impl VoiceCall {
    /// Start a call. Returns `Ok(None)` if one is already active.
    pub fn start(config: &AppConfig) -> Result<Option<Self>, WidgetError> {
        if CALL_ACTIVE.swap(true, Ordering::SeqCst) {
            tracing::warn!("Call already active, ignoring start");
            return Ok(None);
        }

        match Self::start_inner(config) {
            Ok(call) => Ok(Some(call)),
            Err(e) => {
                CALL_ACTIVE.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn start_inner(config: &AppConfig) -> Result<Self, WidgetError> {
        let (frame_tx, frame_rx) = mpsc::channel(256);
        let capture_config = CaptureConfig {
            device: config.audio.device.clone(),
            frame_size_samples: config.vad.frame_size_samples,
        };
        let (capture, sample_rate) = CaptureThread::spawn(capture_config, frame_tx)?;

        let gate = TurnGate::new();
        let sampler = VadSampler::new(config.vad.clone());
        let recorder = Recorder::new(gate.clone(), sample_rate);
        let metrics = TurnMetrics::default();

        let client = Arc::new(
            HttpApiClient::new(&config.client)
                .map_err(|e| WidgetError::Config(format!("http client: {}", e)))?,
        );
        let pipeline = Arc::new(RoundTripPipeline::new(
            client.clone(),
            client.clone(),
            client.clone(),
            Arc::new(RodioSink::new()),
            client,
            InterviewTracker::new(config.interview.clone()),
            config.client.voice.clone(),
            metrics.clone(),
        ));

        let (command_tx, command_rx) = mpsc::channel(4);
        let coordinator = tokio::spawn(
            TurnCoordinator::new(gate, sampler, recorder, pipeline, frame_rx, command_rx).run(),
        );

        tracing::info!(sample_rate, "Call started");
        Ok(Self {
            capture,
            coordinator,
            command_tx,
            metrics,
        })
    }

    pub fn metrics(&self) -> TurnMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// End the call. Flushes any utterance in progress, waits for an
    /// in-flight turn, then stops capture and releases the call guard.
    pub async fn hang_up(self) {
        let _ = self.command_tx.send(CallCommand::HangUp).await;
        if let Err(e) = self.coordinator.await {
            tracing::error!(error = %e, "Coordinator task failed");
        }
        self.capture.stop();
        CALL_ACTIVE.store(false, Ordering::SeqCst);
        tracing::info!("Call ended");
    }
}

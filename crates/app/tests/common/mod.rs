#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parlance_audio::{CaptureFrame, FinalizedUtterance, WAV_MIME};
use parlance_client::{
    ClientError, DialogueService, LeadRequest, MeetingRequest, MessageRecord,
    SynthesisService, TranscriptionService,
};
use parlance_foundation::PlaybackError;

use parlance_app::interview::CompletionSink;
use parlance_app::pipeline::{TurnOutcome, TurnPipeline};
use parlance_app::playback::PlaybackSink;

pub struct MockTranscription {
    pub text: String,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl MockTranscription {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            text: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TranscriptionService for MockTranscription {
    async fn transcribe(&self, _audio: Vec<u8>, _mime: &str) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Status { status: 500 });
        }
        Ok(self.text.clone())
    }
}

pub struct MockDialogue {
    pub reply_history: Vec<MessageRecord>,
    pub fail: bool,
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

impl MockDialogue {
    pub fn returning(history: Vec<MessageRecord>) -> Arc<Self> {
        Arc::new(Self {
            reply_history: history,
            fail: false,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }
}

#[async_trait]
impl DialogueService for MockDialogue {
    async fn complete(
        &self,
        prompt: &str,
        _history: &[MessageRecord],
    ) -> Result<Vec<MessageRecord>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());
        if self.fail {
            return Err(ClientError::Status { status: 502 });
        }
        Ok(self.reply_history.clone())
    }
}

pub struct MockSynthesis {
    pub calls: AtomicUsize,
    pub last_text: Mutex<Option<String>>,
}

impl MockSynthesis {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(None),
        })
    }
}

#[async_trait]
impl SynthesisService for MockSynthesis {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock() = Some(text.to_string());
        Ok(vec![0u8; 128])
    }
}

pub struct MockPlayback {
    pub played: AtomicUsize,
    pub fail: bool,
}

impl MockPlayback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            played: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            played: AtomicUsize::new(0),
            fail: true,
        })
    }
}

#[async_trait]
impl PlaybackSink for MockPlayback {
    async fn play_to_completion(&self, _audio: Vec<u8>) -> Result<(), PlaybackError> {
        self.played.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PlaybackError::Decode("mock".into()));
        }
        Ok(())
    }
}

pub struct MockCompletion {
    pub delivered: Mutex<Vec<(LeadRequest, MeetingRequest)>>,
}

impl MockCompletion {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            delivered: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionSink for MockCompletion {
    async fn deliver(&self, lead: LeadRequest, meeting: MeetingRequest) -> Result<(), ClientError> {
        self.delivered.lock().push((lead, meeting));
        Ok(())
    }
}

/// Pipeline stub for coordinator tests: records the utterances it gets and
/// resolves after an optional delay.
pub struct RecordingPipeline {
    pub received: Mutex<Vec<FinalizedUtterance>>,
    pub delay: Duration,
}

impl RecordingPipeline {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        })
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
            delay,
        })
    }

    pub fn received_count(&self) -> usize {
        self.received.lock().len()
    }
}

#[async_trait]
impl TurnPipeline for RecordingPipeline {
    async fn run_turn(&self, utterance: FinalizedUtterance) -> TurnOutcome {
        self.received.lock().push(utterance);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        TurnOutcome::Completed {
            assistant_text: "ok".into(),
        }
    }
}

pub const FRAME_SAMPLES: usize = 512;
pub const FRAME_MS: u64 = 32; // 512 samples at 16 kHz

pub fn loud_frame(t0: Instant, ms: u64) -> CaptureFrame {
    CaptureFrame {
        samples: vec![16_000i16; FRAME_SAMPLES],
        timestamp: t0 + Duration::from_millis(ms),
    }
}

pub fn silent_frame(t0: Instant, ms: u64) -> CaptureFrame {
    CaptureFrame {
        samples: vec![0i16; FRAME_SAMPLES],
        timestamp: t0 + Duration::from_millis(ms),
    }
}

pub fn sample_utterance() -> FinalizedUtterance {
    FinalizedUtterance {
        wav_bytes: vec![0u8; 64],
        mime: WAV_MIME,
        duration_ms: 1_000,
        started_at: Instant::now(),
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::{DEFAULT_SILENCE_DEBOUNCE_MS, DEFAULT_VOICE_THRESHOLD, FRAME_SIZE_SAMPLES};

/// Classification of one energy reading. Derived per frame, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Silent,
    Voiced,
}

/// Edge-triggered events produced by the utterance segmenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentEvent {
    /// A voiced reading arrived while idle; capture should begin.
    CaptureStart,
    /// Silence persisted for the full debounce window; capture should end.
    CaptureEnd {
        /// Voiced span of the utterance, start to first trailing silence.
        voiced_ms: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VadConfig {
    /// Readings above this value (0-255 scale) count as voice.
    pub voice_threshold: f32,
    /// Continuous silence required before an utterance ends.
    pub silence_debounce_ms: u64,
    /// Samples per energy reading.
    pub frame_size_samples: usize,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            voice_threshold: DEFAULT_VOICE_THRESHOLD,
            silence_debounce_ms: DEFAULT_SILENCE_DEBOUNCE_MS,
            frame_size_samples: FRAME_SIZE_SAMPLES,
        }
    }
}

impl VadConfig {
    pub fn silence_debounce(&self) -> Duration {
        Duration::from_millis(self.silence_debounce_ms)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VadMetrics {
    pub frames_sampled: u64,
    pub utterances_segmented: u64,
    pub last_energy: f32,
}

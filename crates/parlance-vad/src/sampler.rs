use crate::energy::EnergyMeter;
use crate::segmenter::UtteranceSegmenter;
use crate::types::{SegmentEvent, VadConfig, VadMetrics};
use std::time::Instant;

/// Energy meter and segmenter behind one per-frame API.
///
/// `process` is the armed path: classify the frame and let the segmenter
/// transition. `observe` keeps the meter running without any possibility of a
/// transition; the coordinator uses it while a round trip is in flight so the
/// pipeline never reacts to its own synthesized playback.
pub struct VadSampler {
    config: VadConfig,
    meter: EnergyMeter,
    segmenter: UtteranceSegmenter,
    metrics: VadMetrics,
}

impl VadSampler {
    pub fn new(config: VadConfig) -> Self {
        Self {
            meter: EnergyMeter::new(),
            segmenter: UtteranceSegmenter::new(&config),
            metrics: VadMetrics::default(),
            config,
        }
    }

    /// Classify one frame and evaluate the segmenter.
    pub fn process(&mut self, frame: &[i16], now: Instant) -> Option<SegmentEvent> {
        let reading = self.sample(frame);
        let voice = self.meter.classify(reading, self.config.voice_threshold);

        let event = self.segmenter.poll(voice, now);
        if let Some(event) = &event {
            tracing::debug!(?event, energy = reading, "Segment event");
            if matches!(event, SegmentEvent::CaptureEnd { .. }) {
                self.metrics.utterances_segmented += 1;
            }
        }
        event
    }

    /// Measure the frame without evaluating the segmenter. Never emits
    /// events, never transitions.
    pub fn observe(&mut self, frame: &[i16]) -> f32 {
        self.sample(frame)
    }

    fn sample(&mut self, frame: &[i16]) -> f32 {
        let reading = self.meter.mean_magnitude(frame);
        self.metrics.frames_sampled += 1;
        self.metrics.last_energy = reading;
        reading
    }

    pub fn in_utterance(&self) -> bool {
        self.segmenter.in_utterance()
    }

    pub fn reset(&mut self) {
        self.segmenter.reset();
    }

    pub fn metrics(&self) -> &VadMetrics {
        &self.metrics
    }
}

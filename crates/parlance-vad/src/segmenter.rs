use crate::types::{SegmentEvent, VadConfig, VoiceState};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    /// No utterance in progress.
    Idle,
    /// Inside an utterance, last reading was voiced.
    Voiced,
    /// Inside an utterance, silence timer armed.
    Trailing,
}

/// Debounced utterance segmentation.
///
/// Consumes a stream of `(VoiceState, timestamp)` readings and emits
/// edge-triggered capture events. Raw per-reading silence would fragment one
/// utterance into micro-segments at every natural pause; instead the first
/// silent reading after a voiced run arms a deadline, any voiced reading
/// before the deadline cancels it, and reaching it ends the utterance
/// exactly once.
///
/// The segmenter is pure with respect to time: callers pass the reading
/// timestamp, so tests can drive synthetic timelines deterministically.
pub struct UtteranceSegmenter {
    state: SegmentState,
    silence_debounce: Duration,
    utterance_start: Option<Instant>,
    silence_since: Option<Instant>,
}

impl UtteranceSegmenter {
    pub fn new(config: &VadConfig) -> Self {
        Self {
            state: SegmentState::Idle,
            silence_debounce: config.silence_debounce(),
            utterance_start: None,
            silence_since: None,
        }
    }

    /// Evaluate one reading. The caller is responsible for withholding
    /// readings while the turn state forbids transitions.
    pub fn poll(&mut self, voice: VoiceState, now: Instant) -> Option<SegmentEvent> {
        match (self.state, voice) {
            (SegmentState::Idle, VoiceState::Voiced) => {
                self.state = SegmentState::Voiced;
                self.utterance_start = Some(now);
                self.silence_since = None;
                Some(SegmentEvent::CaptureStart)
            }

            (SegmentState::Idle, VoiceState::Silent) => None,

            (SegmentState::Voiced, VoiceState::Voiced) => None,

            (SegmentState::Voiced, VoiceState::Silent) => {
                self.state = SegmentState::Trailing;
                self.silence_since = Some(now);
                None
            }

            // A voiced reading before the deadline cancels the silence timer.
            (SegmentState::Trailing, VoiceState::Voiced) => {
                self.state = SegmentState::Voiced;
                self.silence_since = None;
                None
            }

            (SegmentState::Trailing, VoiceState::Silent) => {
                let deadline_reached = self
                    .silence_since
                    .map(|since| now.duration_since(since) >= self.silence_debounce)
                    .unwrap_or(false);

                if deadline_reached {
                    let voiced_ms = match (self.utterance_start, self.silence_since) {
                        (Some(start), Some(since)) => {
                            since.duration_since(start).as_millis() as u64
                        }
                        _ => 0,
                    };
                    self.reset();
                    Some(SegmentEvent::CaptureEnd { voiced_ms })
                } else {
                    None
                }
            }
        }
    }

    pub fn in_utterance(&self) -> bool {
        self.state != SegmentState::Idle
    }

    /// Drop any in-progress utterance and disarm the silence timer.
    pub fn reset(&mut self) {
        self.state = SegmentState::Idle;
        self.utterance_start = None;
        self.silence_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> UtteranceSegmenter {
        UtteranceSegmenter::new(&VadConfig::default())
    }

    fn timeline() -> impl Fn(u64) -> Instant {
        let t0 = Instant::now();
        move |ms| t0 + Duration::from_millis(ms)
    }

    #[test]
    fn silence_never_starts_capture() {
        let mut seg = segmenter();
        let at = timeline();

        for ms in (0..5000).step_by(32) {
            assert_eq!(seg.poll(VoiceState::Silent, at(ms)), None);
        }
        assert!(!seg.in_utterance());
    }

    #[test]
    fn first_voiced_reading_starts_capture_immediately() {
        let mut seg = segmenter();
        let at = timeline();

        assert!(matches!(
            seg.poll(VoiceState::Voiced, at(0)),
            Some(SegmentEvent::CaptureStart)
        ));
        assert!(seg.in_utterance());
    }

    #[test]
    fn short_pause_does_not_end_capture() {
        let mut seg = segmenter();
        let at = timeline();

        // Voiced 0-500ms, silent 500-1100ms (600ms < 800ms window), voiced again.
        for ms in (0..=500).step_by(100) {
            seg.poll(VoiceState::Voiced, at(ms));
        }
        for ms in (600..=1100).step_by(100) {
            assert_eq!(seg.poll(VoiceState::Silent, at(ms)), None);
        }
        assert_eq!(seg.poll(VoiceState::Voiced, at(1150)), None);
        assert!(seg.in_utterance());

        // The earlier pause must not count toward the next silent run.
        for ms in (1200..1950).step_by(100) {
            assert_eq!(seg.poll(VoiceState::Silent, at(ms)), None);
        }
    }

    #[test]
    fn sustained_silence_ends_capture_once_at_deadline() {
        let mut seg = segmenter();
        let at = timeline();

        seg.poll(VoiceState::Voiced, at(0));
        seg.poll(VoiceState::Voiced, at(500));

        // First silent reading at 1000ms arms the timer; deadline is 1800ms.
        let mut end_events = Vec::new();
        for ms in (1000..=2400).step_by(100) {
            if let Some(ev) = seg.poll(VoiceState::Silent, at(ms)) {
                end_events.push((ms, ev));
            }
        }

        assert_eq!(end_events.len(), 1);
        let (fired_at, ev) = end_events[0];
        assert_eq!(fired_at, 1800);
        assert_eq!(ev, SegmentEvent::CaptureEnd { voiced_ms: 1000 });
        assert!(!seg.in_utterance());
    }

    #[test]
    fn end_fires_exactly_at_window_not_earlier() {
        let mut seg = segmenter();
        let at = timeline();

        seg.poll(VoiceState::Voiced, at(0));
        seg.poll(VoiceState::Silent, at(100));

        assert_eq!(seg.poll(VoiceState::Silent, at(899)), None);
        assert!(matches!(
            seg.poll(VoiceState::Silent, at(900)),
            Some(SegmentEvent::CaptureEnd { .. })
        ));
    }

    #[test]
    fn reset_discards_in_flight_utterance() {
        let mut seg = segmenter();
        let at = timeline();

        seg.poll(VoiceState::Voiced, at(0));
        seg.poll(VoiceState::Silent, at(100));
        seg.reset();

        // Silence long past the old deadline produces nothing.
        assert_eq!(seg.poll(VoiceState::Silent, at(5000)), None);
        // A fresh voiced reading starts a new utterance.
        assert!(matches!(
            seg.poll(VoiceState::Voiced, at(5100)),
            Some(SegmentEvent::CaptureStart)
        ));
    }

    #[test]
    fn custom_debounce_window_is_honored() {
        let config = VadConfig {
            silence_debounce_ms: 200,
            ..Default::default()
        };
        let mut seg = UtteranceSegmenter::new(&config);
        let at = timeline();

        seg.poll(VoiceState::Voiced, at(0));
        seg.poll(VoiceState::Silent, at(50));
        assert_eq!(seg.poll(VoiceState::Silent, at(240)), None);
        assert!(matches!(
            seg.poll(VoiceState::Silent, at(250)),
            Some(SegmentEvent::CaptureEnd { .. })
        ));
    }
}

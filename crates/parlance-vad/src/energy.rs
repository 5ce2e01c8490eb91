use crate::constants::ENERGY_SCALE_MAX;
use crate::types::VoiceState;

/// Per-frame energy measurement on the 0-255 byte scale.
///
/// The reading is the mean absolute magnitude of the frame mapped onto
/// 0-255, so thresholds carry over unchanged from the widget's original
/// byte-frequency analysis. Cheap enough to run on every frame.
pub struct EnergyMeter;

impl EnergyMeter {
    pub fn new() -> Self {
        Self
    }

    /// Mean magnitude of one PCM frame, scaled into 0-255.
    pub fn mean_magnitude(&self, frame: &[i16]) -> f32 {
        if frame.is_empty() {
            return 0.0;
        }

        let sum: u64 = frame
            .iter()
            .map(|&sample| (sample as i32).unsigned_abs() as u64)
            .sum();

        let mean = sum as f64 / frame.len() as f64;
        ((mean / 32768.0) * ENERGY_SCALE_MAX as f64) as f32
    }

    /// Threshold a reading into voice or silence.
    pub fn classify(&self, reading: f32, threshold: f32) -> VoiceState {
        if reading > threshold {
            VoiceState::Voiced
        } else {
            VoiceState::Silent
        }
    }
}

impl Default for EnergyMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_VOICE_THRESHOLD, FRAME_SIZE_SAMPLES};

    #[test]
    fn silence_reads_zero() {
        let meter = EnergyMeter::new();
        let silence = vec![0i16; FRAME_SIZE_SAMPLES];
        assert_eq!(meter.mean_magnitude(&silence), 0.0);
    }

    #[test]
    fn full_scale_reads_near_255() {
        let meter = EnergyMeter::new();
        let full_scale = vec![i16::MAX; FRAME_SIZE_SAMPLES];
        let reading = meter.mean_magnitude(&full_scale);
        assert!((reading - 255.0).abs() < 0.1);
    }

    #[test]
    fn min_sample_does_not_overflow() {
        let meter = EnergyMeter::new();
        let frame = vec![i16::MIN; FRAME_SIZE_SAMPLES];
        let reading = meter.mean_magnitude(&frame);
        assert!(reading >= 255.0);
    }

    #[test]
    fn classify_is_strictly_above_threshold() {
        let meter = EnergyMeter::new();
        assert_eq!(
            meter.classify(DEFAULT_VOICE_THRESHOLD, DEFAULT_VOICE_THRESHOLD),
            VoiceState::Silent
        );
        assert_eq!(
            meter.classify(DEFAULT_VOICE_THRESHOLD + 0.1, DEFAULT_VOICE_THRESHOLD),
            VoiceState::Voiced
        );
    }

    #[test]
    fn quiet_speech_sits_between_silence_and_full_scale() {
        let meter = EnergyMeter::new();
        let quiet: Vec<i16> = (0..FRAME_SIZE_SAMPLES)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0;
                (phase.sin() * 8000.0) as i16
            })
            .collect();
        let reading = meter.mean_magnitude(&quiet);
        assert!(reading > DEFAULT_VOICE_THRESHOLD);
        assert!(reading < 255.0);
    }
}

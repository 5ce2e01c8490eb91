use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::time::Instant;

use parlance_foundation::AudioError;

pub const WAV_MIME: &str = "audio/wav";

/// One captured utterance in progress.
///
/// Chunks are appended in capture order while the session is active; the
/// encoding tag is fixed at session start. Finalization concatenates the
/// chunks into a single playable/transmittable WAV object.
pub struct RecordingSession {
    chunks: Vec<Vec<i16>>,
    mime: &'static str,
    sample_rate: u32,
    started_at: Instant,
}

impl RecordingSession {
    pub fn new(sample_rate: u32, started_at: Instant) -> Self {
        Self {
            chunks: Vec::new(),
            mime: WAV_MIME,
            sample_rate,
            started_at,
        }
    }

    pub fn append(&mut self, chunk: &[i16]) {
        self.chunks.push(chunk.to_vec());
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Concatenate all chunks into one 16-bit mono PCM WAV buffer.
    pub fn finalize(self) -> Result<FinalizedUtterance, AudioError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let total_samples: usize = self.chunks.iter().map(|c| c.len()).sum();
        let mut cursor = Cursor::new(Vec::new());
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| AudioError::Encode(e.to_string()))?;

        for chunk in &self.chunks {
            for &sample in chunk {
                writer
                    .write_sample(sample)
                    .map_err(|e| AudioError::Encode(e.to_string()))?;
            }
        }
        writer
            .finalize()
            .map_err(|e| AudioError::Encode(e.to_string()))?;

        Ok(FinalizedUtterance {
            wav_bytes: cursor.into_inner(),
            mime: self.mime,
            duration_ms: (total_samples as u64 * 1000) / self.sample_rate as u64,
            started_at: self.started_at,
        })
    }
}

/// A finalized utterance, ready for the round-trip pipeline. Dropped once
/// the pipeline has consumed it.
#[derive(Debug, Clone)]
pub struct FinalizedUtterance {
    pub wav_bytes: Vec<u8>,
    pub mime: &'static str,
    pub duration_ms: u64,
    pub started_at: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_produces_riff_wav() {
        let mut session = RecordingSession::new(16_000, Instant::now());
        session.append(&[1i16; 512]);
        session.append(&[2i16; 512]);

        let utterance = session.finalize().unwrap();
        assert_eq!(&utterance.wav_bytes[0..4], b"RIFF");
        assert_eq!(&utterance.wav_bytes[8..12], b"WAVE");
        assert_eq!(utterance.mime, WAV_MIME);
        // 1024 samples at 16 kHz = 64 ms.
        assert_eq!(utterance.duration_ms, 64);
    }

    #[test]
    fn chunks_are_concatenated_in_append_order() {
        let mut session = RecordingSession::new(16_000, Instant::now());
        session.append(&[10, 20]);
        session.append(&[30, 40]);

        let utterance = session.finalize().unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(utterance.wav_bytes)).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![10, 20, 30, 40]);
    }

    #[test]
    fn new_session_is_empty() {
        let session = RecordingSession::new(16_000, Instant::now());
        assert!(session.is_empty());
    }
}

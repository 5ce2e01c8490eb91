use std::collections::VecDeque;
use std::time::Instant;

/// One fixed-size mono PCM frame as delivered to the VAD and recorder.
#[derive(Debug, Clone)]
pub struct CaptureFrame {
    pub samples: Vec<i16>,
    pub timestamp: Instant,
}

/// Accumulates device callback buffers into fixed-size mono frames.
///
/// Interleaved multi-channel input is downmixed by channel averaging; leftover
/// samples stay buffered until the next callback.
pub struct FrameChunker {
    frame_size: usize,
    channels: usize,
    buffer: VecDeque<i16>,
}

impl FrameChunker {
    pub fn new(frame_size: usize, channels: usize) -> Self {
        Self {
            frame_size,
            channels: channels.max(1),
            buffer: VecDeque::new(),
        }
    }

    pub fn push(&mut self, interleaved: &[i16]) -> Vec<CaptureFrame> {
        for sample_group in interleaved.chunks(self.channels) {
            let sum: i32 = sample_group.iter().map(|&s| s as i32).sum();
            self.buffer.push_back((sum / sample_group.len() as i32) as i16);
        }
        self.drain_frames()
    }

    pub fn push_f32(&mut self, interleaved: &[f32]) -> Vec<CaptureFrame> {
        for sample_group in interleaved.chunks(self.channels) {
            let sum: f32 = sample_group.iter().sum();
            let mono = (sum / sample_group.len() as f32).clamp(-1.0, 1.0);
            self.buffer.push_back((mono * i16::MAX as f32) as i16);
        }
        self.drain_frames()
    }

    fn drain_frames(&mut self) -> Vec<CaptureFrame> {
        let mut frames = Vec::new();
        while self.buffer.len() >= self.frame_size {
            let samples: Vec<i16> = self.buffer.drain(..self.frame_size).collect();
            frames.push(CaptureFrame {
                samples,
                timestamp: Instant::now(),
            });
        }
        frames
    }
}

pub mod capture;
pub mod chunker;
pub mod recorder;
pub mod session;

pub use capture::{CaptureConfig, CaptureThread};
pub use chunker::{CaptureFrame, FrameChunker};
pub use recorder::Recorder;
pub use session::{FinalizedUtterance, RecordingSession, WAV_MIME};

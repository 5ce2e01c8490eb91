pub mod constants;
pub mod energy;
pub mod sampler;
pub mod segmenter;
pub mod types;

pub use constants::{DEFAULT_SILENCE_DEBOUNCE_MS, DEFAULT_VOICE_THRESHOLD, FRAME_SIZE_SAMPLES};
pub use energy::EnergyMeter;
pub use sampler::VadSampler;
pub use segmenter::UtteranceSegmenter;
pub use types::{SegmentEvent, VadConfig, VadMetrics, VoiceState};

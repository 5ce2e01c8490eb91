//! Defaults for the energy VAD pipeline

/// Standard frame size for VAD evaluation (samples).
/// At 16 kHz, 512 samples = 32 ms per reading.
pub const FRAME_SIZE_SAMPLES: usize = 512;

/// Upper bound of the energy scale readings are mapped onto.
pub const ENERGY_SCALE_MAX: f32 = 255.0;

/// Default voice threshold on the 0-255 energy scale.
pub const DEFAULT_VOICE_THRESHOLD: f32 = 30.0;

/// Default continuous-silence window before an utterance is considered ended.
pub const DEFAULT_SILENCE_DEBOUNCE_MS: u64 = 800;

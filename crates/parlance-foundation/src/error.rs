use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("Audio subsystem error: {0}")]
    Audio(#[from] AudioError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid turn transition: {0}")]
    Transition(String),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Capture device not found: {name:?}")]
    DeviceNotFound { name: Option<String> },

    #[error("Capture device disconnected")]
    DeviceDisconnected,

    #[error("Format not supported: {format}")]
    FormatNotSupported { format: String },

    #[error("CPAL error: {0}")]
    Cpal(#[from] cpal::StreamError),

    #[error("Build stream error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Play stream error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Supported stream configs error: {0}")]
    SupportedStreamConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("Default stream config error: {0}")]
    DefaultStreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Device enumeration error: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("WAV encoding error: {0}")]
    Encode(String),

    #[error("Capture thread failed: {0}")]
    Thread(String),
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Audio output unavailable: {0}")]
    OutputUnavailable(String),

    #[error("Failed to decode synthesized audio: {0}")]
    Decode(String),

    #[error("Playback task failed: {0}")]
    Join(String),
}

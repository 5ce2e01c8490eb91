pub mod config;
pub mod coordinator;
pub mod interview;
pub mod pipeline;
pub mod playback;
pub mod runtime;
pub mod telemetry;

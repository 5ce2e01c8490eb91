use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::chunker::{CaptureFrame, FrameChunker};
use parlance_foundation::AudioError;

#[derive(Debug, Clone, Default)]
pub struct CaptureConfig {
    /// Preferred input device name; `None` uses the host default.
    pub device: Option<String>,
    pub frame_size_samples: usize,
}

/// Handle to the dedicated capture thread.
///
/// The cpal stream is `!Send`, so it is built and owned on its own thread;
/// fixed-size frames are posted onto a tokio channel for the coordinator.
/// Device acquisition happens eagerly: `spawn` does not return until the
/// stream is live or acquisition has failed, and a failure is reported once
/// with no automatic retry.
pub struct CaptureThread {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl CaptureThread {
    /// Start capturing. Returns the thread handle and the device sample rate.
    pub fn spawn(
        config: CaptureConfig,
        frame_tx: mpsc::Sender<CaptureFrame>,
    ) -> Result<(Self, u32), AudioError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let (ready_tx, ready_rx) = std_mpsc::channel();

        let handle = thread::Builder::new()
            .name("parlance-capture".to_string())
            .spawn(move || match open_stream(&config, frame_tx) {
                Ok((stream, sample_rate)) => {
                    let _ = ready_tx.send(Ok(sample_rate));
                    while !shutdown_flag.load(Ordering::Relaxed) {
                        thread::sleep(Duration::from_millis(50));
                    }
                    drop(stream);
                    tracing::debug!("Capture stream released");
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })
            .map_err(|e| AudioError::Thread(e.to_string()))?;

        let sample_rate = ready_rx
            .recv()
            .map_err(|_| AudioError::Thread("capture thread exited before ready".into()))??;

        tracing::info!(sample_rate, "Capture stream started");
        Ok((
            Self {
                handle: Some(handle),
                shutdown,
            },
            sample_rate,
        ))
    }

    /// Stop the stream and join the thread. Safe to call from any exit path.
    pub fn stop(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        tracing::info!("Capture thread stopped");
    }
}

impl Drop for CaptureThread {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn open_stream(
    config: &CaptureConfig,
    frame_tx: mpsc::Sender<CaptureFrame>,
) -> Result<(cpal::Stream, u32), AudioError> {
    let host = cpal::default_host();

    let device = match &config.device {
        Some(name) => host
            .input_devices()?
            .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
            .ok_or_else(|| AudioError::DeviceNotFound {
                name: Some(name.clone()),
            })?,
        None => host
            .default_input_device()
            .ok_or(AudioError::DeviceNotFound { name: None })?,
    };

    let supported = device.default_input_config()?;
    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;
    let stream_config: StreamConfig = supported.config();

    let error_callback = |e| tracing::error!("Capture stream error: {}", e);

    let stream = match supported.sample_format() {
        SampleFormat::I16 => {
            let mut chunker = FrameChunker::new(config.frame_size_samples, channels);
            device.build_input_stream(
                &stream_config,
                move |data: &[i16], _| {
                    for frame in chunker.push(data) {
                        if frame_tx.try_send(frame).is_err() {
                            tracing::warn!("Capture frame dropped: channel full");
                        }
                    }
                },
                error_callback,
                None,
            )?
        }
        SampleFormat::F32 => {
            let mut chunker = FrameChunker::new(config.frame_size_samples, channels);
            device.build_input_stream(
                &stream_config,
                move |data: &[f32], _| {
                    for frame in chunker.push_f32(data) {
                        if frame_tx.try_send(frame).is_err() {
                            tracing::warn!("Capture frame dropped: channel full");
                        }
                    }
                },
                error_callback,
                None,
            )?
        }
        other => {
            return Err(AudioError::FormatNotSupported {
                format: format!("{:?}", other),
            })
        }
    };

    stream.play()?;
    Ok((stream, sample_rate))
}

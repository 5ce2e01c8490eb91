use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared per-call turn counters.
#[derive(Clone, Default)]
pub struct TurnMetrics {
    pub turns_started: Arc<AtomicU64>,
    pub turns_completed: Arc<AtomicU64>,
    pub empty_transcripts: Arc<AtomicU64>,
    pub transport_failures: Arc<AtomicU64>,
    pub playback_failures: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy)]
pub struct TurnMetricsSnapshot {
    pub turns_started: u64,
    pub turns_completed: u64,
    pub empty_transcripts: u64,
    pub transport_failures: u64,
    pub playback_failures: u64,
}

impl TurnMetrics {
    pub fn snapshot(&self) -> TurnMetricsSnapshot {
        TurnMetricsSnapshot {
            turns_started: self.turns_started.load(Ordering::Relaxed),
            turns_completed: self.turns_completed.load(Ordering::Relaxed),
            empty_transcripts: self.empty_transcripts.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            playback_failures: self.playback_failures.load(Ordering::Relaxed),
        }
    }
}

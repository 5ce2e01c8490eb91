use anyhow::{Context, Result};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use parlance_app::config::AppConfig;
use parlance_app::runtime::VoiceCall;
use parlance_foundation::ShutdownHandler;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            AppConfig::load(&path).with_context(|| format!("loading config from {}", path))?
        }
        None => AppConfig::default(),
    };
    tracing::info!(backend = %config.client.base_url, "Starting parlance");

    let shutdown = ShutdownHandler::new().install().await;

    let Some(call) = VoiceCall::start(&config)? else {
        anyhow::bail!("a call is already active");
    };

    let mut stats = tokio::time::interval(Duration::from_secs(30));
    stats.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = stats.tick() => {
                let snapshot = call.metrics();
                tracing::info!(
                    turns_started = snapshot.turns_started,
                    turns_completed = snapshot.turns_completed,
                    empty_transcripts = snapshot.empty_transcripts,
                    transport_failures = snapshot.transport_failures,
                    playback_failures = snapshot.playback_failures,
                    "Turn statistics"
                );
            }
        }
    }

    call.hang_up().await;
    tracing::info!("Goodbye");
    Ok(())
}

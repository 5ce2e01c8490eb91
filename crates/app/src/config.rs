use serde::{Deserialize, Serialize};
use std::path::Path;

use parlance_client::ClientConfig;
use parlance_foundation::WidgetError;
use parlance_vad::VadConfig;

use crate::interview::InterviewConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Preferred input device name; `None` uses the host default.
    pub device: Option<String>,
}

/// Top-level configuration, loadable from a TOML file. Every section has
/// working defaults, so an empty file (or none at all) is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub vad: VadConfig,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub interview: InterviewConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WidgetError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| WidgetError::Config(format!("read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| WidgetError::Config(format!("parse {}: {}", path.display(), e)))
    }
}

//! Session configuration loading

use crate::SessionError;
use face_locate::LocatorConfig;
use frame_stream::SourceConfig;
use proctoring::DetectionConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Full monitoring session configuration.
///
/// Keys nest so a TOML file reads as `[detection.face]`,
/// `detection_interval = 3`, etc.; every field defaults so an empty (or
/// absent) file yields a runnable session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Detector thresholds
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Frame source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Face locator settings
    #[serde(default)]
    pub locator: LocatorConfig,

    /// Alert log path (JSON lines); in-memory only when absent
    #[serde(default)]
    pub alert_log: Option<String>,

    /// Stop after this many frames; run until the source ends when absent
    #[serde(default)]
    pub max_frames: Option<u64>,
}

impl SessionConfig {
    /// Load from an optional TOML file with `PROCTOR_*` environment
    /// overrides (`PROCTOR_DETECTION__FACE__DETECTION_INTERVAL=5`)
    pub fn load(path: Option<&str>) -> Result<Self, SessionError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            info!(path, "Loading session config");
            builder = builder.add_source(config::File::with_name(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("PROCTOR").separator("__"))
            .build()?;

        let loaded: SessionConfig = settings.try_deserialize()?;
        loaded.detection.validate()?;
        Ok(loaded)
    }

    /// Locator config with the confidence floor wired through from the
    /// detection section
    pub fn locator_config(&self) -> LocatorConfig {
        LocatorConfig {
            min_confidence: self.detection.face.min_confidence,
            ..self.locator.clone()
        }
    }
}

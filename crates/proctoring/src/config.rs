//! Detection configuration

use crate::DetectError;
use serde::{Deserialize, Serialize};

/// Face presence tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacePresenceConfig {
    /// Frame-skip factor: presence logic runs once every N update calls
    #[serde(default = "default_detection_interval")]
    pub detection_interval: u32,

    /// Classifier confidence floor; forwarded to the face locator, unused
    /// by the presence logic itself
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Continuous absence (seconds) before FACE_DISAPPEARED fires
    #[serde(default = "default_absence_threshold")]
    pub absence_threshold_secs: f32,
}

/// Gaze burst detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazeConfig {
    /// Offset threshold for Left/Right classification, as a fraction of
    /// face width
    #[serde(default = "default_gaze_threshold")]
    pub gaze_threshold: f32,
}

/// Mouth motion monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouthConfig {
    /// Hysteresis counter limit before MOUTH_MOVEMENT fires
    #[serde(default = "default_movement_threshold")]
    pub movement_threshold: u32,
}

/// Multi-face monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiFaceConfig {
    /// Consecutive multi-face frames before MULTIPLE_FACES fires
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u32,
}

/// Full detection configuration, nested to match the config file keys
/// (`detection.face.detection_interval` and friends)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub face: FacePresenceConfig,
    #[serde(default)]
    pub eyes: GazeConfig,
    #[serde(default)]
    pub mouth: MouthConfig,
    #[serde(default)]
    pub multi_face: MultiFaceConfig,
}

fn default_detection_interval() -> u32 {
    3
}
fn default_min_confidence() -> f32 {
    0.7
}
fn default_absence_threshold() -> f32 {
    5.0
}
fn default_gaze_threshold() -> f32 {
    0.1
}
fn default_movement_threshold() -> u32 {
    5
}
fn default_alert_threshold() -> u32 {
    3
}

impl Default for FacePresenceConfig {
    fn default() -> Self {
        Self {
            detection_interval: default_detection_interval(),
            min_confidence: default_min_confidence(),
            absence_threshold_secs: default_absence_threshold(),
        }
    }
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            gaze_threshold: default_gaze_threshold(),
        }
    }
}

impl Default for MouthConfig {
    fn default() -> Self {
        Self {
            movement_threshold: default_movement_threshold(),
        }
    }
}

impl Default for MultiFaceConfig {
    fn default() -> Self {
        Self {
            alert_threshold: default_alert_threshold(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            face: FacePresenceConfig::default(),
            eyes: GazeConfig::default(),
            mouth: MouthConfig::default(),
            multi_face: MultiFaceConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Create strict config (lower thresholds, faster alerts)
    pub fn strict() -> Self {
        Self {
            face: FacePresenceConfig {
                detection_interval: 1,
                absence_threshold_secs: 3.0,
                ..Default::default()
            },
            mouth: MouthConfig {
                movement_threshold: 3,
            },
            multi_face: MultiFaceConfig { alert_threshold: 2 },
            ..Default::default()
        }
    }

    /// Create lenient config (higher thresholds, fewer alerts)
    pub fn lenient() -> Self {
        Self {
            face: FacePresenceConfig {
                detection_interval: 5,
                absence_threshold_secs: 10.0,
                ..Default::default()
            },
            eyes: GazeConfig {
                gaze_threshold: 0.15,
            },
            mouth: MouthConfig {
                movement_threshold: 10,
            },
            multi_face: MultiFaceConfig { alert_threshold: 5 },
        }
    }

    /// Reject values the detectors cannot run with
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.face.detection_interval < 1 {
            return Err(DetectError::Config(
                "detection.face.detection_interval must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.face.min_confidence) {
            return Err(DetectError::Config(
                "detection.face.min_confidence must be within [0, 1]".into(),
            ));
        }
        if self.face.absence_threshold_secs <= 0.0 {
            return Err(DetectError::Config(
                "detection.face.absence_threshold_secs must be positive".into(),
            ));
        }
        if self.eyes.gaze_threshold <= 0.0 || self.eyes.gaze_threshold >= 0.5 {
            return Err(DetectError::Config(
                "detection.eyes.gaze_threshold must be within (0, 0.5)".into(),
            ));
        }
        if self.multi_face.alert_threshold < 1 {
            return Err(DetectError::Config(
                "detection.multi_face.alert_threshold must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

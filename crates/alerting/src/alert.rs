//! Alert record and the sink boundary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proctoring violation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    /// Face absent past the configured threshold
    FaceDisappeared,

    /// Face returned after a long absence
    FaceReappeared,

    /// Rapid gaze oscillation
    EyeMovement,

    /// Gaze logic hit malformed geometry; last sticky values were kept
    EyeTrackingError,

    /// Sustained mouth-region motion (possible talking)
    MouthMovement,

    /// More than one person in frame
    MultipleFaces,
}

impl AlertKind {
    /// Stable wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::FaceDisappeared => "FACE_DISAPPEARED",
            AlertKind::FaceReappeared => "FACE_REAPPEARED",
            AlertKind::EyeMovement => "EYE_MOVEMENT",
            AlertKind::EyeTrackingError => "EYE_TRACKING_ERROR",
            AlertKind::MouthMovement => "MOUTH_MOVEMENT",
            AlertKind::MultipleFaces => "MULTIPLE_FACES",
        }
    }

    /// FaceReappeared is informational; everything else flags a violation
    pub fn is_violation(&self) -> bool {
        !matches!(self, AlertKind::FaceReappeared)
    }
}

/// A single alert record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Record id
    pub id: Uuid,
    /// Alert kind
    pub kind: AlertKind,
    /// Human-readable detail
    pub message: String,
    /// Wall-clock time the sink received the alert
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Create an alert stamped with the current wall-clock time
    pub fn now(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Receives alert records from the detectors.
///
/// Takes `&self`: sinks are shared across detectors via `Arc` and must
/// synchronize internally. Emission is fire-and-forget from the detector's
/// perspective; any buffering or persistence failure is the sink's problem
/// to log, never the caller's to handle.
pub trait AlertSink: Send + Sync {
    /// Record one alert; the sink stamps its own timestamp
    fn log_alert(&self, kind: AlertKind, message: &str);
}

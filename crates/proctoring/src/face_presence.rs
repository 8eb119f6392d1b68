//! Face presence tracking with absence/reappearance alerts

use crate::config::FacePresenceConfig;
use crate::result::DetectionResult;
use alerting::{AlertKind, AlertSink};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Converts the per-frame face count into a presence boolean with a
/// duration-based absence alert.
///
/// Presence is sticky across skipped frames: when the configured
/// `detection_interval` skips a frame, the previous value is returned and no
/// state changes.
pub struct FacePresenceTracker {
    detection_interval: u32,
    absence_threshold: Duration,
    frame_count: u64,
    present: bool,
    last_present_at: Option<Instant>,
    disappeared_at: Option<Instant>,
    sink: Option<Arc<dyn AlertSink>>,
}

impl FacePresenceTracker {
    pub fn new(config: &FacePresenceConfig) -> Self {
        Self {
            detection_interval: config.detection_interval.max(1),
            absence_threshold: Duration::from_secs_f32(config.absence_threshold_secs),
            frame_count: 0,
            present: false,
            last_present_at: None,
            disappeared_at: None,
            sink: None,
        }
    }

    /// Attach the sink alerts are pushed to
    pub fn set_alert_sink(&mut self, sink: Arc<dyn AlertSink>) {
        self.sink = Some(sink);
    }

    /// Whether a face was present as of the last evaluated frame
    pub fn present(&self) -> bool {
        self.present
    }

    /// Feed one frame's detection result.
    ///
    /// Returns the presence boolean. The absence alert re-fires on every
    /// evaluated frame while the subject remains gone past the threshold.
    pub fn update(&mut self, result: &DetectionResult, now: Instant) -> bool {
        self.frame_count += 1;
        if self.frame_count % self.detection_interval as u64 != 0 {
            return self.present;
        }

        if !result.face_rects.is_empty() {
            if !self.present {
                if let Some(gone_at) = self.disappeared_at {
                    let gap = now.duration_since(gone_at);
                    if gap > self.absence_threshold {
                        self.emit(
                            AlertKind::FaceReappeared,
                            &format!("Face reappeared after {:.1} seconds", gap.as_secs_f64()),
                        );
                    }
                }
                debug!(frame = self.frame_count, "Face present again");
            }

            self.present = true;
            self.last_present_at = Some(now);
            self.disappeared_at = None;
            true
        } else {
            if self.present {
                self.disappeared_at = Some(now);
                debug!(frame = self.frame_count, "Face lost");
            }

            self.present = false;
            if let Some(seen_at) = self.last_present_at {
                if now.duration_since(seen_at) > self.absence_threshold {
                    self.emit(
                        AlertKind::FaceDisappeared,
                        &format!(
                            "Face disappeared for more than {} seconds",
                            self.absence_threshold.as_secs_f32()
                        ),
                    );
                }
            }
            false
        }
    }

    fn emit(&self, kind: AlertKind, message: &str) {
        if let Some(sink) = &self.sink {
            sink.log_alert(kind, message);
        }
    }
}

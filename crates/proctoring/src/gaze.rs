//! Gaze direction estimation and burst detection

use crate::config::GazeConfig;
use crate::result::DetectionResult;
use crate::DetectError;
use alerting::{AlertKind, AlertSink};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Window within which repeated direction flips count as a burst
const BURST_WINDOW: Duration = Duration::from_secs(2);

/// Direction flips tolerated before the burst alert
const BURST_CHANGE_LIMIT: u32 = 3;

/// Eye-open ratio when fewer than two eyes are visible
const RATIO_EYES_HIDDEN: f32 = 0.2;

/// Eye-open ratio when both eyes are visible
const RATIO_EYES_OPEN: f32 = 0.35;

/// Discrete gaze direction relative to the face midpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GazeDirection {
    Left,
    #[default]
    Center,
    Right,
}

/// Flags rapid gaze oscillation.
///
/// Direction and eye-open ratio are sticky: frames without a face (or with
/// malformed geometry) leave the last computed values untouched, so callers
/// always get the last-known signal.
pub struct GazeBurstDetector {
    offset_fraction: f32,
    direction: GazeDirection,
    eye_open_ratio: f32,
    change_count: u32,
    last_change_at: Option<Instant>,
    sink: Option<Arc<dyn AlertSink>>,
}

impl GazeBurstDetector {
    pub fn new(config: &GazeConfig) -> Self {
        Self {
            offset_fraction: config.gaze_threshold,
            direction: GazeDirection::Center,
            eye_open_ratio: 0.3,
            change_count: 0,
            last_change_at: None,
            sink: None,
        }
    }

    /// Attach the sink alerts are pushed to
    pub fn set_alert_sink(&mut self, sink: Arc<dyn AlertSink>) {
        self.sink = Some(sink);
    }

    /// Feed one frame's detection result.
    ///
    /// Total: geometry failures surface as an EYE_TRACKING_ERROR alert and
    /// the sticky values come back unchanged.
    pub fn update(&mut self, result: &DetectionResult, now: Instant) -> (GazeDirection, f32) {
        if let Err(e) = self.track(result, now) {
            self.emit(
                AlertKind::EyeTrackingError,
                &format!("Error in eye tracking: {e}"),
            );
        }
        (self.direction, self.eye_open_ratio)
    }

    fn track(&mut self, result: &DetectionResult, now: Instant) -> Result<(), DetectError> {
        let Some(face) = result.primary_face() else {
            return Ok(());
        };

        if face.w == 0 || face.h == 0 {
            return Err(DetectError::Geometry(format!(
                "face region {}x{} has no area",
                face.w, face.h
            )));
        }

        if result.eye_rects.len() < 2 {
            // Eyes closed or turned away
            self.eye_open_ratio = RATIO_EYES_HIDDEN;
            return Ok(());
        }
        self.eye_open_ratio = RATIO_EYES_OPEN;

        let mut eyes = result.eye_rects.clone();
        eyes.sort_by_key(|e| e.x);
        let left_eye = eyes[0];
        let right_eye = eyes.get(1).copied().unwrap_or(left_eye);

        // Eye rects are relative to the face region, so the face midpoint
        // is simply half its width.
        let eyes_center_x = (left_eye.center_x() + right_eye.center_x()) as f32 / 2.0;
        let face_center_x = face.w as f32 / 2.0;
        let offset = eyes_center_x - face_center_x;
        let threshold = face.w as f32 * self.offset_fraction;

        let new_direction = if offset < -threshold {
            GazeDirection::Left
        } else if offset > threshold {
            GazeDirection::Right
        } else {
            GazeDirection::Center
        };

        if new_direction != self.direction {
            self.change_count += 1;
            self.direction = new_direction;
            self.last_change_at = Some(now);
            trace!(?new_direction, changes = self.change_count, "Gaze shifted");
        }

        if self.change_count > BURST_CHANGE_LIMIT {
            if let Some(changed_at) = self.last_change_at {
                if now.duration_since(changed_at) < BURST_WINDOW {
                    self.emit(AlertKind::EyeMovement, "Excessive eye movement detected");
                    self.change_count = 0;
                }
            }
        }

        Ok(())
    }

    fn emit(&self, kind: AlertKind, message: &str) {
        if let Some(sink) = &self.sink {
            sink.log_alert(kind, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::MemorySink;
    use frame_stream::{GrayFrame, Rect};

    const FACE: Rect = Rect {
        x: 100,
        y: 80,
        w: 200,
        h: 240,
    };

    fn detector_with_sink() -> (GazeBurstDetector, Arc<MemorySink>) {
        let mut detector = GazeBurstDetector::new(&GazeConfig::default());
        let sink = Arc::new(MemorySink::new());
        detector.set_alert_sink(sink.clone());
        (detector, sink)
    }

    /// Eye pair whose averaged center sits at `center_x` within the face
    fn eyes_at(center_x: u32) -> Vec<Rect> {
        vec![
            Rect::new(center_x - 40, 60, 20, 12),
            Rect::new(center_x + 20, 60, 20, 12),
        ]
    }

    fn frame(face_rects: Vec<Rect>, eye_rects: Vec<Rect>) -> DetectionResult {
        DetectionResult::new(face_rects, eye_rects, GrayFrame::filled(64, 64, 0))
    }

    #[test]
    fn test_sticky_defaults_without_face() {
        let (mut detector, sink) = detector_with_sink();
        let now = Instant::now();

        for _ in 0..10 {
            let (direction, ratio) = detector.update(&frame(vec![], vec![]), now);
            assert_eq!(direction, GazeDirection::Center);
            assert!((ratio - 0.3).abs() < f32::EPSILON);
        }
        assert!(sink.alerts().is_empty());
    }

    #[test]
    fn test_sticky_direction_survives_face_loss() {
        let (mut detector, _sink) = detector_with_sink();
        let now = Instant::now();

        // Eyes well left of the midpoint (100)
        let (direction, _) = detector.update(&frame(vec![FACE], eyes_at(60)), now);
        assert_eq!(direction, GazeDirection::Left);

        let (direction, ratio) = detector.update(&frame(vec![], vec![]), now);
        assert_eq!(direction, GazeDirection::Left);
        assert!((ratio - 0.35).abs() < f32::EPSILON);
    }

    #[test]
    fn test_hidden_eyes_lower_ratio_keep_direction() {
        let (mut detector, _sink) = detector_with_sink();
        let now = Instant::now();

        detector.update(&frame(vec![FACE], eyes_at(150)), now);
        let (direction, ratio) = detector.update(&frame(vec![FACE], vec![Rect::new(40, 60, 20, 12)]), now);
        assert_eq!(direction, GazeDirection::Right);
        assert!((ratio - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_center_within_threshold() {
        let (mut detector, _sink) = detector_with_sink();
        // Offset of 15px against a 20px threshold (10% of 200)
        let (direction, _) = detector.update(&frame(vec![FACE], eyes_at(115)), Instant::now());
        assert_eq!(direction, GazeDirection::Center);
    }

    #[test]
    fn test_burst_fires_once_then_resets() {
        let (mut detector, sink) = detector_with_sink();
        let base = Instant::now();

        // Four rapid flips: L, C, R, C within the 2s window
        let positions = [60, 100, 150, 100];
        for (i, &x) in positions.iter().enumerate() {
            detector.update(
                &frame(vec![FACE], eyes_at(x)),
                base + Duration::from_millis(100 * i as u64),
            );
        }
        assert_eq!(sink.count_of(AlertKind::EyeMovement), 1);

        // Counter reset: the same burst again yields exactly one more
        for (i, &x) in positions.iter().enumerate() {
            detector.update(
                &frame(vec![FACE], eyes_at(x)),
                base + Duration::from_millis(1000 + 100 * i as u64),
            );
        }
        assert_eq!(sink.count_of(AlertKind::EyeMovement), 2);
    }

    #[test]
    fn test_three_flips_stay_quiet() {
        let (mut detector, sink) = detector_with_sink();
        let base = Instant::now();

        let positions = [60, 100, 150];
        for (i, &x) in positions.iter().enumerate() {
            detector.update(
                &frame(vec![FACE], eyes_at(x)),
                base + Duration::from_millis(100 * i as u64),
            );
        }
        assert_eq!(sink.count_of(AlertKind::EyeMovement), 0);
    }

    #[test]
    fn test_zero_width_face_reports_tracking_error() {
        let (mut detector, sink) = detector_with_sink();
        let bad_face = Rect::new(10, 10, 0, 40);

        let (direction, ratio) =
            detector.update(&frame(vec![bad_face], eyes_at(60)), Instant::now());
        assert_eq!(direction, GazeDirection::Center);
        assert!((ratio - 0.3).abs() < f32::EPSILON);
        assert_eq!(sink.count_of(AlertKind::EyeTrackingError), 1);
    }
}

//! Exam Proctoring Detectors
//!
//! Per-frame signal-to-alert state machines over an external classifier's
//! bounding-box output:
//! - Face presence tracking with absence/reappearance debouncing
//! - Gaze direction estimation and burst detection
//! - Mouth motion monitoring via frame differencing
//! - Multiple-person monitoring
//!
//! The four detectors share nothing but the immutable [`DetectionResult`]
//! for the frame; each may push alerts into a configured sink. Every public
//! `update` is total: internal faults never abort the monitoring loop.

pub mod analysis;
pub mod config;
pub mod face_presence;
pub mod gaze;
pub mod mouth;
pub mod multi_face;
pub mod result;

pub use analysis::FrameAnalysis;
pub use config::DetectionConfig;
pub use face_presence::FacePresenceTracker;
pub use gaze::{GazeBurstDetector, GazeDirection};
pub use mouth::MouthMotionMonitor;
pub use multi_face::MultiFaceMonitor;
pub use result::DetectionResult;

use alerting::AlertSink;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Detection error types
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Malformed geometry: {0}")]
    Geometry(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Owns one instance of each detector and drives them per frame.
///
/// The detectors are independent; the suite just fixes an invocation order
/// so alert ordering in the sink stays deterministic.
pub struct DetectorSuite {
    face_presence: FacePresenceTracker,
    gaze: GazeBurstDetector,
    mouth: MouthMotionMonitor,
    multi_face: MultiFaceMonitor,
}

impl DetectorSuite {
    /// Build all four detectors from a validated configuration
    pub fn new(config: &DetectionConfig) -> Result<Self, DetectError> {
        config.validate()?;
        Ok(Self {
            face_presence: FacePresenceTracker::new(&config.face),
            gaze: GazeBurstDetector::new(&config.eyes),
            mouth: MouthMotionMonitor::new(&config.mouth),
            multi_face: MultiFaceMonitor::new(&config.multi_face),
        })
    }

    /// Fan one sink out to every detector
    pub fn set_alert_sink(&mut self, sink: Arc<dyn AlertSink>) {
        self.face_presence.set_alert_sink(sink.clone());
        self.gaze.set_alert_sink(sink.clone());
        self.mouth.set_alert_sink(sink.clone());
        self.multi_face.set_alert_sink(sink);
    }

    /// Run all four detectors over one frame's detection result
    pub fn process(&mut self, result: &DetectionResult, now: Instant) -> FrameAnalysis {
        let face_present = self.face_presence.update(result, now);
        let (gaze_direction, eye_open_ratio) = self.gaze.update(result, now);
        let mouth_moving = self.mouth.update(result);
        let multiple_faces = self.multi_face.update(result);

        FrameAnalysis {
            face_present,
            gaze_direction,
            eye_open_ratio,
            mouth_moving,
            multiple_faces,
            face_count: result.face_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::{AlertKind, MemorySink};
    use frame_stream::{GrayFrame, Rect};
    use std::time::Duration;

    fn suite_with_sink() -> (DetectorSuite, Arc<MemorySink>) {
        let mut config = DetectionConfig::default();
        config.face.detection_interval = 1;
        config.multi_face.alert_threshold = 3;
        let mut suite = DetectorSuite::new(&config).unwrap();
        let sink = Arc::new(MemorySink::new());
        suite.set_alert_sink(sink.clone());
        (suite, sink)
    }

    fn frame(face_count: usize) -> DetectionResult {
        let rects = (0..face_count)
            .map(|i| Rect::new(i as u32 * 40, 8, 32, 32))
            .collect();
        DetectionResult::new(rects, vec![], GrayFrame::filled(128, 128, 100))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DetectionConfig::default();
        config.multi_face.alert_threshold = 0;
        assert!(DetectorSuite::new(&config).is_err());
    }

    #[test]
    fn test_process_reports_all_signals() {
        let (mut suite, _sink) = suite_with_sink();
        let analysis = suite.process(&frame(1), Instant::now());

        assert!(analysis.face_present);
        assert_eq!(analysis.gaze_direction, GazeDirection::Center);
        assert_eq!(analysis.face_count, 1);
        assert!(!analysis.mouth_moving);
        assert!(!analysis.multiple_faces);
        assert!(!analysis.suspicious());
    }

    #[test]
    fn test_detectors_fire_independently() {
        let (mut suite, sink) = suite_with_sink();
        let base = Instant::now();

        // Two people for three frames while the subject stays in frame
        for i in 0..3u64 {
            suite.process(&frame(2), base + Duration::from_millis(100 * i));
        }
        assert_eq!(sink.count_of(AlertKind::MultipleFaces), 1);
        assert_eq!(sink.count_of(AlertKind::FaceDisappeared), 0);

        // Subject leaves for six seconds
        let analysis = suite.process(&frame(0), base + Duration::from_secs(1));
        assert!(!analysis.face_present);
        suite.process(&frame(0), base + Duration::from_secs(7));
        assert_eq!(sink.count_of(AlertKind::FaceDisappeared), 1);
        assert!(sink
            .alerts()
            .iter()
            .all(|a| a.kind != AlertKind::EyeTrackingError));
    }
}

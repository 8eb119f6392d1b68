//! Multiple-person monitoring

use crate::config::MultiFaceConfig;
use crate::result::DetectionResult;
use alerting::{AlertKind, AlertSink};
use std::sync::Arc;
use tracing::trace;

/// Raises MULTIPLE_FACES after a configured streak of multi-face frames.
///
/// Once the streak reaches the threshold the alert re-fires every frame the
/// condition holds; the streak only resets when the frame drops back to at
/// most one face.
pub struct MultiFaceMonitor {
    alert_threshold: u32,
    consecutive_count: u32,
    sink: Option<Arc<dyn AlertSink>>,
}

impl MultiFaceMonitor {
    pub fn new(config: &MultiFaceConfig) -> Self {
        Self {
            alert_threshold: config.alert_threshold.max(1),
            consecutive_count: 0,
            sink: None,
        }
    }

    /// Attach the sink alerts are pushed to
    pub fn set_alert_sink(&mut self, sink: Arc<dyn AlertSink>) {
        self.sink = Some(sink);
    }

    /// Current multi-face streak length
    pub fn consecutive_count(&self) -> u32 {
        self.consecutive_count
    }

    /// Feed one frame's detection result; returns whether the alert fired.
    pub fn update(&mut self, result: &DetectionResult) -> bool {
        let count = result.face_count();
        if count > 1 {
            self.consecutive_count += 1;
            trace!(
                faces = count,
                streak = self.consecutive_count,
                "Multiple faces in frame"
            );
            if self.consecutive_count >= self.alert_threshold {
                if let Some(sink) = &self.sink {
                    sink.log_alert(
                        AlertKind::MultipleFaces,
                        &format!(
                            "Detected {} faces for {} frames",
                            count, self.consecutive_count
                        ),
                    );
                }
                return true;
            }
            false
        } else {
            self.consecutive_count = 0;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::MemorySink;
    use frame_stream::{GrayFrame, Rect};

    fn monitor_with_sink(threshold: u32) -> (MultiFaceMonitor, Arc<MemorySink>) {
        let mut monitor = MultiFaceMonitor::new(&MultiFaceConfig {
            alert_threshold: threshold,
        });
        let sink = Arc::new(MemorySink::new());
        monitor.set_alert_sink(sink.clone());
        (monitor, sink)
    }

    fn faces(count: usize) -> DetectionResult {
        let rects = (0..count)
            .map(|i| Rect::new(i as u32 * 30, 10, 20, 20))
            .collect();
        DetectionResult::new(rects, vec![], GrayFrame::filled(64, 64, 0))
    }

    #[test]
    fn test_alert_only_at_threshold() {
        let (mut monitor, sink) = monitor_with_sink(3);

        assert!(!monitor.update(&faces(2)));
        assert!(!monitor.update(&faces(2)));
        assert_eq!(sink.count_of(AlertKind::MultipleFaces), 0);

        assert!(monitor.update(&faces(2)));
        assert_eq!(sink.count_of(AlertKind::MultipleFaces), 1);
    }

    #[test]
    fn test_alert_refires_while_streak_holds() {
        let (mut monitor, sink) = monitor_with_sink(3);

        for _ in 0..5 {
            monitor.update(&faces(3));
        }
        // Frames 3, 4, and 5 each fire
        assert_eq!(sink.count_of(AlertKind::MultipleFaces), 3);
        assert_eq!(monitor.consecutive_count(), 5);
    }

    #[test]
    fn test_streak_resets_on_single_face() {
        let (mut monitor, sink) = monitor_with_sink(3);

        // Face counts [2, 2, 2, 1]: only frame 3 fires
        assert!(!monitor.update(&faces(2)));
        assert!(!monitor.update(&faces(2)));
        assert!(monitor.update(&faces(2)));
        assert!(!monitor.update(&faces(1)));

        assert_eq!(sink.count_of(AlertKind::MultipleFaces), 1);
        assert_eq!(monitor.consecutive_count(), 0);
    }

    #[test]
    fn test_empty_frame_resets_streak() {
        let (mut monitor, _sink) = monitor_with_sink(3);

        monitor.update(&faces(2));
        monitor.update(&faces(0));
        assert_eq!(monitor.consecutive_count(), 0);
    }

    #[test]
    fn test_message_carries_count_and_streak() {
        let (mut monitor, sink) = monitor_with_sink(1);

        monitor.update(&faces(4));
        let alerts = sink.alerts();
        assert_eq!(alerts[0].message, "Detected 4 faces for 1 frames");
    }
}

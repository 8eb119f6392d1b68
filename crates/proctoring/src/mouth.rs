//! Mouth motion monitoring via frame differencing
//!
//! There is no mouth classifier; a fixed band of the face region is diffed
//! against the previous frame's band and a leaky counter turns sustained
//! motion into an alert.

use crate::config::MouthConfig;
use crate::result::DetectionResult;
use crate::DetectError;
use alerting::{AlertKind, AlertSink};
use frame_stream::{GrayFrame, Rect};
use std::sync::Arc;
use tracing::trace;

/// Mean absolute intensity difference that counts as motion
const MOTION_THRESHOLD: f32 = 10.0;

/// Converts successive mouth-region patches into a motion boolean with a
/// leaky hysteresis counter.
pub struct MouthMotionMonitor {
    movement_limit: u32,
    movement_counter: u32,
    prev_patch: Option<GrayFrame>,
    sink: Option<Arc<dyn AlertSink>>,
}

impl MouthMotionMonitor {
    pub fn new(config: &MouthConfig) -> Self {
        Self {
            movement_limit: config.movement_threshold,
            movement_counter: 0,
            prev_patch: None,
            sink: None,
        }
    }

    /// Attach the sink alerts are pushed to
    pub fn set_alert_sink(&mut self, sink: Arc<dyn AlertSink>) {
        self.sink = Some(sink);
    }

    /// Current hysteresis counter value
    pub fn movement_counter(&self) -> u32 {
        self.movement_counter
    }

    /// Feed one frame's detection result; returns whether the mouth moved.
    ///
    /// Fail-open: any internal error yields `false` so the monitoring loop
    /// never stalls on a transient vision glitch.
    pub fn update(&mut self, result: &DetectionResult) -> bool {
        self.scan(result).unwrap_or(false)
    }

    fn scan(&mut self, result: &DetectionResult) -> Result<bool, DetectError> {
        let Some(face) = result.primary_face() else {
            self.prev_patch = None;
            return Ok(false);
        };

        let region = mouth_region(face)?;
        let Some(patch) = result.gray.crop_clipped(region) else {
            // Degenerate region: nothing to compare, leave state alone
            return Ok(false);
        };

        if let Some(prev) = &self.prev_patch {
            // None on dimension mismatch (face geometry changed); skip the
            // diff and just adopt the new patch.
            if let Some(movement) = patch.mean_abs_diff(prev) {
                trace!(movement, counter = self.movement_counter, "Mouth patch diff");
                if movement > MOTION_THRESHOLD {
                    self.movement_counter += 1;
                    if self.movement_counter > self.movement_limit {
                        self.emit(
                            AlertKind::MouthMovement,
                            "Excessive mouth movement detected (possible talking)",
                        );
                        self.movement_counter = 0;
                    }
                    self.prev_patch = Some(patch);
                    return Ok(true);
                }
                self.movement_counter = self.movement_counter.saturating_sub(1);
            }
        }

        self.prev_patch = Some(patch);
        Ok(false)
    }

    fn emit(&self, kind: AlertKind, message: &str) {
        if let Some(sink) = &self.sink {
            sink.log_alert(kind, message);
        }
    }
}

/// Fixed mouth band of a face: lower 60%-100% vertically, centered 50%
/// horizontally.
fn mouth_region(face: &Rect) -> Result<Rect, DetectError> {
    let y = face
        .y
        .checked_add((face.h as f32 * 0.6) as u32)
        .ok_or_else(|| DetectError::Geometry("mouth region y overflows".into()))?;
    let x = face
        .x
        .checked_add((face.w as f32 * 0.25) as u32)
        .ok_or_else(|| DetectError::Geometry("mouth region x overflows".into()))?;
    Ok(Rect::new(
        x,
        y,
        (face.w as f32 * 0.5) as u32,
        (face.h as f32 * 0.4) as u32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::MemorySink;
    use proptest::prelude::*;

    const FACE: Rect = Rect {
        x: 0,
        y: 0,
        w: 40,
        h: 40,
    };

    fn monitor_with_sink(limit: u32) -> (MouthMotionMonitor, Arc<MemorySink>) {
        let mut monitor = MouthMotionMonitor::new(&MouthConfig {
            movement_threshold: limit,
        });
        let sink = Arc::new(MemorySink::new());
        monitor.set_alert_sink(sink.clone());
        (monitor, sink)
    }

    /// Frame whose mouth band is uniformly `level`
    fn frame_with_mouth(level: u8) -> DetectionResult {
        let mut gray = GrayFrame::filled(64, 64, 0);
        for y in 24..40 {
            for x in 10..30 {
                gray.set(x, y, level);
            }
        }
        DetectionResult::new(vec![FACE], vec![], gray)
    }

    fn no_face() -> DetectionResult {
        DetectionResult::empty(GrayFrame::filled(64, 64, 0))
    }

    #[test]
    fn test_mouth_region_band() {
        let region = mouth_region(&Rect::new(100, 200, 80, 120)).unwrap();
        assert_eq!(region, Rect::new(120, 272, 40, 48));
    }

    #[test]
    fn test_identical_patches_never_move() {
        let (mut monitor, sink) = monitor_with_sink(2);

        for _ in 0..20 {
            assert!(!monitor.update(&frame_with_mouth(128)));
        }
        assert_eq!(monitor.movement_counter(), 0);
        assert!(sink.alerts().is_empty());
    }

    #[test]
    fn test_motion_increments_and_alerts_past_limit() {
        let (mut monitor, sink) = monitor_with_sink(2);

        // Alternate intensities so every diff is far past the threshold
        monitor.update(&frame_with_mouth(0));
        assert!(monitor.update(&frame_with_mouth(200))); // counter 1
        assert!(monitor.update(&frame_with_mouth(0))); // counter 2
        assert_eq!(sink.count_of(AlertKind::MouthMovement), 0);

        assert!(monitor.update(&frame_with_mouth(200))); // counter 3 > 2: alert
        assert_eq!(sink.count_of(AlertKind::MouthMovement), 1);
        assert_eq!(monitor.movement_counter(), 0);
    }

    #[test]
    fn test_counter_decays_but_never_negative() {
        let (mut monitor, _sink) = monitor_with_sink(10);

        monitor.update(&frame_with_mouth(0));
        monitor.update(&frame_with_mouth(200));
        monitor.update(&frame_with_mouth(0));
        assert_eq!(monitor.movement_counter(), 2);

        for _ in 0..10 {
            assert!(!monitor.update(&frame_with_mouth(0)));
        }
        assert_eq!(monitor.movement_counter(), 0);
    }

    #[test]
    fn test_face_loss_clears_previous_patch() {
        let (mut monitor, _sink) = monitor_with_sink(2);

        monitor.update(&frame_with_mouth(0));
        assert!(!monitor.update(&no_face()));
        // First frame after reacquisition has nothing to diff against
        assert!(!monitor.update(&frame_with_mouth(200)));
        assert_eq!(monitor.movement_counter(), 0);
    }

    #[test]
    fn test_offscreen_face_fails_open() {
        let (mut monitor, sink) = monitor_with_sink(2);
        let offscreen = Rect::new(u32::MAX - 2, u32::MAX - 2, 40, 40);
        let result = DetectionResult::new(vec![offscreen], vec![], GrayFrame::filled(64, 64, 0));

        assert!(!monitor.update(&result));
        assert!(sink.alerts().is_empty());
    }

    proptest! {
        /// The hysteresis counter stays bounded at zero no matter how the
        /// motion sequence interleaves.
        #[test]
        fn prop_counter_never_underflows(levels in proptest::collection::vec(0u8..=255, 1..60)) {
            let (mut monitor, _sink) = monitor_with_sink(3);
            for level in levels {
                monitor.update(&frame_with_mouth(level));
                prop_assert!(monitor.movement_counter() <= 60);
            }
            // u32 counter: underflow would wrap huge, bounded check suffices
            prop_assert!(monitor.movement_counter() <= 60);
        }
    }
}

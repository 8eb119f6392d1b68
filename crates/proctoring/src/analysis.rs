//! Per-frame analysis summary

use crate::gaze::GazeDirection;
use serde::{Deserialize, Serialize};

/// Combined output of the four detectors for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Whether a face is considered present (sticky across skipped frames)
    pub face_present: bool,

    /// Last-known gaze direction
    pub gaze_direction: GazeDirection,

    /// Last-known eye-open ratio
    pub eye_open_ratio: f32,

    /// Whether the mouth band moved this frame
    pub mouth_moving: bool,

    /// Whether the multi-face alert fired this frame
    pub multiple_faces: bool,

    /// Raw face count from the classifier
    pub face_count: usize,
}

impl FrameAnalysis {
    /// Whether this frame carried any violation signal
    pub fn suspicious(&self) -> bool {
        !self.face_present || self.mouth_moving || self.multiple_faces
    }
}

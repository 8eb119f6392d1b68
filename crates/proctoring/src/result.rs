//! Per-frame classifier output consumed by every detector

use frame_stream::{GrayFrame, Rect};

/// Output of the external bounding-box classifier for one frame.
///
/// Immutable once created; the four detectors read it independently.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Face rectangles in frame coordinates, classifier order (not sorted)
    pub face_rects: Vec<Rect>,
    /// Eye rectangles relative to the first face's region; meaningful only
    /// when at least one face was found
    pub eye_rects: Vec<Rect>,
    /// Full intensity frame; detectors derive their own sub-patches
    pub gray: GrayFrame,
}

impl DetectionResult {
    pub fn new(face_rects: Vec<Rect>, eye_rects: Vec<Rect>, gray: GrayFrame) -> Self {
        Self {
            face_rects,
            eye_rects,
            gray,
        }
    }

    /// Result for a frame with no detections
    pub fn empty(gray: GrayFrame) -> Self {
        Self {
            face_rects: Vec::new(),
            eye_rects: Vec::new(),
            gray,
        }
    }

    /// Number of detected faces
    pub fn face_count(&self) -> usize {
        self.face_rects.len()
    }

    /// The first detected face, if any
    pub fn primary_face(&self) -> Option<&Rect> {
        self.face_rects.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_face_is_first() {
        let gray = GrayFrame::filled(4, 4, 0);
        let result = DetectionResult::new(
            vec![Rect::new(1, 1, 2, 2), Rect::new(0, 0, 1, 1)],
            vec![],
            gray,
        );
        assert_eq!(result.face_count(), 2);
        assert_eq!(result.primary_face(), Some(&Rect::new(1, 1, 2, 2)));
    }

    #[test]
    fn test_empty_has_no_faces() {
        let result = DetectionResult::empty(GrayFrame::filled(4, 4, 0));
        assert_eq!(result.face_count(), 0);
        assert!(result.primary_face().is_none());
    }
}

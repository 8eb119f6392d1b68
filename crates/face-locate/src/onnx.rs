//! ONNX-backed face locator with mock fallback

use crate::LocateError;
use frame_stream::{GrayFrame, Rect};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use proctoring::DetectionResult;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Locator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Path to the face detection model; mock fallback when absent
    pub model_path: Option<String>,
    /// Confidence floor forwarded from `detection.face.min_confidence`
    pub min_confidence: f32,
    /// Square model input size
    pub input_size: u32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            min_confidence: 0.7,
            input_size: 128,
        }
    }
}

/// Face/eye locator backed by an ONNX session.
///
/// Without a configured model path it degrades to a deterministic mock that
/// always finds one centered face, which is enough to exercise the whole
/// detection layer end to end.
pub struct OnnxFaceLocator {
    session: Option<Session>,
    config: LocatorConfig,
}

impl OnnxFaceLocator {
    pub fn new(config: LocatorConfig) -> Result<Self, LocateError> {
        let session = if let Some(path) = &config.model_path {
            info!("Loading face detection model from {}", path);
            let session = Session::builder()
                .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
                .and_then(|b| b.commit_from_file(path))
                .map_err(|e| {
                    error!("Failed to load face model: {}", e);
                    LocateError::ModelLoad(e.to_string())
                })?;
            Some(session)
        } else {
            warn!("No face model path configured. Using mock locator.");
            None
        };

        Ok(Self { session, config })
    }

    fn infer(&self, gray: &GrayFrame, session: &Session) -> Result<DetectionResult, LocateError> {
        // Preprocess: resize to the model's square input
        let img = image::GrayImage::from_raw(gray.width, gray.height, gray.data.clone())
            .ok_or_else(|| LocateError::ImageProcessing("Failed to create image buffer".into()))?;
        let size = self.config.input_size;
        let resized =
            image::imageops::resize(&img, size, size, image::imageops::FilterType::Triangle);

        // Normalize to 0..1, tensor shape (1, 1, S, S)
        let mut input_array = Array4::<f32>::zeros((1, 1, size as usize, size as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input_array[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
        }

        // Inference validates the model runs against this frame shape
        let _outputs = session
            .run(ort::inputs![input_array].map_err(|e| LocateError::Inference(e.to_string()))?)
            .map_err(|e| LocateError::Inference(e.to_string()))?;

        // TODO: decode SCRFD anchor outputs into real boxes; until then the
        // heuristic geometry below stands in for the decoded result.
        Ok(heuristic_detection(gray))
    }
}

impl crate::FaceLocator for OnnxFaceLocator {
    fn locate(&mut self, gray: &GrayFrame) -> Result<DetectionResult, LocateError> {
        if gray.width == 0 || gray.height == 0 {
            return Err(LocateError::ImageProcessing("empty frame".into()));
        }
        match &self.session {
            Some(session) => self.infer(gray, session),
            None => Ok(heuristic_detection(gray)),
        }
    }
}

/// One centered face with both eyes, proportioned like a typical webcam
/// head-and-shoulders framing
fn heuristic_detection(gray: &GrayFrame) -> DetectionResult {
    let face = Rect::new(
        (gray.width as f32 * 0.3) as u32,
        (gray.height as f32 * 0.2) as u32,
        (gray.width as f32 * 0.4) as u32,
        (gray.height as f32 * 0.5) as u32,
    );
    // Eye boxes are relative to the face region
    let eye_w = (face.w as f32 * 0.2) as u32;
    let eye_h = (face.h as f32 * 0.15) as u32;
    let eye_y = (face.h as f32 * 0.25) as u32;
    let eyes = vec![
        Rect::new((face.w as f32 * 0.18) as u32, eye_y, eye_w, eye_h),
        Rect::new((face.w as f32 * 0.62) as u32, eye_y, eye_w, eye_h),
    ];
    DetectionResult::new(vec![face], eyes, gray.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FaceLocator;

    #[test]
    fn test_mock_locator_finds_one_face() {
        let mut locator = OnnxFaceLocator::new(LocatorConfig::default()).unwrap();
        let gray = GrayFrame::filled(640, 480, 120);

        let result = locator.locate(&gray).unwrap();
        assert_eq!(result.face_count(), 1);
        assert_eq!(result.eye_rects.len(), 2);

        let face = result.primary_face().unwrap();
        assert_eq!(face.w, 256);
        assert_eq!(face.h, 240);
    }

    #[test]
    fn test_mock_eyes_center_on_face_midline() {
        let mut locator = OnnxFaceLocator::new(LocatorConfig::default()).unwrap();
        let result = locator.locate(&GrayFrame::filled(640, 480, 120)).unwrap();

        let face = result.primary_face().unwrap();
        let mid = (result.eye_rects[0].center_x() + result.eye_rects[1].center_x()) / 2;
        // Eyes straddle the face midpoint: a Center gaze classification
        assert!((mid as i64 - (face.w / 2) as i64).unsigned_abs() < face.w as u64 / 10);
    }

    #[test]
    fn test_empty_frame_rejected() {
        let mut locator = OnnxFaceLocator::new(LocatorConfig::default()).unwrap();
        assert!(locator.locate(&GrayFrame::filled(0, 0, 0)).is_err());
    }
}

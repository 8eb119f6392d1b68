//! Face and Eye Locator
//!
//! The external classifier boundary: turns an intensity frame into the
//! [`DetectionResult`] the detectors consume. The classifier itself is a
//! black box to the detection layer; this crate provides an ONNX-backed
//! implementation with a deterministic mock fallback, plus a scripted
//! locator for tests and demos.

mod onnx;
mod scripted;

pub use onnx::{LocatorConfig, OnnxFaceLocator};
pub use scripted::ScriptedLocator;

use frame_stream::GrayFrame;
use proctoring::DetectionResult;
use thiserror::Error;

/// Locator error types
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Scripted locator exhausted")]
    ScriptExhausted,
}

/// Produces face/eye bounding boxes for one frame.
///
/// Implementations must tolerate arbitrary frame content; an empty
/// `DetectionResult` is the correct answer for a frame with no face, not an
/// error.
pub trait FaceLocator: Send {
    fn locate(&mut self, gray: &GrayFrame) -> Result<DetectionResult, LocateError>;
}

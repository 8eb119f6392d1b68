//! Frame source boundary and the synthetic test source

use crate::frame::VideoFrame;
use crate::FrameError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Frame source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 15,
        }
    }
}

/// Produces a lazy sequence of raster frames.
///
/// The capture backend (webcam, file replay) lives behind this trait; the
/// monitoring loop only ever asks for the next frame.
pub trait FrameSource: Send {
    /// Capture the next frame, blocking up to the source's own timeout
    fn next_frame(&mut self) -> Result<VideoFrame, FrameError>;
}

/// Deterministic synthetic source for tests and headless demos.
///
/// Emits flat gray frames with a slowly drifting intensity so that
/// consecutive frames are not byte-identical.
pub struct SyntheticSource {
    config: SourceConfig,
    sequence: u32,
}

impl SyntheticSource {
    pub fn new(config: SourceConfig) -> Self {
        info!(
            width = config.width,
            height = config.height,
            fps = config.fps,
            "Creating synthetic frame source"
        );
        Self {
            config,
            sequence: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<VideoFrame, FrameError> {
        let level = 96u8.wrapping_add((self.sequence % 16) as u8);
        let pixels = (self.config.width * self.config.height) as usize;
        let frame = VideoFrame::new(
            vec![level; pixels * 3],
            self.config.width,
            self.config.height,
            self.sequence as u64 * 1_000_000_000 / self.config.fps.max(1) as u64,
            self.sequence,
        );
        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame)
    }
}

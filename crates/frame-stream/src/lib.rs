//! Frame Stream Library for Exam Monitoring
//!
//! Provides the raster frame types consumed by the detection layer and the
//! frame-source boundary the capture backend plugs into. Supports:
//! - RGB webcam frames (640x480 @ 15fps typical)
//! - Single-channel intensity frames for region differencing
//! - A synthetic source for tests and headless demos

pub mod frame;
pub mod source;

pub use frame::{GrayFrame, Rect, VideoFrame};
pub use source::{FrameSource, SourceConfig, SyntheticSource};

use thiserror::Error;

/// Frame source error types
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to open frame source: {0}")]
    Open(String),

    #[error("Invalid frame geometry: {0}")]
    Geometry(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),

    #[error("Capture timeout")]
    Timeout,

    #[error("Frame source exhausted")]
    Exhausted,
}

//! Exam Monitoring Session
//!
//! Composition root: config loading, logging setup, and the per-frame
//! capture-locate-detect loop feeding the alert sink.

mod config;
mod session;

pub use config::SessionConfig;
pub use session::{ProctorSession, Step};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Session error types
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid detection settings: {0}")]
    Detection(#[from] proctoring::DetectError),

    #[error("Frame source failed: {0}")]
    Frame(#[from] frame_stream::FrameError),

    #[error("Locator failed repeatedly: {0}")]
    Locator(#[from] face_locate::LocateError),

    #[error("Alert sink failed: {0}")]
    Alert(#[from] alerting::AlertError),
}

/// Install the global tracing subscriber
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

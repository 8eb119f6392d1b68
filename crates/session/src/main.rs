//! Exam Monitor - Main Entry Point

use alerting::{AlertSink, JsonlSink, MemorySink};
use face_locate::OnnxFaceLocator;
use frame_stream::SyntheticSource;
use proctoring::DetectorSuite;
use session::{init_logging, ProctorSession, SessionConfig, SessionError};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), SessionError> {
    init_logging();

    info!("=== Exam Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    let config = SessionConfig::load(config_path.as_deref())?;

    let sink: Arc<dyn AlertSink> = match &config.alert_log {
        Some(path) => Arc::new(JsonlSink::open(path)?),
        None => Arc::new(MemorySink::new()),
    };

    let mut suite = DetectorSuite::new(&config.detection)?;
    suite.set_alert_sink(sink);

    let source = SyntheticSource::new(config.source.clone());
    let locator = OnnxFaceLocator::new(config.locator_config())?;

    let mut session = ProctorSession::new(source, locator, suite, config.source.fps);
    let analyzed = session.run(config.max_frames.or(Some(300))).await?;
    info!(analyzed, "Done");

    Ok(())
}

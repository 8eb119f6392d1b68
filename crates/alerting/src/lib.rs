//! Alerting System
//!
//! Alert records for proctoring violations, the sink boundary the detectors
//! push into, and sink implementations (in-memory, JSON-lines file, and a
//! cooldown/throttle wrapper).

mod alert;
mod cooldown;
mod sinks;

pub use alert::{Alert, AlertKind, AlertSink};
pub use cooldown::{CooldownConfig, CooldownSink};
pub use sinks::{JsonlSink, MemorySink};

use thiserror::Error;

/// Alerting error types
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Failed to open alert log {path}: {source}")]
    LogOpen {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to append alert record: {0}")]
    LogWrite(#[from] std::io::Error),

    #[error("Failed to serialize alert record: {0}")]
    Serialize(#[from] serde_json::Error),
}

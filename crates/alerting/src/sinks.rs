//! In-memory and JSON-lines alert sinks

use crate::alert::{Alert, AlertKind, AlertSink};
use crate::AlertError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Collects alerts in memory; backs reports and tests
#[derive(Default)]
pub struct MemorySink {
    alerts: Mutex<Vec<Alert>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded alerts
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().expect("alert buffer poisoned").clone()
    }

    /// Number of recorded alerts of the given kind
    pub fn count_of(&self, kind: AlertKind) -> usize {
        self.alerts
            .lock()
            .expect("alert buffer poisoned")
            .iter()
            .filter(|a| a.kind == kind)
            .count()
    }

    /// Drain all recorded alerts
    pub fn drain(&self) -> Vec<Alert> {
        std::mem::take(&mut *self.alerts.lock().expect("alert buffer poisoned"))
    }
}

impl AlertSink for MemorySink {
    fn log_alert(&self, kind: AlertKind, message: &str) {
        let alert = Alert::now(kind, message);
        if kind.is_violation() {
            warn!(kind = kind.as_str(), message, "Violation alert");
        } else {
            info!(kind = kind.as_str(), message, "Alert");
        }
        self.alerts
            .lock()
            .expect("alert buffer poisoned")
            .push(alert);
    }
}

/// Appends one JSON object per alert to a log file
pub struct JsonlSink {
    file: Mutex<File>,
}

impl JsonlSink {
    /// Open (or create) the alert log for appending
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AlertError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| AlertError::LogOpen {
                path: path.display().to_string(),
                source,
            })?;
        info!(path = %path.display(), "Opened alert log");
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn append(&self, alert: &Alert) -> Result<(), AlertError> {
        let line = serde_json::to_string(alert)?;
        let mut file = self.file.lock().expect("alert log poisoned");
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl AlertSink for JsonlSink {
    fn log_alert(&self, kind: AlertKind, message: &str) {
        let alert = Alert::now(kind, message);
        if kind.is_violation() {
            warn!(kind = kind.as_str(), message, "Violation alert");
        } else {
            info!(kind = kind.as_str(), message, "Alert");
        }
        if let Err(e) = self.append(&alert) {
            // Fire-and-forget contract: persistence failure never reaches
            // the detectors.
            error!(error = %e, "Failed to persist alert");
        }
    }
}

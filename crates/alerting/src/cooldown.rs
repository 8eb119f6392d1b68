//! Cooldown and throttling wrapper sink
//!
//! Optional layer for deployments where the raw detector output is too
//! chatty (the presence and multi-face detectors deliberately re-fire every
//! frame while the condition holds). Wraps any inner sink and suppresses
//! duplicates within a per-kind cooldown window plus an hourly cap.

use crate::alert::{AlertKind, AlertSink};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Cooldown configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Suppression window between same-kind alerts (seconds)
    pub cooldown_seconds: u64,
    /// Maximum alerts per hour before throttling everything
    pub max_alerts_per_hour: usize,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 30,
            max_alerts_per_hour: 120,
        }
    }
}

struct CooldownState {
    last_fired: HashMap<AlertKind, Instant>,
    hourly_count: usize,
    hour_start: Instant,
}

/// Deduplicating wrapper around another sink
pub struct CooldownSink {
    config: CooldownConfig,
    inner: Arc<dyn AlertSink>,
    state: Mutex<CooldownState>,
}

impl CooldownSink {
    pub fn new(config: CooldownConfig, inner: Arc<dyn AlertSink>) -> Self {
        Self {
            config,
            inner,
            state: Mutex::new(CooldownState {
                last_fired: HashMap::new(),
                hourly_count: 0,
                hour_start: Instant::now(),
            }),
        }
    }

    fn should_forward(&self, kind: AlertKind, now: Instant) -> bool {
        let mut state = self.state.lock().expect("cooldown state poisoned");

        if now.duration_since(state.hour_start) > Duration::from_secs(3600) {
            state.hourly_count = 0;
            state.hour_start = now;
        }

        if state.hourly_count >= self.config.max_alerts_per_hour {
            warn!(kind = kind.as_str(), "Alert throttled: hourly cap reached");
            return false;
        }

        if let Some(&last) = state.last_fired.get(&kind) {
            if now.duration_since(last) < Duration::from_secs(self.config.cooldown_seconds) {
                debug!(kind = kind.as_str(), "Alert suppressed: in cooldown");
                return false;
            }
        }

        state.last_fired.insert(kind, now);
        state.hourly_count += 1;
        true
    }
}

impl AlertSink for CooldownSink {
    fn log_alert(&self, kind: AlertKind, message: &str) {
        if self.should_forward(kind, Instant::now()) {
            self.inner.log_alert(kind, message);
        }
    }
}

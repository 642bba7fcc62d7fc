//! Alert formatting and cooldown deduplication (§4.9 step 9, §5, §12).
//!
//! The alerting collaborator itself (where a formatted line ultimately
//! goes — Slack, email, a dashboard) is out of scope per §1; what this
//! crate owns is the one structured `tracing` line per rejection/summary
//! and the keyed cooldown map that coalesces repeats of the same alert
//! key within a window, so a flapping condition doesn't spam the sink.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub key: String,
    pub severity: AlertSeverity,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn info(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self { key: key.into(), severity: AlertSeverity::Info, message: message.into() }
    }

    #[must_use]
    pub fn warn(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self { key: key.into(), severity: AlertSeverity::Warn, message: message.into() }
    }

    #[must_use]
    pub fn error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self { key: key.into(), severity: AlertSeverity::Error, message: message.into() }
    }

    fn emit(&self) {
        match self.severity {
            AlertSeverity::Info => info!(key = %self.key, "{}", self.message),
            AlertSeverity::Warn => warn!(key = %self.key, "{}", self.message),
            AlertSeverity::Error => error!(key = %self.key, "{}", self.message),
        }
    }
}

/// In-memory keyed cooldown map guarded by a single mutex (§5 locking
/// discipline: one lock of its own, never held across an HTTP call).
pub struct AlertDeduper {
    cooldown: Duration,
    last_sent: Mutex<HashMap<String, Instant>>,
}

impl AlertDeduper {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown, last_sent: Mutex::new(HashMap::new()) }
    }

    /// Emits `alert` via `tracing` unless the same key fired within the
    /// cooldown window, in which case it's silently coalesced. Returns
    /// whether the alert was actually emitted.
    pub fn send(&self, alert: Alert) -> bool {
        let now = Instant::now();
        let mut last_sent = self.last_sent.lock();
        if let Some(prev) = last_sent.get(&alert.key) {
            if now.duration_since(*prev) < self.cooldown {
                return false;
            }
        }
        last_sent.insert(alert.key.clone(), now);
        drop(last_sent);
        alert.emit();
        true
    }

    /// Periodic sweep (driven by the 10-minute ticker, §4.9) dropping
    /// entries whose cooldown has long since expired so the map doesn't
    /// grow unbounded across a long-running process.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let cooldown = self.cooldown;
        self.last_sent.lock().retain(|_, last| now.duration_since(*last) < cooldown * 4);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.last_sent.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Scan-loop liveness state shared with the HTTP health endpoint.

use algo_trade_core::domain::ScanSummary;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

/// Tracks the timestamp and result of the most recently completed scan
/// tick, so the health endpoint can answer "is the loop still alive" and
/// "what happened last time" without touching the scan task itself.
pub struct HealthState {
    started_at: DateTime<Utc>,
    last_tick: RwLock<Option<DateTime<Utc>>>,
    last_summary: RwLock<Option<ScanSummary>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            last_tick: RwLock::new(None),
            last_summary: RwLock::new(None),
        }
    }

    /// Called by the scan loop at the end of every tick.
    pub fn record_tick(&self, summary: ScanSummary) {
        *self.last_tick.write() = Some(Utc::now());
        *self.last_summary.write() = Some(summary);
    }

    #[must_use]
    pub fn snapshot(&self) -> HealthSnapshot {
        let last_tick = *self.last_tick.read();
        let last_summary = self.last_summary.read().clone();
        HealthSnapshot {
            uptime_secs: (Utc::now() - self.started_at).num_seconds().max(0),
            last_tick_secs_ago: last_tick.map(|t| (Utc::now() - t).num_seconds().max(0)),
            last_summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub uptime_secs: i64,
    pub last_tick_secs_ago: Option<i64>,
    pub last_summary: Option<ScanSummary>,
}

impl HealthSnapshot {
    /// The loop is considered live if it has completed at least one tick
    /// and the last one wasn't too long ago. `max_staleness_secs` should
    /// be a generous multiple of the configured poll interval.
    #[must_use]
    pub fn is_live(&self, max_staleness_secs: i64) -> bool {
        matches!(self.last_tick_secs_ago, Some(secs) if secs <= max_staleness_secs)
    }
}

//! Weekly maintenance window check (§4.9 step 2, §6).
//!
//! The exchange is unavailable for trading Thursday 03:00-05:00 in its
//! declared timezone. §9's design notes call out that timezone data may be
//! missing on a given host, so this falls back to a fixed UTC offset
//! rather than failing the check outright.

use chrono::{DateTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;

/// Fixed fallback offset (hours east of UTC) used when `tz` lookup or
/// conversion isn't available. Matches the exchange's primary timezone
/// (US Eastern, standard time) closely enough for a maintenance-window
/// guard, which only needs day-of-week and hour-of-day resolution.
const FALLBACK_UTC_OFFSET_HOURS: i64 = -5;

/// Returns whether `now` falls inside the exchange's weekly maintenance
/// window: Thursday 03:00-05:00 in `tz`. Execution should be skipped
/// during this window, though alerts may still be emitted (§4.9 step 2).
#[must_use]
pub fn is_maintenance_window(now: DateTime<Utc>, tz: Tz) -> bool {
    let local = now.with_timezone(&tz);
    local.weekday() == Weekday::Thu && (3..5).contains(&local.hour())
}

/// As [`is_maintenance_window`], but using the fixed UTC-offset fallback
/// instead of IANA timezone data, for hosts where `tz` lookups aren't
/// reliable.
#[must_use]
pub fn is_maintenance_window_fallback(now: DateTime<Utc>) -> bool {
    let shifted = now + chrono::Duration::hours(FALLBACK_UTC_OFFSET_HOURS);
    shifted.weekday() == Weekday::Thu && (3..5).contains(&shifted.hour())
}

//! Sliding time window policy.
//!
//! A single predicate decides whether a timestamped entry still counts
//! toward duplicate detection. Eviction and duplicate counting both go
//! through it, so the two can never disagree about what is live.

use chrono::{DateTime, Duration, Utc};

/// Check whether `timestamp` has fallen out of the trailing window.
///
/// An entry expires once strictly more than `window_minutes` minutes
/// have elapsed between it and `now`. An entry exactly on the boundary
/// is still live.
pub fn is_expired(timestamp: DateTime<Utc>, now: DateTime<Utc>, window_minutes: u32) -> bool {
    now.signed_duration_since(timestamp) > Duration::minutes(i64::from(window_minutes))
}

//! Expiration Policy
//!
//! Turns a relative TTL into an absolute deadline and decides liveness.
//! Deadlines are Unix timestamps in milliseconds.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Stamp ==
/// Computes the absolute expiry for a write happening now.
///
/// `None` means the entry never expires. A zero TTL yields a deadline of `now`,
/// so the entry is already dead when read back.
pub fn stamp(ttl: Option<Duration>) -> Option<u64> {
    stamp_at(ttl, current_timestamp_ms())
}

/// Same as [`stamp`] with an explicit clock reading.
pub fn stamp_at(ttl: Option<Duration>, now: u64) -> Option<u64> {
    ttl.map(|ttl| {
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        now.saturating_add(millis)
    })
}

// == Is Live ==
/// An entry is live unless it carries a deadline that has been reached.
///
/// Boundary: `now == expires_at` is already expired.
pub fn is_live(expires_at: Option<u64>, now: u64) -> bool {
    match expires_at {
        Some(deadline) => now < deadline,
        None => true,
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

//! Clock helpers.

use chrono::{DateTime, SubsecRound, Utc};

/// Digits of sub-second precision kept in timestamps, matching `TIMESTAMPTZ`.
const STORED_SUBSEC_DIGITS: u16 = 6;

/// Current time truncated to microseconds, so a value handed back to the
/// caller equals the one later read from storage.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(STORED_SUBSEC_DIGITS)
}

//! Millisecond-precision timestamp type
//!
//! Every record built by [`ErrorBuilder`](crate::ErrorBuilder) is stamped
//! with the moment `build()` ran. Timestamps are stored as milliseconds since
//! Unix epoch (1970-01-01 00:00:00 UTC) and serialize as a bare integer, so
//! the wire form matches what log pipelines and error monitors expect.
//!
//! ```
//! use faultline_core::Timestamp;
//!
//! let ts = Timestamp::from_millis(1_700_000_000_000);
//! assert_eq!(ts.as_millis(), 1_700_000_000_000);
//! assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20.000Z");
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Create a timestamp for the current moment
    ///
    /// Returns epoch if the system clock is before Unix epoch.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_millis() as u64)
    }

    /// Create a timestamp from milliseconds since epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Milliseconds since Unix epoch
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Compute duration since an earlier timestamp
    ///
    /// Returns `None` if `earlier` is actually later than `self`.
    pub fn duration_since(&self, earlier: Timestamp) -> Option<Duration> {
        self.0.checked_sub(earlier.0).map(Duration::from_millis)
    }

    /// UTC date-time, or `None` if out of chrono's range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(i64::try_from(self.0).ok()?)
    }

    /// RFC 3339 rendering with millisecond precision
    ///
    /// Falls back to the raw millisecond count when the value is outside the
    /// representable calendar range.
    pub fn to_rfc3339(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.0.to_string(),
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Timestamp::from_millis(millis)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Protocol timestamps.
//!
//! Arithmetic saturates at the ends of the tick range instead of wrapping.

use std::fmt;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Protocol timestamp: 100ns ticks since 1601-01-01T00:00:00Z.
///
/// Tick zero is the protocol's null time; [`DateTime::NULL`] is used as a
/// sentinel (for example "no end time" in a history request).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateTime(i64);

/// Seconds between 1601-01-01 and 1970-01-01.
const EPOCH_OFFSET_SECS: i64 = 11_644_473_600;
const TICKS_PER_SEC: i64 = 10_000_000;
const TICKS_PER_MS: i64 = 10_000;

impl DateTime {
    pub const NULL: DateTime = DateTime(0);

    pub fn now() -> Self {
        Self::from_chrono(Utc::now())
    }

    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    pub fn from_chrono(value: chrono::DateTime<Utc>) -> Self {
        let secs = value.timestamp().saturating_add(EPOCH_OFFSET_SECS);
        Self(
            secs.saturating_mul(TICKS_PER_SEC)
                .saturating_add(i64::from(value.timestamp_subsec_nanos() / 100)),
        )
    }

    pub fn from_unix_millis(ms: i64) -> Self {
        Self(
            ms.saturating_mul(TICKS_PER_MS)
                .saturating_add(EPOCH_OFFSET_SECS * TICKS_PER_SEC),
        )
    }

    pub const fn ticks(&self) -> i64 {
        self.0
    }

    pub fn unix_millis(&self) -> i64 {
        self.0
            .saturating_sub(EPOCH_OFFSET_SECS * TICKS_PER_SEC)
            .div_euclid(TICKS_PER_MS)
    }

    pub fn as_chrono(&self) -> Option<chrono::DateTime<Utc>> {
        let unix_ticks = self.0.saturating_sub(EPOCH_OFFSET_SECS * TICKS_PER_SEC);
        let secs = unix_ticks.div_euclid(TICKS_PER_SEC);
        let nanos = (unix_ticks.rem_euclid(TICKS_PER_SEC) * 100) as u32;
        Utc.timestamp_opt(secs, nanos).single()
    }

    /// Offset this timestamp by a signed number of milliseconds.
    pub fn plus_millis(&self, ms: i64) -> Self {
        Self(self.0.saturating_add(ms.saturating_mul(TICKS_PER_MS)))
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::NULL
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(value: chrono::DateTime<Utc>) -> Self {
        Self::from_chrono(value)
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateTime({self})")
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("null");
        }
        match self.as_chrono() {
            Some(t) => f.write_str(&t.to_rfc3339()),
            None => write!(f, "{} ticks", self.0),
        }
    }
}

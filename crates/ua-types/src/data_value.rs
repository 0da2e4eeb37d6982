//! [`DataValue`]: a value with its status and timestamps.

use serde::{Deserialize, Serialize};

use crate::attribute::TimestampsToReturn;
use crate::status::StatusCode;
use crate::time::DateTime;
use crate::variant::Variant;

/// A value with its status and timestamps.
///
/// The unit of exchange for Read, Write, and HistoryRead.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    pub value: Variant,
    pub status: StatusCode,
    pub source_timestamp: Option<DateTime>,
    pub server_timestamp: Option<DateTime>,
}

impl DataValue {
    /// A good value stamped with the current time as both timestamps.
    pub fn new(value: impl Into<Variant>) -> Self {
        let now = DateTime::now();
        Self {
            value: value.into(),
            status: StatusCode::GOOD,
            source_timestamp: Some(now),
            server_timestamp: Some(now),
        }
    }

    /// A good value with no timestamps.
    pub fn value_only(value: impl Into<Variant>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// A value carrying only a status (empty payload, no timestamps).
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// A good historical sample with explicit timestamps.
    pub fn sample(value: impl Into<Variant>, source: DateTime, server: DateTime) -> Self {
        Self {
            value: value.into(),
            status: StatusCode::GOOD,
            source_timestamp: Some(source),
            server_timestamp: Some(server),
        }
    }

    /// Drop the timestamps the caller did not ask for.
    pub fn with_timestamps(mut self, timestamps: TimestampsToReturn) -> Self {
        match timestamps {
            TimestampsToReturn::Source => self.server_timestamp = None,
            TimestampsToReturn::Server => self.source_timestamp = None,
            TimestampsToReturn::Both => {}
            TimestampsToReturn::Neither => {
                self.source_timestamp = None;
                self.server_timestamp = None;
            }
        }
        self
    }
}

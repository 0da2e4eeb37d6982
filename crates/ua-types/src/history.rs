//! HistoryRead request details and results.
//!
//! [`HistoryReadDetails`] is a closed set: every dispatch site matches on it
//! exhaustively, so a new kind cannot be silently ignored.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::attribute::QualifiedName;
use crate::data_value::DataValue;
use crate::node_id::NodeId;
use crate::range::NumericRange;
use crate::status::StatusCode;
use crate::time::DateTime;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRawModifiedDetails {
    pub is_read_modified: bool,
    pub start_time: DateTime,
    /// [`DateTime::NULL`] requests only the most recent sample.
    pub end_time: DateTime,
    /// Maximum samples per node; 0 means no limit.
    pub num_values_per_node: u32,
    /// Bounding values are never synthesized; the window policy alone decides
    /// which samples are returned.
    pub return_bounds: bool,
}

impl ReadRawModifiedDetails {
    pub fn window(start_time: DateTime, end_time: DateTime) -> Self {
        Self {
            is_read_modified: false,
            start_time,
            end_time,
            num_values_per_node: 0,
            return_bounds: false,
        }
    }

    pub fn latest() -> Self {
        Self::window(DateTime::NULL, DateTime::NULL)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadEventDetails {
    pub num_values_per_node: u32,
    pub start_time: DateTime,
    pub end_time: DateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadAtTimeDetails {
    pub req_times: Vec<DateTime>,
    pub use_simple_bounds: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadProcessedDetails {
    pub start_time: DateTime,
    pub end_time: DateTime,
    pub processing_interval_ms: f64,
    pub aggregate_types: Vec<NodeId>,
}

/// The kind of historical query and its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum HistoryReadDetails {
    RawModified(ReadRawModifiedDetails),
    Event(ReadEventDetails),
    AtTime(ReadAtTimeDetails),
    Processed(ReadProcessedDetails),
}

impl HistoryReadDetails {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RawModified(_) => "RawModified",
            Self::Event(_) => "Event",
            Self::AtTime(_) => "AtTime",
            Self::Processed(_) => "Processed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryReadValueId {
    pub node_id: NodeId,
    pub index_range: Option<NumericRange>,
    /// Samples are held decoded, so the encoding is not consulted.
    pub data_encoding: Option<QualifiedName>,
    pub continuation_point: Option<Bytes>,
}

impl HistoryReadValueId {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            index_range: None,
            data_encoding: None,
            continuation_point: None,
        }
    }
}

/// Samples returned for one node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub data_values: Vec<DataValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryReadResult {
    pub status: StatusCode,
    pub continuation_point: Option<Bytes>,
    pub history_data: Option<HistoryData>,
}

impl HistoryReadResult {
    pub fn good(data_values: Vec<DataValue>) -> Self {
        Self {
            status: StatusCode::GOOD,
            continuation_point: None,
            history_data: Some(HistoryData { data_values }),
        }
    }

    /// A failed result carrying no data.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status,
            continuation_point: None,
            history_data: None,
        }
    }

    pub fn data_values(&self) -> &[DataValue] {
        self.history_data
            .as_ref()
            .map(|h| h.data_values.as_slice())
            .unwrap_or_default()
    }
}

//! History dispatcher.
//!
//! Branches a HistoryRead over its detail kind. Only RawModified is served;
//! the other kinds produce an explicit `Bad_HistoryOperationUnsupported`
//! result per item. Samples come from a [`HistoryProvider`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::{debug, warn};
use ua_nodes::NodeManager;
use ua_types::{
    DataValue, DateTime, HistoryData, HistoryReadDetails, HistoryReadResult, HistoryReadValueId,
    NodeId, ReadRawModifiedDetails, StatusCode, TimestampsToReturn, UaError,
};

use crate::config::{HistoryConfig, WindowBounds};

/// Source of stored samples.
///
/// Implementations return a node's samples **newest first**; the dispatcher
/// relies on this to pick the most recent sample without sorting.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn read_raw(&self, node_id: &NodeId) -> Result<Vec<DataValue>, UaError>;
}

/// Provider with no stored history.
pub struct NoHistory;

#[async_trait]
impl HistoryProvider for NoHistory {
    async fn read_raw(&self, _node_id: &NodeId) -> Result<Vec<DataValue>, UaError> {
        Ok(Vec::new())
    }
}

/// Samples held in memory, kept newest first by server timestamp.
#[derive(Default)]
pub struct InMemoryHistory {
    samples: RwLock<HashMap<NodeId, Vec<DataValue>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a sample. Samples without a server timestamp sort last.
    pub fn record(&self, node_id: NodeId, sample: DataValue) {
        let mut samples = self.samples.write().unwrap_or_else(PoisonError::into_inner);
        let series = samples.entry(node_id).or_default();
        let key = sample.server_timestamp.unwrap_or(DateTime::NULL);
        let at = series.partition_point(|s| s.server_timestamp.unwrap_or(DateTime::NULL) >= key);
        series.insert(at, sample);
    }

    pub fn sample_count(&self, node_id: &NodeId) -> usize {
        let samples = self.samples.read().unwrap_or_else(PoisonError::into_inner);
        samples.get(node_id).map_or(0, Vec::len)
    }
}

#[async_trait]
impl HistoryProvider for InMemoryHistory {
    async fn read_raw(&self, node_id: &NodeId) -> Result<Vec<DataValue>, UaError> {
        let samples = self.samples.read().unwrap_or_else(PoisonError::into_inner);
        Ok(samples.get(node_id).cloned().unwrap_or_default())
    }
}

/// Samples whose server timestamp lies within `[start, end]` under `bounds`.
///
/// Input order is preserved. Samples with no server timestamp never match.
pub fn filter_window(
    samples: &[DataValue],
    start: DateTime,
    end: DateTime,
    bounds: WindowBounds,
) -> Vec<DataValue> {
    samples
        .iter()
        .filter(|s| {
            s.server_timestamp
                .is_some_and(|t| bounds.contains(start, end, t))
        })
        .cloned()
        .collect()
}

pub struct HistoryDispatcher {
    nodes: Arc<dyn NodeManager>,
    provider: Arc<dyn HistoryProvider>,
    config: HistoryConfig,
}

impl HistoryDispatcher {
    pub fn new(
        nodes: Arc<dyn NodeManager>,
        provider: Arc<dyn HistoryProvider>,
        config: HistoryConfig,
    ) -> Self {
        Self {
            nodes,
            provider,
            config,
        }
    }

    /// Serve one item of a HistoryRead batch.
    pub async fn read(
        &self,
        details: &HistoryReadDetails,
        timestamps: TimestampsToReturn,
        item: &HistoryReadValueId,
    ) -> HistoryReadResult {
        match details {
            HistoryReadDetails::RawModified(raw) => self.read_raw(raw, timestamps, item).await,
            HistoryReadDetails::Event(_)
            | HistoryReadDetails::AtTime(_)
            | HistoryReadDetails::Processed(_) => {
                debug!(node = %item.node_id, kind = details.kind(), "history kind not supported");
                HistoryReadResult::from_status(StatusCode::BAD_HISTORY_OPERATION_UNSUPPORTED)
            }
        }
    }

    async fn read_raw(
        &self,
        details: &ReadRawModifiedDetails,
        timestamps: TimestampsToReturn,
        item: &HistoryReadValueId,
    ) -> HistoryReadResult {
        let Some(node) = self.nodes.get_node(&item.node_id) else {
            return HistoryReadResult::from_status(StatusCode::BAD_NODE_ID_UNKNOWN);
        };
        if !node.is_historizing() {
            return HistoryReadResult::from_status(StatusCode::BAD_HISTORY_OPERATION_UNSUPPORTED);
        }
        if details.is_read_modified {
            debug!(node = %item.node_id, "modified-value history is not recorded");
            return HistoryReadResult::from_status(StatusCode::BAD_HISTORY_OPERATION_UNSUPPORTED);
        }

        let samples = match self.provider.read_raw(&item.node_id).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!(node = %item.node_id, error = %e, "history provider failed");
                return HistoryReadResult::from_status(e.status_code());
            }
        };

        let selected = if details.end_time.is_null() {
            match samples.into_iter().next() {
                Some(latest) => vec![latest],
                None => {
                    return HistoryReadResult {
                        status: StatusCode::GOOD_NO_DATA,
                        continuation_point: None,
                        history_data: Some(HistoryData::default()),
                    };
                }
            }
        } else {
            let mut window = filter_window(
                &samples,
                details.start_time,
                details.end_time,
                self.config.window_bounds,
            );
            if let Some(limit) = self.config.value_limit(details.num_values_per_node) {
                window.truncate(limit);
            }
            window
        };

        debug!(node = %item.node_id, count = selected.len(), "history read");
        let values = selected
            .into_iter()
            .map(|sample| shape_sample(sample, timestamps, item))
            .collect();
        HistoryReadResult::good(values)
    }
}

fn shape_sample(
    sample: DataValue,
    timestamps: TimestampsToReturn,
    item: &HistoryReadValueId,
) -> DataValue {
    let mut sample = sample.with_timestamps(timestamps);
    if let Some(range) = &item.index_range {
        match range.read(&sample.value) {
            Ok(v) => sample.value = v,
            Err(status) => {
                sample.value = Default::default();
                sample.status = status;
            }
        }
    }
    sample
}

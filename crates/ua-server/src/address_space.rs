//! The address-space service façade.
//!
//! Each operation takes a [`ServiceContext`] and signals it exactly once.
//! Batch operations map every input item to one output item, in input
//! order, and never fail as a whole. Only Browse can report a whole-call
//! failure.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::debug;
use ua_nodes::{AttributeContext, NodeManager, Reference};
use ua_types::{
    Ack, CallMethodRequest, CallMethodResult, DataValue, HistoryReadDetails, HistoryReadResult,
    HistoryReadValueId, NodeId, ReadValueId, StatusCode, TimestampsToReturn, ViewDescription,
    WriteValue,
};

use crate::config::ServiceConfig;
use crate::context::ServiceContext;
use crate::history::{HistoryDispatcher, HistoryProvider};
use crate::method;

#[async_trait]
pub trait AddressSpace: Send + Sync {
    /// References of `node_id`, or `Bad_NodeIdUnknown` if it does not exist.
    async fn browse(
        &self,
        ctx: ServiceContext<Vec<Reference>>,
        view: &ViewDescription,
        node_id: &NodeId,
    );

    /// References of `node_id`. Performs no existence check; an unknown node
    /// has no references.
    async fn get_references(
        &self,
        ctx: ServiceContext<Vec<Reference>>,
        view: &ViewDescription,
        node_id: &NodeId,
    );

    async fn register_nodes(&self, ctx: ServiceContext<Vec<NodeId>>, node_ids: &[NodeId]);

    async fn unregister_nodes(&self, ctx: ServiceContext<Vec<Ack>>, node_ids: &[NodeId]);

    async fn read(
        &self,
        ctx: ServiceContext<Vec<DataValue>>,
        max_age: f64,
        timestamps: TimestampsToReturn,
        items: &[ReadValueId],
    );

    async fn write(&self, ctx: ServiceContext<Vec<StatusCode>>, items: &[WriteValue]);

    async fn history_read(
        &self,
        ctx: ServiceContext<Vec<HistoryReadResult>>,
        details: &HistoryReadDetails,
        timestamps: TimestampsToReturn,
        items: &[HistoryReadValueId],
    );

    async fn call(
        &self,
        ctx: ServiceContext<Vec<CallMethodResult>>,
        requests: &[CallMethodRequest],
    );
}

/// [`AddressSpace`] over a shared [`NodeManager`].
///
/// Attribute access is delegated to each node's accessor, history to a
/// [`HistoryProvider`], and calls to the handler bound to the method node.
pub struct ManagedAddressSpace {
    nodes: Arc<dyn NodeManager>,
    history: HistoryDispatcher,
    config: ServiceConfig,
}

impl ManagedAddressSpace {
    pub fn new(
        nodes: Arc<dyn NodeManager>,
        history: Arc<dyn HistoryProvider>,
        config: ServiceConfig,
    ) -> Self {
        let dispatcher =
            HistoryDispatcher::new(Arc::clone(&nodes), history, config.history.clone());
        Self {
            nodes,
            history: dispatcher,
            config,
        }
    }

    pub fn node_manager(&self) -> &Arc<dyn NodeManager> {
        &self.nodes
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn read_one(
        &self,
        ctx: &AttributeContext,
        timestamps: TimestampsToReturn,
        item: &ReadValueId,
    ) -> DataValue {
        let Some(node) = self.nodes.get(&item.node_id) else {
            debug!(node = %item.node_id, "read of unknown node");
            return DataValue::from_status(StatusCode::BAD_NODE_ID_UNKNOWN);
        };
        node.read_attribute(
            ctx,
            item.attribute_id,
            timestamps,
            item.index_range.as_ref(),
            item.data_encoding.as_ref(),
        )
        .await
    }

    async fn write_one(&self, ctx: &AttributeContext, item: &WriteValue) -> StatusCode {
        let Some(node) = self.nodes.get(&item.node_id) else {
            debug!(node = %item.node_id, "write to unknown node");
            return StatusCode::BAD_NODE_ID_UNKNOWN;
        };
        match node
            .write_attribute(ctx, item.attribute_id, &item.value, item.index_range.as_ref())
            .await
        {
            Ok(()) => StatusCode::GOOD,
            Err(e) => {
                debug!(
                    node = %item.node_id,
                    attribute = %item.attribute_id,
                    error = %e,
                    "write rejected"
                );
                e.status_code()
            }
        }
    }
}

/// Drive `pending` with at most `limit` in flight, yielding results in
/// input order.
async fn in_order<F: Future>(pending: Vec<F>, limit: usize) -> Vec<F::Output> {
    stream::iter(pending).buffered(limit.max(1)).collect().await
}

#[async_trait]
impl AddressSpace for ManagedAddressSpace {
    async fn browse(
        &self,
        ctx: ServiceContext<Vec<Reference>>,
        _view: &ViewDescription,
        node_id: &NodeId,
    ) {
        if !self.nodes.contains_node(node_id) {
            debug!(node = %node_id, "browse of unknown node");
            ctx.failure(StatusCode::BAD_NODE_ID_UNKNOWN);
            return;
        }
        let references = self.nodes.get_references(node_id);
        debug!(node = %node_id, count = references.len(), "browsed references");
        ctx.success(references);
    }

    async fn get_references(
        &self,
        ctx: ServiceContext<Vec<Reference>>,
        _view: &ViewDescription,
        node_id: &NodeId,
    ) {
        ctx.success(self.nodes.get_references(node_id));
    }

    async fn register_nodes(&self, ctx: ServiceContext<Vec<NodeId>>, node_ids: &[NodeId]) {
        ctx.success(node_ids.to_vec());
    }

    async fn unregister_nodes(&self, ctx: ServiceContext<Vec<Ack>>, node_ids: &[NodeId]) {
        ctx.success(vec![Ack; node_ids.len()]);
    }

    async fn read(
        &self,
        ctx: ServiceContext<Vec<DataValue>>,
        max_age: f64,
        timestamps: TimestampsToReturn,
        items: &[ReadValueId],
    ) {
        debug!(count = items.len(), max_age, "read");
        let attributes = ctx.attribute_context();
        let pending: Vec<_> = items
            .iter()
            .map(|item| self.read_one(&attributes, timestamps, item))
            .collect();
        let values = in_order(pending, self.config.max_concurrent_items).await;
        ctx.success(values);
    }

    async fn write(&self, ctx: ServiceContext<Vec<StatusCode>>, items: &[WriteValue]) {
        debug!(count = items.len(), "write");
        let attributes = ctx.attribute_context();
        let pending: Vec<_> = items
            .iter()
            .map(|item| self.write_one(&attributes, item))
            .collect();
        let results = in_order(pending, self.config.max_concurrent_items).await;
        ctx.success(results);
    }

    async fn history_read(
        &self,
        ctx: ServiceContext<Vec<HistoryReadResult>>,
        details: &HistoryReadDetails,
        timestamps: TimestampsToReturn,
        items: &[HistoryReadValueId],
    ) {
        debug!(count = items.len(), kind = details.kind(), "history read");
        let pending: Vec<_> = items
            .iter()
            .map(|item| self.history.read(details, timestamps, item))
            .collect();
        let results = in_order(pending, self.config.max_concurrent_items).await;
        ctx.success(results);
    }

    async fn call(
        &self,
        ctx: ServiceContext<Vec<CallMethodResult>>,
        requests: &[CallMethodRequest],
    ) {
        debug!(count = requests.len(), "call");
        let session_id = ctx.session_id();
        let pending: Vec<_> = requests
            .iter()
            .map(|request| method::call_method(self.nodes.as_ref(), session_id, request))
            .collect();
        let results = in_order(pending, self.config.max_concurrent_items).await;
        ctx.success(results);
    }
}

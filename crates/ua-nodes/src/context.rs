//! Capabilities handed to nodes and to the code running on their behalf.
//!
//! A node never owns the store that owns it. Instead it is built with a
//! [`NodeContext`] that can hand back the node manager on demand, so an
//! attribute accessor or method handler can call back into the graph.

use std::sync::{Arc, Weak};

use uuid::Uuid;

use crate::traits::NodeManager;

/// Shared capability injected into every node at construction time.
pub trait NodeContext: Send + Sync {
    /// The node manager this node lives in, if it is still alive.
    fn node_manager(&self) -> Option<Arc<dyn NodeManager>>;
}

/// Context backed by a weak handle to a node manager.
///
/// Holding the manager weakly keeps node lifetime independent of the store:
/// dropping the store drops its nodes even though each node holds a context.
pub struct ManagerContext {
    manager: Weak<dyn NodeManager>,
}

impl ManagerContext {
    pub fn new(manager: Weak<dyn NodeManager>) -> Self {
        Self { manager }
    }
}

impl NodeContext for ManagerContext {
    fn node_manager(&self) -> Option<Arc<dyn NodeManager>> {
        self.manager.upgrade()
    }
}

/// Context for nodes that are not attached to any store.
pub struct DetachedContext;

impl NodeContext for DetachedContext {
    fn node_manager(&self) -> Option<Arc<dyn NodeManager>> {
        None
    }
}

/// Per-request information passed to attribute accessors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeContext {
    /// Session on whose behalf the access happens; `None` for internal access.
    pub session_id: Option<Uuid>,
}

impl AttributeContext {
    pub fn for_session(session_id: Uuid) -> Self {
        Self {
            session_id: Some(session_id),
        }
    }

    pub fn internal() -> Self {
        Self::default()
    }
}

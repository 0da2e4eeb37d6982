//! In-memory node graph store.
//!
//! [`InMemoryNodeManager`] is an id-indexed arena: one map from `NodeId` to
//! node and one from `NodeId` to outgoing references, both behind a single
//! `RwLock`. Nodes never point at each other, so cycles in the graph are just
//! entries in the reference index.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::debug;
use ua_types::NodeId;

use crate::context::{ManagerContext, NodeContext};
use crate::error::{NodeError, NodeResult};
use crate::node::Node;
use crate::reference::Reference;
use crate::traits::NodeManager;

#[derive(Default)]
struct GraphState {
    nodes: HashMap<NodeId, Arc<Node>>,
    references: HashMap<NodeId, Vec<Reference>>,
}

pub struct InMemoryNodeManager {
    state: RwLock<GraphState>,
    context: Arc<dyn NodeContext>,
}

impl InMemoryNodeManager {
    /// Create an empty store.
    ///
    /// The store is returned in an `Arc` because it hands out a
    /// [`NodeContext`] that refers back to it weakly.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Self>| {
            let weak: Weak<dyn NodeManager> = me.clone();
            Self {
                state: RwLock::new(GraphState::default()),
                context: Arc::new(ManagerContext::new(weak)),
            }
        })
    }

    /// The context to build this store's nodes with.
    pub fn context(&self) -> Arc<dyn NodeContext> {
        Arc::clone(&self.context)
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> NodeError {
        NodeError::LockPoisoned(e.to_string())
    }
}

impl NodeManager for InMemoryNodeManager {
    fn contains_node(&self, id: &NodeId) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.nodes.contains_key(id)
    }

    fn get_node(&self, id: &NodeId) -> Option<Arc<Node>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.nodes.get(id).cloned()
    }

    fn get_references(&self, id: &NodeId) -> Vec<Reference> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.references.get(id).cloned().unwrap_or_default()
    }

    fn add_node(&self, node: Node) -> NodeResult<Arc<Node>> {
        let mut state = self.state.write().map_err(Self::poisoned)?;
        if state.nodes.contains_key(node.node_id()) {
            return Err(NodeError::DuplicateNode(node.node_id().clone()));
        }
        let node = Arc::new(node);
        debug!(node = %node.node_id(), class = %node.node_class(), "added node");
        state.nodes.insert(node.node_id().clone(), Arc::clone(&node));
        Ok(node)
    }

    fn remove_node(&self, id: &NodeId) -> NodeResult<Option<Arc<Node>>> {
        let mut state = self.state.write().map_err(Self::poisoned)?;
        let removed = state.nodes.remove(id);
        if removed.is_some() {
            state.references.remove(id);
            debug!(node = %id, "removed node");
        }
        Ok(removed)
    }

    fn add_reference(&self, reference: Reference) -> NodeResult<()> {
        let mut state = self.state.write().map_err(Self::poisoned)?;
        if !state.nodes.contains_key(&reference.source_id) {
            return Err(NodeError::DanglingSource {
                source_id: reference.source_id,
                target_id: reference.target_id,
            });
        }
        let edges = state
            .references
            .entry(reference.source_id.clone())
            .or_default();
        if !edges.contains(&reference) {
            edges.push(reference);
        }
        Ok(())
    }

    fn remove_reference(&self, reference: &Reference) -> NodeResult<bool> {
        let mut state = self.state.write().map_err(Self::poisoned)?;
        let Some(edges) = state.references.get_mut(&reference.source_id) else {
            return Ok(false);
        };
        let before = edges.len();
        edges.retain(|r| r != reference);
        Ok(edges.len() != before)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<NodeId> = state.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn node_count(&self) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.nodes.len()
    }
}

impl std::fmt::Debug for InMemoryNodeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryNodeManager")
            .field("node_count", &self.node_count())
            .finish()
    }
}

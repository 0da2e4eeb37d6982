//! The [`NodeManager`] trait defining the node graph storage interface.

use std::sync::Arc;

use ua_types::{ids, NodeClass, NodeId};

use crate::error::NodeResult;
use crate::node::Node;
use crate::reference::Reference;

/// Storage for nodes and the typed references between them.
///
/// Implementations must be thread-safe (`Send + Sync`). Lookups never fail:
/// an absent node is `None`, and the references of an absent node are an
/// empty list rather than an error, so callers that need an existence check
/// must ask [`contains_node`](Self::contains_node) explicitly.
pub trait NodeManager: Send + Sync {
    fn contains_node(&self, id: &NodeId) -> bool;

    fn get_node(&self, id: &NodeId) -> Option<Arc<Node>>;

    /// References whose source is `id`, in insertion order.
    fn get_references(&self, id: &NodeId) -> Vec<Reference>;

    /// Insert a node. Fails if a node with the same id is present.
    fn add_node(&self, node: Node) -> NodeResult<Arc<Node>>;

    /// Remove a node and the references stored under it.
    fn remove_node(&self, id: &NodeId) -> NodeResult<Option<Arc<Node>>>;

    /// Store a reference under its source node, which must exist.
    fn add_reference(&self, reference: Reference) -> NodeResult<()>;

    /// Returns `true` if the reference existed.
    fn remove_reference(&self, reference: &Reference) -> NodeResult<bool>;

    fn node_ids(&self) -> Vec<NodeId>;

    fn node_count(&self) -> usize;

    /// Alias of [`get_node`](Self::get_node) used by the Read and Write paths.
    fn get(&self, id: &NodeId) -> Option<Arc<Node>> {
        self.get_node(id)
    }

    /// Store `reference` and, when its target is tracked here, the inverse
    /// under the target.
    fn add_bidirectional_reference(&self, reference: Reference) -> NodeResult<()> {
        let inverse = reference.inverse();
        let target_is_local = self.contains_node(&reference.target_id);
        self.add_reference(reference)?;
        if target_is_local {
            self.add_reference(inverse)?;
        }
        Ok(())
    }

    /// Method nodes reachable from `id` over forward `HasComponent` edges.
    fn method_nodes(&self, id: &NodeId) -> Vec<Arc<Node>> {
        self.get_references(id)
            .iter()
            .filter(|r| r.is_forward_of_type(&ids::HAS_COMPONENT))
            .filter_map(|r| self.get_node(&r.target_id))
            .filter(|n| n.node_class() == NodeClass::Method)
            .collect()
    }

    /// The Method node `method_id` if it is a component of `object_id`.
    fn find_method_node(&self, object_id: &NodeId, method_id: &NodeId) -> Option<Arc<Node>> {
        self.get_references(object_id)
            .iter()
            .filter(|r| r.is_forward_of_type(&ids::HAS_COMPONENT) && r.target_id == *method_id)
            .find_map(|r| self.get_node(&r.target_id))
            .filter(|n| n.node_class() == NodeClass::Method)
    }
}

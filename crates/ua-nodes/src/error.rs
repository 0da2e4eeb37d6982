//! Error types for node graph operations.

use thiserror::Error;
use ua_types::NodeId;

/// Errors that can occur while mutating the node graph.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A node with this id is already present.
    #[error("duplicate node: {0}")]
    DuplicateNode(NodeId),

    /// A reference names a source node that is not in the store.
    #[error("reference source {source_id} is not in the store (target {target_id})")]
    DanglingSource {
        source_id: NodeId,
        target_id: NodeId,
    },

    /// A store lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience alias for node graph results.
pub type NodeResult<T> = Result<T, NodeError>;

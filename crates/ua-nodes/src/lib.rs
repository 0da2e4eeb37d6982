//! Node graph store for the address-space core.
//!
//! Holds every node and the directed, typed references between them, and
//! defines the per-node capabilities the service layer delegates to.
//!
//! # Architecture
//!
//! - The store is an arena keyed by [`NodeId`](ua_types::NodeId): one map of
//!   nodes, one map of outgoing references. Nodes do not own each other.
//! - Each [`Node`] carries an [`AttributeAccessor`] that reads and writes its
//!   attributes, and a [`NodeContext`] through which that code can reach the
//!   store again.
//! - Method nodes carry a [`MethodInvocationHandler`].
//!
//! # Modules
//!
//! - [`error`]: Error types for graph mutation
//! - [`node`]: [`Node`] and its class-specific [`NodeBody`]
//! - [`reference`]: [`Reference`] edges
//! - [`traits`]: The [`NodeManager`] storage interface
//! - [`memory`]: [`InMemoryNodeManager`]
//! - [`accessor`]: [`AttributeAccessor`] and [`StandardAttributes`]
//! - [`method`]: [`MethodInvocationHandler`] and [`FnMethodHandler`]
//! - [`context`]: [`NodeContext`] and [`AttributeContext`]

pub mod accessor;
pub mod context;
pub mod error;
pub mod memory;
pub mod method;
pub mod node;
pub mod reference;
pub mod traits;

pub use accessor::{AttributeAccessor, StandardAttributes};
pub use context::{AttributeContext, DetachedContext, ManagerContext, NodeContext};
pub use error::{NodeError, NodeResult};
pub use memory::InMemoryNodeManager;
pub use method::{
    validate_arguments, FnMethodHandler, InvocationContext, MethodError, MethodInvocationHandler,
};
pub use node::{MethodData, Node, NodeBody, VariableData};
pub use reference::Reference;
pub use traits::NodeManager;

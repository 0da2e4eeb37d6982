//! Typed reference edges.

use std::fmt;

use serde::{Deserialize, Serialize};
use ua_types::{ids, NodeId};

/// A directed, typed edge between two nodes.
///
/// The store indexes references by `source_id`. The target may be a node
/// this store does not track (cross-server references are legal).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub source_id: NodeId,
    pub reference_type_id: NodeId,
    pub target_id: NodeId,
    pub is_forward: bool,
}

impl Reference {
    pub fn new(
        source_id: NodeId,
        reference_type_id: NodeId,
        target_id: NodeId,
        is_forward: bool,
    ) -> Self {
        Self {
            source_id,
            reference_type_id,
            target_id,
            is_forward,
        }
    }

    /// Forward `HasComponent` edge from `parent` to `child`.
    pub fn has_component(parent: NodeId, child: NodeId) -> Self {
        Self::new(parent, ids::HAS_COMPONENT, child, true)
    }

    /// Forward `HasProperty` edge from `parent` to `property`.
    pub fn has_property(parent: NodeId, property: NodeId) -> Self {
        Self::new(parent, ids::HAS_PROPERTY, property, true)
    }

    /// Forward `Organizes` edge from `folder` to `child`.
    pub fn organizes(folder: NodeId, child: NodeId) -> Self {
        Self::new(folder, ids::ORGANIZES, child, true)
    }

    /// Forward `HasTypeDefinition` edge from `instance` to `type_id`.
    pub fn has_type_definition(instance: NodeId, type_id: NodeId) -> Self {
        Self::new(instance, ids::HAS_TYPE_DEFINITION, type_id, true)
    }

    /// The same edge seen from the target: endpoints swapped, direction flipped.
    pub fn inverse(&self) -> Self {
        Self {
            source_id: self.target_id.clone(),
            reference_type_id: self.reference_type_id.clone(),
            target_id: self.source_id.clone(),
            is_forward: !self.is_forward,
        }
    }

    pub fn is_forward_of_type(&self, reference_type_id: &NodeId) -> bool {
        self.is_forward && self.reference_type_id == *reference_type_id
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.is_forward { "->" } else { "<-" };
        write!(
            f,
            "{} {arrow}[{}] {}",
            self.source_id, self.reference_type_id, self.target_id
        )
    }
}

//! Well-known namespace-0 node ids.

use crate::node_id::NodeId;

pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);
pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(0, 40);
pub const HAS_SUBTYPE: NodeId = NodeId::numeric(0, 45);
pub const HAS_PROPERTY: NodeId = NodeId::numeric(0, 46);
pub const HAS_COMPONENT: NodeId = NodeId::numeric(0, 47);

pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);
pub const FOLDER_TYPE: NodeId = NodeId::numeric(0, 61);
pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);

pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(0, 85);

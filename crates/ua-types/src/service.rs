//! Request and result structures for Browse, Read, Write, and Call.
//!
//! Field names are semantic; the wire layout is owned by the codec layer.

use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeId, LocalizedText, QualifiedName};
use crate::data_value::DataValue;
use crate::node_id::NodeId;
use crate::range::NumericRange;
use crate::status::StatusCode;
use crate::time::DateTime;
use crate::variant::{Variant, VariantType};

/// Name of the default binary data encoding.
pub const DEFAULT_BINARY_ENCODING: &str = "Default Binary";

/// The view a Browse is restricted to. A null view id means the whole
/// address space.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDescription {
    pub view_id: NodeId,
    pub timestamp: DateTime,
    pub view_version: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadValueId {
    pub node_id: NodeId,
    pub attribute_id: AttributeId,
    pub index_range: Option<NumericRange>,
    pub data_encoding: Option<QualifiedName>,
}

impl ReadValueId {
    pub fn new(node_id: NodeId, attribute_id: AttributeId) -> Self {
        Self {
            node_id,
            attribute_id,
            index_range: None,
            data_encoding: None,
        }
    }

    pub fn value(node_id: NodeId) -> Self {
        Self::new(node_id, AttributeId::Value)
    }

    pub fn with_index_range(mut self, range: NumericRange) -> Self {
        self.index_range = Some(range);
        self
    }

    pub fn with_data_encoding(mut self, encoding: QualifiedName) -> Self {
        self.data_encoding = Some(encoding);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WriteValue {
    pub node_id: NodeId,
    pub attribute_id: AttributeId,
    pub index_range: Option<NumericRange>,
    pub value: DataValue,
}

impl WriteValue {
    pub fn new(node_id: NodeId, attribute_id: AttributeId, value: DataValue) -> Self {
        Self {
            node_id,
            attribute_id,
            index_range: None,
            value,
        }
    }

    pub fn value(node_id: NodeId, value: impl Into<Variant>) -> Self {
        Self::new(node_id, AttributeId::Value, DataValue::value_only(value))
    }

    pub fn with_index_range(mut self, range: NumericRange) -> Self {
        self.index_range = Some(range);
        self
    }
}

/// Declared input or output argument of a method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub data_type: VariantType,
    pub description: LocalizedText,
}

impl Argument {
    pub fn new(name: impl Into<String>, data_type: VariantType) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: LocalizedText::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallMethodRequest {
    pub object_id: NodeId,
    pub method_id: NodeId,
    pub input_arguments: Vec<Variant>,
}

impl CallMethodRequest {
    pub fn new(object_id: NodeId, method_id: NodeId, input_arguments: Vec<Variant>) -> Self {
        Self {
            object_id,
            method_id,
            input_arguments,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallMethodResult {
    pub status: StatusCode,
    pub input_argument_results: Vec<StatusCode>,
    pub output_arguments: Vec<Variant>,
}

impl CallMethodResult {
    /// A failed call with empty argument-status and output arrays.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Acknowledgement token for UnregisterNodes; carries no data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack;

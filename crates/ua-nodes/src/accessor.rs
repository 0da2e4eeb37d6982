//! Per-node attribute access.
//!
//! [`AttributeAccessor`] is the capability a node exposes for reading and
//! writing one attribute at a time. Implementations may perform I/O (a live
//! device read, a query against a historian), so both operations are async.
//! [`StandardAttributes`] serves attributes from the node's own in-memory data.

use async_trait::async_trait;
use tracing::trace;
use ua_types::{
    access_level, AttributeId, DataValue, DateTime, NumericRange, QualifiedName, StatusCode,
    TimestampsToReturn, UaError, Variant, DEFAULT_BINARY_ENCODING,
};

use crate::context::AttributeContext;
use crate::node::{Node, NodeBody};

#[async_trait]
pub trait AttributeAccessor: Send + Sync {
    /// Read one attribute of `node`.
    ///
    /// Failures are reported in the returned value's status; this never fails
    /// as a call.
    async fn read_attribute(
        &self,
        node: &Node,
        ctx: &AttributeContext,
        attribute_id: AttributeId,
        timestamps: TimestampsToReturn,
        index_range: Option<&NumericRange>,
        data_encoding: Option<&QualifiedName>,
    ) -> DataValue;

    /// Write one attribute of `node`.
    async fn write_attribute(
        &self,
        node: &Node,
        ctx: &AttributeContext,
        attribute_id: AttributeId,
        value: &DataValue,
        index_range: Option<&NumericRange>,
    ) -> Result<(), UaError>;
}

/// Accessor that serves the standard attributes from the node itself.
///
/// Only the Value attribute of a Variable whose access level allows writes
/// can be written.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardAttributes;

impl StandardAttributes {
    fn attribute_value(node: &Node, attribute_id: AttributeId) -> Result<Variant, StatusCode> {
        let invalid = Err(StatusCode::BAD_ATTRIBUTE_ID_INVALID);
        let value = match (attribute_id, node.body()) {
            (AttributeId::NodeId, _) => Variant::NodeId(node.node_id().clone()),
            (AttributeId::NodeClass, _) => Variant::Int32(node.node_class().mask() as i32),
            (AttributeId::BrowseName, _) => Variant::String(node.browse_name().to_string()),
            (AttributeId::DisplayName, _) => Variant::String(node.display_name().text.clone()),
            (AttributeId::Description, _) => match node.description() {
                Some(d) => Variant::String(d.text.clone()),
                None => return invalid,
            },
            (
                AttributeId::IsAbstract,
                NodeBody::ObjectType { is_abstract }
                | NodeBody::VariableType { is_abstract }
                | NodeBody::ReferenceType { is_abstract, .. }
                | NodeBody::DataType { is_abstract },
            ) => Variant::Boolean(*is_abstract),
            (AttributeId::DataType, NodeBody::Variable(v)) => Variant::NodeId(v.data_type.clone()),
            (AttributeId::AccessLevel, NodeBody::Variable(v)) => {
                Variant::UInt32(u32::from(v.access_level))
            }
            (AttributeId::Historizing, NodeBody::Variable(v)) => Variant::Boolean(v.historizing),
            (AttributeId::Executable, NodeBody::Method(m)) => Variant::Boolean(m.executable),
            _ => return invalid,
        };
        Ok(value)
    }

    fn read_value(
        node: &Node,
        timestamps: TimestampsToReturn,
        index_range: Option<&NumericRange>,
        data_encoding: Option<&QualifiedName>,
    ) -> Result<DataValue, StatusCode> {
        let variable = node
            .as_variable()
            .ok_or(StatusCode::BAD_ATTRIBUTE_ID_INVALID)?;
        if variable.access_level & access_level::CURRENT_READ == 0 {
            return Err(StatusCode::BAD_NOT_READABLE);
        }
        if let Some(encoding) = data_encoding {
            if encoding.name != DEFAULT_BINARY_ENCODING {
                return Err(StatusCode::BAD_DATA_ENCODING_UNSUPPORTED);
            }
        }

        let mut value = variable.value();
        if let Some(range) = index_range {
            value.value = range.read(&value.value)?;
        }
        Ok(value.with_timestamps(timestamps))
    }
}

#[async_trait]
impl AttributeAccessor for StandardAttributes {
    async fn read_attribute(
        &self,
        node: &Node,
        _ctx: &AttributeContext,
        attribute_id: AttributeId,
        timestamps: TimestampsToReturn,
        index_range: Option<&NumericRange>,
        data_encoding: Option<&QualifiedName>,
    ) -> DataValue {
        if attribute_id == AttributeId::Value {
            return Self::read_value(node, timestamps, index_range, data_encoding)
                .unwrap_or_else(DataValue::from_status);
        }
        if data_encoding.is_some() {
            return DataValue::from_status(StatusCode::BAD_DATA_ENCODING_INVALID);
        }

        let result = Self::attribute_value(node, attribute_id).and_then(|v| match index_range {
            Some(range) => range.read(&v),
            None => Ok(v),
        });
        match result {
            Ok(v) => DataValue::value_only(v),
            Err(status) => DataValue::from_status(status),
        }
    }

    async fn write_attribute(
        &self,
        node: &Node,
        _ctx: &AttributeContext,
        attribute_id: AttributeId,
        value: &DataValue,
        index_range: Option<&NumericRange>,
    ) -> Result<(), UaError> {
        let variable = match (attribute_id, node.as_variable()) {
            (AttributeId::Value, Some(v)) if v.is_writable() => v,
            (AttributeId::Value, Some(_)) => {
                return Err(UaError::with_message(
                    StatusCode::BAD_NOT_WRITABLE,
                    "access level does not permit writes",
                ))
            }
            _ => return Err(UaError::new(StatusCode::BAD_NOT_WRITABLE)),
        };

        let current = variable.value();
        let new_value = match index_range {
            Some(range) => range.write(&current.value, &value.value)?,
            None => {
                let expected = current.value.variant_type();
                if expected.is_some() && value.value.variant_type() != expected {
                    return Err(UaError::new(StatusCode::BAD_TYPE_MISMATCH));
                }
                value.value.clone()
            }
        };

        let now = DateTime::now();
        variable.set_value(DataValue {
            value: new_value,
            status: value.status,
            source_timestamp: value.source_timestamp.or(Some(now)),
            server_timestamp: Some(now),
        });
        trace!(node = %node.node_id(), "value attribute replaced");
        Ok(())
    }
}

//! Node types.
//!
//! A [`Node`] is an entity keyed by [`NodeId`] with a class-specific
//! [`NodeBody`]. Nodes carry no pointers to other nodes; structure lives in
//! the store's reference index. Each node holds the [`AttributeAccessor`] that
//! serves its attributes and the [`NodeContext`] it was built with.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use ua_types::{
    access_level, Argument, AttributeId, DataValue, LocalizedText, NodeClass, NodeId,
    NumericRange, QualifiedName, StatusCode, TimestampsToReturn, UaError,
};

use crate::accessor::{AttributeAccessor, StandardAttributes};
use crate::context::{AttributeContext, NodeContext};
use crate::method::MethodInvocationHandler;

/// Attributes specific to a Variable node.
pub struct VariableData {
    pub data_type: NodeId,
    pub access_level: u8,
    /// Historical samples are being collected for this variable.
    pub historizing: bool,
    value: RwLock<DataValue>,
}

impl VariableData {
    pub fn new(value: DataValue) -> Self {
        Self {
            data_type: NodeId::NULL,
            access_level: access_level::CURRENT_READ,
            historizing: false,
            value: RwLock::new(value),
        }
    }

    /// Snapshot of the current value.
    pub fn value(&self) -> DataValue {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_value(&self, value: DataValue) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub fn is_writable(&self) -> bool {
        self.access_level & access_level::CURRENT_WRITE != 0
    }
}

/// Attributes specific to a Method node.
#[derive(Default)]
pub struct MethodData {
    pub executable: bool,
    pub input_arguments: Vec<Argument>,
    pub output_arguments: Vec<Argument>,
    pub handler: Option<Arc<dyn MethodInvocationHandler>>,
}

/// Class-specific node data.
pub enum NodeBody {
    Object { event_notifier: u8 },
    Variable(VariableData),
    Method(MethodData),
    ObjectType { is_abstract: bool },
    VariableType { is_abstract: bool },
    ReferenceType { is_abstract: bool, symmetric: bool },
    DataType { is_abstract: bool },
    View { contains_no_loops: bool },
}

impl NodeBody {
    pub fn node_class(&self) -> NodeClass {
        match self {
            Self::Object { .. } => NodeClass::Object,
            Self::Variable(_) => NodeClass::Variable,
            Self::Method(_) => NodeClass::Method,
            Self::ObjectType { .. } => NodeClass::ObjectType,
            Self::VariableType { .. } => NodeClass::VariableType,
            Self::ReferenceType { .. } => NodeClass::ReferenceType,
            Self::DataType { .. } => NodeClass::DataType,
            Self::View { .. } => NodeClass::View,
        }
    }
}

pub struct Node {
    node_id: NodeId,
    browse_name: QualifiedName,
    display_name: LocalizedText,
    description: Option<LocalizedText>,
    body: NodeBody,
    accessor: Arc<dyn AttributeAccessor>,
    context: Arc<dyn NodeContext>,
}

impl Node {
    /// Build a node served by [`StandardAttributes`]. The display name
    /// defaults to the browse name's text.
    pub fn new(
        context: Arc<dyn NodeContext>,
        node_id: NodeId,
        browse_name: QualifiedName,
        body: NodeBody,
    ) -> Self {
        let display_name = LocalizedText::new(browse_name.name.clone());
        Self {
            node_id,
            browse_name,
            display_name,
            description: None,
            body,
            accessor: Arc::new(StandardAttributes),
            context,
        }
    }

    pub fn object(context: Arc<dyn NodeContext>, node_id: NodeId, name: QualifiedName) -> Self {
        Self::new(context, node_id, name, NodeBody::Object { event_notifier: 0 })
    }

    pub fn object_type(
        context: Arc<dyn NodeContext>,
        node_id: NodeId,
        name: QualifiedName,
        is_abstract: bool,
    ) -> Self {
        Self::new(context, node_id, name, NodeBody::ObjectType { is_abstract })
    }

    pub fn variable(
        context: Arc<dyn NodeContext>,
        node_id: NodeId,
        name: QualifiedName,
        data: VariableData,
    ) -> Self {
        Self::new(context, node_id, name, NodeBody::Variable(data))
    }

    pub fn method(
        context: Arc<dyn NodeContext>,
        node_id: NodeId,
        name: QualifiedName,
        data: MethodData,
    ) -> Self {
        Self::new(context, node_id, name, NodeBody::Method(data))
    }

    pub fn with_display_name(mut self, display_name: LocalizedText) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = Some(description);
        self
    }

    /// Replace the accessor that serves this node's attributes.
    pub fn with_accessor(mut self, accessor: Arc<dyn AttributeAccessor>) -> Self {
        self.accessor = accessor;
        self
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn node_class(&self) -> NodeClass {
        self.body.node_class()
    }

    pub fn browse_name(&self) -> &QualifiedName {
        &self.browse_name
    }

    pub fn display_name(&self) -> &LocalizedText {
        &self.display_name
    }

    pub fn description(&self) -> Option<&LocalizedText> {
        self.description.as_ref()
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn context(&self) -> &Arc<dyn NodeContext> {
        &self.context
    }

    pub fn as_variable(&self) -> Option<&VariableData> {
        match &self.body {
            NodeBody::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodData> {
        match &self.body {
            NodeBody::Method(m) => Some(m),
            _ => None,
        }
    }

    /// `true` for a Variable whose historizing flag is set.
    pub fn is_historizing(&self) -> bool {
        self.as_variable().is_some_and(|v| v.historizing)
    }

    /// The handler bound to this Method node.
    ///
    /// Fails with `Bad_NotExecutable` when the method is disabled and with
    /// `Bad_MethodInvalid` when this is not a method or has no handler.
    pub fn invocation_handler(&self) -> Result<Arc<dyn MethodInvocationHandler>, UaError> {
        let method = self
            .as_method()
            .ok_or_else(|| UaError::new(StatusCode::BAD_METHOD_INVALID))?;
        if !method.executable {
            return Err(UaError::new(StatusCode::BAD_NOT_EXECUTABLE));
        }
        method
            .handler
            .clone()
            .ok_or_else(|| {
                UaError::with_message(StatusCode::BAD_METHOD_INVALID, "no handler bound")
            })
    }

    /// Read one attribute through this node's accessor.
    pub async fn read_attribute(
        &self,
        ctx: &AttributeContext,
        attribute_id: AttributeId,
        timestamps: TimestampsToReturn,
        index_range: Option<&NumericRange>,
        data_encoding: Option<&QualifiedName>,
    ) -> DataValue {
        self.accessor
            .read_attribute(self, ctx, attribute_id, timestamps, index_range, data_encoding)
            .await
    }

    /// Write one attribute through this node's accessor.
    pub async fn write_attribute(
        &self,
        ctx: &AttributeContext,
        attribute_id: AttributeId,
        value: &DataValue,
        index_range: Option<&NumericRange>,
    ) -> Result<(), UaError> {
        self.accessor
            .write_attribute(self, ctx, attribute_id, value, index_range)
            .await
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("node_id", &self.node_id)
            .field("node_class", &self.node_class())
            .field("browse_name", &self.browse_name)
            .finish()
    }
}

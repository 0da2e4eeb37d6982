//! Node classes, attribute identifiers, and naming types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// The class of a node in the address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Object,
    Variable,
    Method,
    ObjectType,
    VariableType,
    ReferenceType,
    DataType,
    View,
}

impl NodeClass {
    /// Protocol mask value of this class.
    pub fn mask(&self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
            Self::ObjectType => 8,
            Self::VariableType => 16,
            Self::ReferenceType => 32,
            Self::DataType => 64,
            Self::View => 128,
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identifies which facet of a node an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass = 2,
    BrowseName = 3,
    DisplayName = 4,
    Description = 5,
    IsAbstract = 8,
    Value = 13,
    DataType = 14,
    AccessLevel = 17,
    Historizing = 20,
    Executable = 21,
}

impl AttributeId {
    pub fn id(&self) -> u32 {
        *self as u32
    }
}

impl TryFrom<u32> for AttributeId {
    type Error = TypeError;

    fn try_from(value: u32) -> TypeResult<Self> {
        Ok(match value {
            1 => Self::NodeId,
            2 => Self::NodeClass,
            3 => Self::BrowseName,
            4 => Self::DisplayName,
            5 => Self::Description,
            8 => Self::IsAbstract,
            13 => Self::Value,
            14 => Self::DataType,
            17 => Self::AccessLevel,
            20 => Self::Historizing,
            21 => Self::Executable,
            other => return Err(TypeError::UnknownAttribute(other)),
        })
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A name qualified by a namespace index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: u16, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Human-readable text with an optional locale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: String,
}

impl LocalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Which timestamps a Read or HistoryRead should return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampsToReturn {
    Source,
    Server,
    #[default]
    Both,
    Neither,
}

/// Bits of the AccessLevel attribute.
pub mod access_level {
    pub const CURRENT_READ: u8 = 0x01;
    pub const CURRENT_WRITE: u8 = 0x02;
    pub const HISTORY_READ: u8 = 0x04;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_id_roundtrip() {
        for attr in [
            AttributeId::NodeId,
            AttributeId::Value,
            AttributeId::Historizing,
            AttributeId::Executable,
        ] {
            assert_eq!(AttributeId::try_from(attr.id()).unwrap(), attr);
        }
    }

    #[test]
    fn unknown_attribute_rejected() {
        assert_eq!(
            AttributeId::try_from(999),
            Err(TypeError::UnknownAttribute(999))
        );
    }

    #[test]
    fn node_class_masks_are_distinct_bits() {
        let all = [
            NodeClass::Object,
            NodeClass::Variable,
            NodeClass::Method,
            NodeClass::ObjectType,
            NodeClass::VariableType,
            NodeClass::ReferenceType,
            NodeClass::DataType,
            NodeClass::View,
        ];
        let combined = all.iter().fold(0u32, |acc, c| {
            assert_eq!(acc & c.mask(), 0);
            acc | c.mask()
        });
        assert_eq!(combined, 0xFF);
    }

    #[test]
    fn qualified_name_display() {
        assert_eq!(QualifiedName::new(2, "Temperature").to_string(), "2:Temperature");
    }
}

//! The [`Variant`] value union.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::node_id::NodeId;
use crate::status::StatusCode;
use crate::time::DateTime;

/// A value payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Empty,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    Double(f64),
    String(String),
    DateTime(DateTime),
    NodeId(NodeId),
    StatusCode(StatusCode),
    ByteString(Bytes),
    Array(Vec<Variant>),
}

/// The scalar type of a [`Variant`], used to declare method arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantType {
    Boolean,
    Int32,
    Int64,
    UInt32,
    Double,
    String,
    DateTime,
    NodeId,
    StatusCode,
    ByteString,
    Array,
}

impl Variant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn variant_type(&self) -> Option<VariantType> {
        Some(match self {
            Self::Empty => return None,
            Self::Boolean(_) => VariantType::Boolean,
            Self::Int32(_) => VariantType::Int32,
            Self::Int64(_) => VariantType::Int64,
            Self::UInt32(_) => VariantType::UInt32,
            Self::Double(_) => VariantType::Double,
            Self::String(_) => VariantType::String,
            Self::DateTime(_) => VariantType::DateTime,
            Self::NodeId(_) => VariantType::NodeId,
            Self::StatusCode(_) => VariantType::StatusCode,
            Self::ByteString(_) => VariantType::ByteString,
            Self::Array(_) => VariantType::Array,
        })
    }

    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int32(v) => Some(f64::from(*v)),
            Self::UInt32(v) => Some(f64::from(*v)),
            Self::Int64(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("<empty>"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::DateTime(v) => write!(f, "{v}"),
            Self::NodeId(v) => write!(f, "{v}"),
            Self::StatusCode(v) => write!(f, "{v}"),
            Self::ByteString(v) => write!(f, "0x{}", hex::encode(v)),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<u32> for Variant {
    fn from(v: u32) -> Self {
        Self::UInt32(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<NodeId> for Variant {
    fn from(v: NodeId) -> Self {
        Self::NodeId(v)
    }
}

impl From<DateTime> for Variant {
    fn from(v: DateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<StatusCode> for Variant {
    fn from(v: StatusCode) -> Self {
        Self::StatusCode(v)
    }
}

impl<T: Into<Variant>> From<Vec<T>> for Variant {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

//! Protocol value types for the address-space core.
//!
//! This crate holds the identity, status, value, and request/response types
//! shared by the node graph store and the service layer. It has no notion of
//! wire encoding; field names are semantic.
//!
//! # Key Types
//!
//! - [`NodeId`]: Value-compared identifier of a node
//! - [`StatusCode`]: Per-item operation outcome
//! - [`DataValue`]: Value + status + timestamps
//! - [`HistoryReadDetails`]: Closed set of historical query kinds
//! - [`UaError`]: Typed protocol failure carrying a status code

pub mod attribute;
pub mod data_value;
pub mod error;
pub mod history;
pub mod ids;
pub mod node_id;
pub mod range;
pub mod service;
pub mod status;
pub mod time;
pub mod variant;

pub use attribute::{
    access_level, AttributeId, LocalizedText, NodeClass, QualifiedName, TimestampsToReturn,
};
pub use data_value::DataValue;
pub use error::{TypeError, TypeResult, UaError};
pub use history::{
    HistoryData, HistoryReadDetails, HistoryReadResult, HistoryReadValueId, ReadAtTimeDetails,
    ReadEventDetails, ReadProcessedDetails, ReadRawModifiedDetails,
};
pub use node_id::{Identifier, NodeId};
pub use range::NumericRange;
pub use service::{
    Ack, Argument, CallMethodRequest, CallMethodResult, ReadValueId, ViewDescription, WriteValue,
    DEFAULT_BINARY_ENCODING,
};
pub use status::StatusCode;
pub use time::DateTime;
pub use variant::{Variant, VariantType};

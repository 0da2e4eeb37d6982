use thiserror::Error;

use crate::status::StatusCode;

/// Errors produced when parsing or converting protocol types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("invalid index range: {0}")]
    InvalidIndexRange(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("unknown attribute id: {0}")]
    UnknownAttribute(u32),
}

pub type TypeResult<T> = Result<T, TypeError>;

/// A typed protocol failure carrying the status code to report.
///
/// Attribute accessors and method handlers return this when an operation
/// fails for a reason the protocol can name. The service layer copies the
/// status code verbatim into the per-item result.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct UaError {
    status: StatusCode,
    message: Option<String>,
}

impl UaError {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<StatusCode> for UaError {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

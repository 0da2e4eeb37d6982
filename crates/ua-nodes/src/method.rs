//! Method invocation handlers.
//!
//! A handler is bound to a Method node and invoked by the Call service. It
//! reports failures in one of two ways: a typed [`UaError`] whose status code
//! becomes the call result, or an untyped error that the service treats as an
//! internal fault.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use ua_types::{
    Argument, CallMethodRequest, CallMethodResult, NodeId, StatusCode, UaError, Variant,
};
use uuid::Uuid;

use crate::node::Node;

#[derive(Debug, Error)]
pub enum MethodError {
    /// A failure the protocol can name; its status code is reported verbatim.
    #[error(transparent)]
    Status(#[from] UaError),

    /// Anything else. Reported to the caller as `Bad_InternalError`.
    #[error("unexpected failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl From<StatusCode> for MethodError {
    fn from(status: StatusCode) -> Self {
        Self::Status(UaError::new(status))
    }
}

/// Everything a handler learns about the call besides the request itself.
pub struct InvocationContext {
    pub session_id: Option<Uuid>,
    pub object_id: NodeId,
    /// The resolved Method node, including its declared arguments and its
    /// [`NodeContext`](crate::context::NodeContext).
    pub method: Arc<Node>,
}

#[async_trait]
pub trait MethodInvocationHandler: Send + Sync {
    async fn invoke(
        &self,
        ctx: &InvocationContext,
        request: &CallMethodRequest,
    ) -> Result<CallMethodResult, MethodError>;
}

type MethodFn =
    dyn Fn(&InvocationContext, &[Variant]) -> Result<Vec<Variant>, MethodError> + Send + Sync;

/// Handler built from a closure over the input arguments.
///
/// Inputs are checked against the method node's declared input arguments
/// before the closure runs.
pub struct FnMethodHandler {
    f: Box<MethodFn>,
}

impl FnMethodHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&InvocationContext, &[Variant]) -> Result<Vec<Variant>, MethodError>
            + Send
            + Sync
            + 'static,
    {
        Self { f: Box::new(f) }
    }

    pub fn into_handler(self) -> Arc<dyn MethodInvocationHandler> {
        Arc::new(self)
    }
}

/// Check `inputs` against `declared`.
///
/// Returns `Ok(())` when every argument matches, otherwise a failed
/// [`CallMethodResult`] with one status per supplied argument.
pub fn validate_arguments(
    declared: &[Argument],
    inputs: &[Variant],
) -> Result<(), CallMethodResult> {
    if inputs.len() < declared.len() {
        return Err(CallMethodResult::from_status(StatusCode::BAD_ARGUMENTS_MISSING));
    }
    if inputs.len() > declared.len() {
        return Err(CallMethodResult::from_status(StatusCode::BAD_TOO_MANY_ARGUMENTS));
    }

    let results: Vec<StatusCode> = declared
        .iter()
        .zip(inputs)
        .map(|(arg, input)| {
            if input.variant_type() == Some(arg.data_type) {
                StatusCode::GOOD
            } else {
                StatusCode::BAD_TYPE_MISMATCH
            }
        })
        .collect();

    if results.iter().all(StatusCode::is_good) {
        Ok(())
    } else {
        Err(CallMethodResult {
            status: StatusCode::BAD_INVALID_ARGUMENT,
            input_argument_results: results,
            output_arguments: Vec::new(),
        })
    }
}

#[async_trait]
impl MethodInvocationHandler for FnMethodHandler {
    async fn invoke(
        &self,
        ctx: &InvocationContext,
        request: &CallMethodRequest,
    ) -> Result<CallMethodResult, MethodError> {
        let declared = ctx
            .method
            .as_method()
            .map(|m| m.input_arguments.as_slice())
            .unwrap_or_default();
        if let Err(rejected) = validate_arguments(declared, &request.input_arguments) {
            return Ok(rejected);
        }

        let outputs = (self.f)(ctx, &request.input_arguments)?;
        Ok(CallMethodResult {
            status: StatusCode::GOOD,
            input_argument_results: vec![StatusCode::GOOD; request.input_arguments.len()],
            output_arguments: outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DetachedContext;
    use crate::node::MethodData;
    use ua_types::{QualifiedName, VariantType};

    fn add_method() -> Arc<Node> {
        Arc::new(Node::method(
            Arc::new(DetachedContext),
            NodeId::numeric(1, 100),
            QualifiedName::new(1, "Add"),
            MethodData {
                executable: true,
                input_arguments: vec![
                    Argument::new("a", VariantType::Int32),
                    Argument::new("b", VariantType::Int32),
                ],
                output_arguments: vec![Argument::new("sum", VariantType::Int32)],
                handler: None,
            },
        ))
    }

    fn ctx() -> InvocationContext {
        InvocationContext {
            session_id: None,
            object_id: NodeId::numeric(1, 1),
            method: add_method(),
        }
    }

    fn adder() -> FnMethodHandler {
        FnMethodHandler::new(|_, args| match args {
            [Variant::Int32(a), Variant::Int32(b)] => a
                .checked_add(*b)
                .map(|s| vec![Variant::Int32(s)])
                .ok_or_else(|| StatusCode::BAD_OUT_OF_RANGE.into()),
            _ => Err(StatusCode::BAD_INVALID_ARGUMENT.into()),
        })
    }

    fn request(args: Vec<Variant>) -> CallMethodRequest {
        CallMethodRequest::new(NodeId::numeric(1, 1), NodeId::numeric(1, 100), args)
    }

    #[tokio::test]
    async fn valid_call_returns_outputs() {
        let result = adder()
            .invoke(&ctx(), &request(vec![Variant::Int32(2), Variant::Int32(3)]))
            .await
            .unwrap();
        assert_eq!(result.status, StatusCode::GOOD);
        assert_eq!(result.output_arguments, vec![Variant::Int32(5)]);
        assert_eq!(result.input_argument_results.len(), 2);
    }

    #[tokio::test]
    async fn missing_and_extra_arguments() {
        let missing = adder().invoke(&ctx(), &request(vec![Variant::Int32(2)])).await.unwrap();
        assert_eq!(missing.status, StatusCode::BAD_ARGUMENTS_MISSING);

        let extra = adder()
            .invoke(&ctx(), &request(vec![Variant::Int32(1), Variant::Int32(2), Variant::Int32(3)]))
            .await
            .unwrap();
        assert_eq!(extra.status, StatusCode::BAD_TOO_MANY_ARGUMENTS);
    }

    #[tokio::test]
    async fn type_mismatch_flags_position() {
        let result = adder()
            .invoke(&ctx(), &request(vec![Variant::Int32(2), Variant::from("three")]))
            .await
            .unwrap();
        assert_eq!(result.status, StatusCode::BAD_INVALID_ARGUMENT);
        assert_eq!(
            result.input_argument_results,
            vec![StatusCode::GOOD, StatusCode::BAD_TYPE_MISMATCH]
        );
    }

    #[tokio::test]
    async fn closure_error_is_typed() {
        let err = adder()
            .invoke(&ctx(), &request(vec![Variant::Int32(i32::MAX), Variant::Int32(1)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MethodError::Status(ref e) if e.status_code() == StatusCode::BAD_OUT_OF_RANGE
        ));
    }

    #[test]
    fn anyhow_errors_are_unexpected() {
        let err: MethodError = anyhow::anyhow!("device offline").into();
        assert!(matches!(err, MethodError::Unexpected(_)));
    }
}

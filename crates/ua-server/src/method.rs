//! Method invocation resolver.
//!
//! Resolves the handler for an (object, method) pair by walking the node
//! graph, then invokes it with every failure mode folded into the returned
//! [`CallMethodResult`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error};
use ua_nodes::{InvocationContext, MethodError, MethodInvocationHandler, Node, NodeManager};
use ua_types::{CallMethodRequest, CallMethodResult, NodeClass, NodeId, StatusCode, UaError};
use uuid::Uuid;

/// Find the Method node `method_id` on `object_id` and its bound handler.
///
/// - `Bad_NodeIdUnknown` if the object is absent.
/// - `Bad_MethodInvalid` if the object is not an Object or ObjectType, or
///   has no such method component.
/// - Whatever the method node reports when it cannot be invoked.
pub fn get_invocation_handler(
    nodes: &dyn NodeManager,
    object_id: &NodeId,
    method_id: &NodeId,
) -> Result<(Arc<Node>, Arc<dyn MethodInvocationHandler>), UaError> {
    let object = nodes
        .get_node(object_id)
        .ok_or_else(|| UaError::new(StatusCode::BAD_NODE_ID_UNKNOWN))?;

    match object.node_class() {
        NodeClass::Object | NodeClass::ObjectType => {}
        other => {
            return Err(UaError::with_message(
                StatusCode::BAD_METHOD_INVALID,
                format!("{object_id} is a {other}, not an object"),
            ))
        }
    }

    let method = nodes
        .find_method_node(object_id, method_id)
        .ok_or_else(|| UaError::new(StatusCode::BAD_METHOD_INVALID))?;
    let handler = method.invocation_handler()?;
    Ok((method, handler))
}

/// Resolve and invoke one request. Never fails: resolution errors, typed
/// handler errors, untyped handler errors, and panics all become a result
/// status.
pub async fn call_method(
    nodes: &dyn NodeManager,
    session_id: Option<Uuid>,
    request: &CallMethodRequest,
) -> CallMethodResult {
    let (method, handler) =
        match get_invocation_handler(nodes, &request.object_id, &request.method_id) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!(
                    object = %request.object_id,
                    method = %request.method_id,
                    error = %e,
                    "method not resolved"
                );
                return CallMethodResult::from_status(e.status_code());
            }
        };

    let ctx = InvocationContext {
        session_id,
        object_id: request.object_id.clone(),
        method,
    };

    match AssertUnwindSafe(handler.invoke(&ctx, request))
        .catch_unwind()
        .await
    {
        Ok(Ok(result)) => {
            debug!(method = %request.method_id, status = %result.status, "method invoked");
            result
        }
        Ok(Err(MethodError::Status(e))) => {
            debug!(method = %request.method_id, error = %e, "method failed");
            CallMethodResult::from_status(e.status_code())
        }
        Ok(Err(MethodError::Unexpected(e))) => {
            error!(method = %request.method_id, error = %e, "method handler faulted");
            CallMethodResult::from_status(StatusCode::BAD_INTERNAL_ERROR)
        }
        Err(panic) => {
            error!(
                method = %request.method_id,
                panic = panic_message(panic.as_ref()),
                "method handler panicked"
            );
            CallMethodResult::from_status(StatusCode::BAD_INTERNAL_ERROR)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

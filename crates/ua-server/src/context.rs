//! Completion sink for service calls.
//!
//! Every service operation receives a [`ServiceContext`] and signals it
//! exactly once: [`success`](ServiceContext::success) with the full result
//! list, or [`failure`](ServiceContext::failure) with a single status code.
//! Both consume the context, so a second signal does not type-check.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;
use ua_nodes::AttributeContext;
use ua_types::StatusCode;
use uuid::Uuid;

pub type ServiceOutcome<T> = Result<T, StatusCode>;

pub struct ServiceContext<T> {
    session_id: Option<Uuid>,
    sender: oneshot::Sender<ServiceOutcome<T>>,
}

impl<T> ServiceContext<T> {
    /// A context for `session_id` and the completion the caller awaits.
    pub fn new(session_id: Option<Uuid>) -> (Self, Completion<T>) {
        let (sender, receiver) = oneshot::channel();
        (Self { session_id, sender }, Completion { receiver })
    }

    /// A context for a call made by the server itself.
    pub fn internal() -> (Self, Completion<T>) {
        Self::new(None)
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn attribute_context(&self) -> AttributeContext {
        AttributeContext {
            session_id: self.session_id,
        }
    }

    pub fn success(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn failure(self, status: StatusCode) {
        self.complete(Err(status));
    }

    pub fn complete(self, outcome: ServiceOutcome<T>) {
        if self.sender.send(outcome).is_err() {
            debug!(session = ?self.session_id, "caller stopped waiting for service result");
        }
    }
}

/// The awaiting half of a [`ServiceContext`].
///
/// Resolves to `Bad_InternalError` if the context is dropped unsignaled.
pub struct Completion<T> {
    receiver: oneshot::Receiver<ServiceOutcome<T>>,
}

impl<T> Future for Completion<T> {
    type Output = ServiceOutcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(StatusCode::BAD_INTERNAL_ERROR)))
    }
}

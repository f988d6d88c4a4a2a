//! Error types for registration and dispatch.

use thiserror::Error;

/// Errors surfaced by the event system.
///
/// Only [`EventError::AbstractEventType`] ever reaches a registration caller;
/// the dispatch-time variants are caught at the point of handler invocation,
/// logged with context, and never propagated to the caller of
/// [`EventSystem::dispatch`](crate::EventSystem::dispatch).
#[derive(Debug, Error)]
pub enum EventError {
    /// Registration targeted an abstract event type, which cannot own handlers.
    #[error("event type `{0}` is abstract and cannot own handlers")]
    AbstractEventType(&'static str),
    /// Handler execution failed during event processing.
    #[error("handler execution error: {0}")]
    HandlerExecution(String),
    /// An executor asked an event for a capability view it does not carry.
    #[error("event `{event}` does not expose capability `{capability}`")]
    IncompatibleCapability {
        /// Concrete type of the dispatched event.
        event: &'static str,
        /// Capability the executor was bound to at registration.
        capability: &'static str,
    },
}

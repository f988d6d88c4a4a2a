//! Handler invocation targets.
//!
//! Every registration path produces an [`EventExecutor`]: a type-erased
//! callable taking one mutable event argument. [`CapabilityExecutor`] is the
//! typed adapter used by [`EventSystem::on`](crate::EventSystem::on) and
//! [`Subscription::new`](crate::Subscription::new); [`FnExecutor`] wraps a raw
//! closure over `&mut dyn Event` for callers that route on descriptors
//! directly (e.g. events decoded at the network boundary).

use crate::error::EventError;
use crate::events::{Event, EventKind};
use std::marker::PhantomData;

/// A type-erased handler invocation target.
pub trait EventExecutor: Send + Sync {
    /// Invokes the handler with the dispatched event.
    fn execute(&self, event: &mut dyn Event) -> Result<(), EventError>;

    /// Name used in diagnostics.
    fn name(&self) -> &str;
}

/// Wraps a closure over the type-erased event as an executor.
pub struct FnExecutor<F> {
    name: String,
    handler: F,
}

impl<F> FnExecutor<F>
where
    F: Fn(&mut dyn Event) -> Result<(), EventError> + Send + Sync,
{
    /// Creates a named executor from a raw handler closure.
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> EventExecutor for FnExecutor<F>
where
    F: Fn(&mut dyn Event) -> Result<(), EventError> + Send + Sync,
{
    fn execute(&self, event: &mut dyn Event) -> Result<(), EventError> {
        (self.handler)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Adapts a typed handler `Fn(&mut T)` into a type-erased executor.
///
/// At dispatch time the executor asks the event for the capability view of
/// `T`'s descriptor. For a dispatch of `T` itself that is a plain downcast;
/// for a dispatch of a descendant type it is the embedded parent payload. An
/// event that exposes no such view fails this single invocation with
/// [`EventError::IncompatibleCapability`], which the dispatcher logs and
/// isolates.
pub struct CapabilityExecutor<T, F> {
    name: String,
    handler: F,
    _payload: PhantomData<fn(&mut T)>,
}

impl<T, F> CapabilityExecutor<T, F>
where
    T: EventKind,
    F: Fn(&mut T) -> Result<(), EventError> + Send + Sync,
{
    /// Creates an executor bound to payload type `T`.
    pub fn new(handler: F) -> Self {
        Self {
            name: format!("{}::handler", T::descriptor().name()),
            handler,
            _payload: PhantomData,
        }
    }
}

impl<T, F> EventExecutor for CapabilityExecutor<T, F>
where
    T: EventKind,
    F: Fn(&mut T) -> Result<(), EventError> + Send + Sync,
{
    fn execute(&self, event: &mut dyn Event) -> Result<(), EventError> {
        let event_name = event.event_type().name();
        let payload = event
            .capability_mut(T::descriptor())
            .and_then(|view| view.downcast_mut::<T>())
            .ok_or(EventError::IncompatibleCapability {
                event: event_name,
                capability: T::descriptor().name(),
            })?;
        (self.handler)(payload)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

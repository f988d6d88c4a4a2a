//! Core event traits.
//!
//! An event is a plain value dispatched synchronously to every handler
//! resolved for its concrete type. Handlers mutate the event in place; the
//! event value itself carries whatever cancellation or mutation flags its
//! payload defines. The core is agnostic to payload semantics.
//!
//! Source ecosystems express "a handler on an ancestor type sees descendant
//! instances" through subtyping. Here that is explicit composition: a
//! descendant payload embeds its parent-level payload as a field and forwards
//! [`Event::capability_mut`] lookups upward, so an executor bound to the
//! ancestor type receives a `&mut` view of the embedded parent payload. The
//! [`impl_event!`](crate::impl_event) macro generates both shapes.

use crate::hierarchy::EventType;
use std::any::Any;
use std::fmt;

/// Implemented by every dispatchable event value.
pub trait Event: Any + Send + Sync + fmt::Debug {
    /// The static descriptor of this value's concrete type.
    fn event_type(&self) -> &'static EventType;

    /// Upcast for immutable downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for mutable downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the mutable payload view for `ty`, which must be this event's
    /// own type or an ancestor whose payload this event embeds. Returns `None`
    /// when the event carries no such capability.
    fn capability_mut(&mut self, ty: &'static EventType) -> Option<&mut dyn Any> {
        if ty == self.event_type() {
            Some(self.as_any_mut())
        } else {
            None
        }
    }
}

/// Binds an event payload struct to its static descriptor.
///
/// Implemented for concrete event types only; abstract hierarchy nodes group
/// descendants and never appear as payload types in typed registration.
pub trait EventKind: Event + Sized {
    /// The descriptor this payload type dispatches as.
    fn descriptor() -> &'static EventType;
}

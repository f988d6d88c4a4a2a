//! Event dispatch.

use super::core::EventSystem;
use crate::events::Event;
use std::sync::atomic::Ordering;
use tracing::{error, warn};

impl EventSystem {
    /// Dispatches `event` to every handler resolved for its concrete type,
    /// in (priority, registration order), then returns the event with any
    /// mutations the handlers applied.
    ///
    /// Handler invocation is sequential and blocking on the caller's thread.
    /// A failing handler is logged and isolated; the remaining handlers still
    /// run and the call still returns the event, reflecting only the effects
    /// committed before each failure. Dispatching a type with no resolved
    /// handlers is a silent no-op.
    ///
    /// The handler order is snapshotted when the call starts: a handler that
    /// registers or removes handlers mid-dispatch affects the next dispatch,
    /// never the in-flight one.
    pub fn dispatch<E: Event>(&self, mut event: E) -> E {
        self.dispatch_dyn(&mut event);
        event
    }

    /// Type-erased dispatch for callers that do not know the concrete payload
    /// type statically (e.g. events built from decoded packets).
    pub fn dispatch_dyn(&self, event: &mut dyn Event) {
        let event_type = event.event_type();
        let bucket = match self.bucket(event_type) {
            Ok(bucket) => bucket,
            Err(err) => {
                // Only reachable through an Event impl whose descriptor is an
                // abstract node; dispatched values are concrete by construction.
                error!("❌ Cannot dispatch {}: {}", event_type, err);
                return;
            }
        };

        self.stats.events_dispatched.fetch_add(1, Ordering::Relaxed);

        // Immutable snapshot for this call.
        let handlers = bucket.resolve();
        for handler in handlers.iter() {
            if let Err(err) = handler.executor().execute(event) {
                self.stats.handler_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "❌ Handler `{}` failed for {}: {}",
                    handler.executor().name(),
                    event_type,
                    err
                );
            }
        }
    }
}

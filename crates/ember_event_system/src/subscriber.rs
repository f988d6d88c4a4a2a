//! Subscriber registration tables.
//!
//! A subscriber is one object that handles many event types. Instead of
//! runtime method discovery, a subscriber declares its handlers explicitly:
//! [`EventSubscriber::subscriptions`] returns the full registration table,
//! one [`Subscription`] per (event type, priority, callable). Handlers
//! registered through a table remember the subscriber's identity so
//! [`EventSystem::unregister_subscriber`](crate::EventSystem::unregister_subscriber)
//! can remove them wholesale.

use crate::error::EventError;
use crate::events::EventKind;
use crate::executor::{CapabilityExecutor, EventExecutor};
use crate::hierarchy::EventType;
use crate::types::EventPriority;
use std::sync::Arc;

/// One entry in a subscriber's registration table.
pub struct Subscription {
    /// The event type the handler attaches to.
    pub event_type: &'static EventType,
    /// Execution precedence.
    pub priority: EventPriority,
    /// The invocation target.
    pub executor: Arc<dyn EventExecutor>,
}

impl Subscription {
    /// Builds a typed subscription for payload type `T`.
    ///
    /// The closure typically captures a clone of the subscriber's `Arc` to
    /// reach its state.
    pub fn new<T, F>(priority: EventPriority, handler: F) -> Self
    where
        T: EventKind,
        F: Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        Self {
            event_type: T::descriptor(),
            priority,
            executor: Arc::new(CapabilityExecutor::new(handler)),
        }
    }

    /// Builds a subscription from a pre-built executor, for entries whose
    /// payload type is not statically known.
    pub fn erased(
        event_type: &'static EventType,
        priority: EventPriority,
        executor: Arc<dyn EventExecutor>,
    ) -> Self {
        Self {
            event_type,
            priority,
            executor,
        }
    }
}

/// An object that handles events across multiple event types.
///
/// # Examples
///
/// ```rust
/// use ember_event_system::*;
/// use std::sync::{Arc, Mutex};
///
/// static LOGIN_EVENT: EventType = EventType::concrete("login", &EVENT);
///
/// #[derive(Debug, Default)]
/// struct LoginEvent {
///     denied: bool,
/// }
/// impl_event!(LoginEvent, &LOGIN_EVENT);
///
/// struct LoginThrottle {
///     seen: Mutex<u32>,
/// }
///
/// impl EventSubscriber for LoginThrottle {
///     fn subscriptions(self: Arc<Self>) -> Vec<Subscription> {
///         let throttle = self.clone();
///         vec![Subscription::new(
///             EventPriority::Low,
///             move |event: &mut LoginEvent| {
///                 let mut seen = throttle.seen.lock().unwrap();
///                 *seen += 1;
///                 if *seen > 3 {
///                     event.denied = true;
///                 }
///                 Ok(())
///             },
///         )]
///     }
/// }
///
/// let events = create_event_system();
/// let throttle = Arc::new(LoginThrottle { seen: Mutex::new(0) });
/// assert!(events.register_subscriber(PluginId::new(), &throttle));
/// ```
pub trait EventSubscriber: Send + Sync + 'static {
    /// The registration table: every (event type, priority, callable) pair
    /// this subscriber cares about.
    fn subscriptions(self: Arc<Self>) -> Vec<Subscription>;
}

/// Identity of a subscriber object, recorded on every handler created from
/// its table. Identity is the `Arc` allocation address, so it survives for as
/// long as any clone of the subscriber does and never matches a different
/// object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

impl SubscriberId {
    pub(crate) fn of<S>(subscriber: &Arc<S>) -> Self {
        Self(Arc::as_ptr(subscriber) as usize)
    }
}

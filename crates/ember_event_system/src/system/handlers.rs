//! Handler registration methods.

use super::bucket::CapabilityHandler;
use super::core::EventSystem;
use super::lock;
use crate::error::EventError;
use crate::events::EventKind;
use crate::executor::{CapabilityExecutor, EventExecutor};
use crate::hierarchy::EventType;
use crate::subscriber::{EventSubscriber, SubscriberId};
use crate::types::{EventPriority, PluginId};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

impl EventSystem {
    /// Registers a typed handler for the concrete payload type `T`.
    ///
    /// The handler executes on every dispatch of `T` and of any descendant
    /// type that embeds `T`'s payload, interleaved with other handlers
    /// strictly by (priority, registration order).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ember_event_system::*;
    ///
    /// static BLOCK_BREAK_EVENT: EventType = EventType::concrete("block_break", &EVENT);
    ///
    /// #[derive(Debug)]
    /// struct BlockBreakEvent {
    ///     cancelled: bool,
    /// }
    /// impl_event!(BlockBreakEvent, &BLOCK_BREAK_EVENT);
    ///
    /// let events = create_event_system();
    /// events
    ///     .on(PluginId::new(), EventPriority::Normal, |event: &mut BlockBreakEvent| {
    ///         event.cancelled = true;
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// ```
    pub fn on<T, F>(
        &self,
        plugin: PluginId,
        priority: EventPriority,
        handler: F,
    ) -> Result<(), EventError>
    where
        T: EventKind,
        F: Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.register(
            plugin,
            T::descriptor(),
            priority,
            Arc::new(CapabilityExecutor::new(handler)),
        )
    }

    /// Registers a type-erased executor directly on `event_type`.
    ///
    /// Fails with [`EventError::AbstractEventType`] when `event_type` is
    /// abstract; abstract nodes group descendants and cannot own handlers.
    pub fn register(
        &self,
        plugin: PluginId,
        event_type: &'static EventType,
        priority: EventPriority,
        executor: Arc<dyn EventExecutor>,
    ) -> Result<(), EventError> {
        self.register_internal(plugin, event_type, priority, executor, None)
    }

    /// Registers every subscription declared in `subscriber`'s table.
    ///
    /// Entries that cannot be registered (an abstract target event type) are
    /// skipped with a diagnostic and do not fail the overall call; the
    /// remaining entries still register. Handlers created here carry the
    /// subscriber's identity so
    /// [`unregister_subscriber`](EventSystem::unregister_subscriber) can
    /// remove them later. Returns `true` once the table has been processed.
    pub fn register_subscriber<S>(&self, plugin: PluginId, subscriber: &Arc<S>) -> bool
    where
        S: EventSubscriber,
    {
        let subscriber_id = SubscriberId::of(subscriber);
        for subscription in subscriber.clone().subscriptions() {
            let name = subscription.executor.name().to_string();
            if let Err(err) = self.register_internal(
                plugin,
                subscription.event_type,
                subscription.priority,
                subscription.executor,
                Some(subscriber_id),
            ) {
                warn!("⚠️ Subscription `{}` skipped: {}", name, err);
            }
        }
        true
    }

    pub(super) fn register_internal(
        &self,
        plugin: PluginId,
        event_type: &'static EventType,
        priority: EventPriority,
        executor: Arc<dyn EventExecutor>,
        subscriber: Option<SubscriberId>,
    ) -> Result<(), EventError> {
        if event_type.is_abstract() {
            return Err(EventError::AbstractEventType(event_type.name()));
        }

        {
            let mut sequence = lock(&self.sequence);
            let bucket = self.ensure_bucket_chain(event_type);
            let handler = Arc::new(CapabilityHandler::new(
                plugin, *sequence, priority, executor, subscriber,
            ));
            *sequence += 1;
            bucket.add_handler(handler);
        }

        self.stats.total_handlers.fetch_add(1, Ordering::Relaxed);
        info!("📝 Registered handler for {} at {:?}", event_type, priority);
        Ok(())
    }
}

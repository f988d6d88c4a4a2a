//! Lifecycle management and introspection utilities.
//!
//! All three unregistration flavors are one primitive, [`remove_where`],
//! specialized by predicate. Each is idempotent: unregistering something that
//! was never registered removes nothing and is not a failure.
//!
//! [`remove_where`]: EventSystem::remove_where

use super::core::EventSystem;
use super::lock;
use super::CapabilityHandler;
use crate::executor::EventExecutor;
use crate::hierarchy::EventType;
use crate::subscriber::{EventSubscriber, SubscriberId};
use crate::types::PluginId;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

impl EventSystem {
    /// Removes every handler matching `predicate` from every bucket currently
    /// known to the registry. Returns the number removed.
    pub fn remove_where<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&CapabilityHandler) -> bool,
    {
        // Removal is a registry mutation like any other.
        let _mutation = lock(&self.sequence);
        let mut removed = 0;
        for entry in self.buckets.iter() {
            removed += entry.value().remove_handlers_if(&mut predicate);
        }
        drop(_mutation);

        if removed > 0 {
            self.stats.total_handlers.fetch_sub(removed, Ordering::Relaxed);
            info!("🗑️ Removed {} handlers", removed);
        }
        removed
    }

    /// Unregisters every handler whose invocation target is the given
    /// executor, compared by `Arc` identity (the same allocation passed to
    /// registration, not structural equality).
    pub fn unregister_executor(&self, executor: &Arc<dyn EventExecutor>) -> usize {
        self.remove_where(|handler| Arc::ptr_eq(handler.executor(), executor))
    }

    /// Unregisters every handler created from `subscriber`'s registration
    /// table. Handlers registered directly never match.
    pub fn unregister_subscriber<S>(&self, subscriber: &Arc<S>) -> usize
    where
        S: EventSubscriber,
    {
        let subscriber_id = SubscriberId::of(subscriber);
        self.remove_where(move |handler| handler.subscriber() == Some(subscriber_id))
    }

    /// Unregisters every handler owned by `plugin` across every event type.
    /// Called on plugin unload so no handler ever fires for an unloaded
    /// plugin; all other plugins' handlers keep their relative order.
    pub fn unregister_plugin(&self, plugin: PluginId) -> usize {
        self.remove_where(move |handler| handler.plugin() == plugin)
    }

    /// Whether any handler would fire for `event_type`, directly or through
    /// an ancestor. Always `false` for abstract types.
    pub fn has_handlers(&self, event_type: &'static EventType) -> bool {
        self.handler_count(event_type) > 0
    }

    /// The number of handlers in `event_type`'s resolved order, including
    /// those inherited from ancestor types. Zero for abstract types.
    pub fn handler_count(&self, event_type: &'static EventType) -> usize {
        match self.bucket(event_type) {
            Ok(bucket) => bucket.resolve().len(),
            Err(_) => 0,
        }
    }

    /// Every event type the registry currently holds a bucket for. Buckets
    /// are never destroyed, so this includes types whose handlers have all
    /// been unregistered.
    pub fn registered_types(&self) -> Vec<&'static EventType> {
        self.buckets.iter().map(|entry| entry.value().event_type()).collect()
    }
}

//! Per-event-type handler storage.

use super::lock;
use crate::executor::EventExecutor;
use crate::hierarchy::EventType;
use crate::subscriber::SubscriberId;
use crate::types::{EventPriority, PluginId};
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A registered subscription: one plugin's executor bound to one event type,
/// stamped with the priority and global sequence number that order it.
pub struct CapabilityHandler {
    plugin: PluginId,
    sequence: u64,
    priority: EventPriority,
    executor: Arc<dyn EventExecutor>,
    subscriber: Option<SubscriberId>,
}

impl CapabilityHandler {
    pub(super) fn new(
        plugin: PluginId,
        sequence: u64,
        priority: EventPriority,
        executor: Arc<dyn EventExecutor>,
        subscriber: Option<SubscriberId>,
    ) -> Self {
        Self {
            plugin,
            sequence,
            priority,
            executor,
            subscriber,
        }
    }

    /// The plugin that owns this handler.
    pub fn plugin(&self) -> PluginId {
        self.plugin
    }

    /// The registration sequence number, unique and strictly increasing
    /// across the whole registry lifetime.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Execution precedence.
    pub fn priority(&self) -> EventPriority {
        self.priority
    }

    /// The invocation target.
    pub fn executor(&self) -> &Arc<dyn EventExecutor> {
        &self.executor
    }

    pub(crate) fn subscriber(&self) -> Option<SubscriberId> {
        self.subscriber
    }

    fn sort_key(&self) -> (EventPriority, u64) {
        (self.priority, self.sequence)
    }
}

impl fmt::Debug for CapabilityHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityHandler")
            .field("plugin", &self.plugin)
            .field("sequence", &self.sequence)
            .field("priority", &self.priority)
            .field("executor", &self.executor.name())
            .finish()
    }
}

/// The cached resolved list plus the ancestor-chain generation it was built
/// against.
struct ResolvedCache {
    stamp: u64,
    handlers: Arc<[Arc<CapabilityHandler>]>,
}

/// Handler storage for one concrete event type.
///
/// Holds the handlers registered directly on the type, sorted by
/// (priority, sequence), a link to the nearest non-abstract ancestor's
/// bucket, and a lazily computed cache of the resolved order: the sorted
/// union of the direct lists of the whole ancestor chain.
///
/// Cache validity is generation-based. Every direct-list mutation bumps this
/// bucket's local generation; the cache records the sum of generations along
/// the ancestor chain at build time and is discarded whenever that sum
/// changes. A mutation of an ancestor therefore invalidates every
/// descendant's cache without any eager propagation: the next `resolve` on
/// the descendant sees a stale stamp and rebuilds.
pub(super) struct HandlerBucket {
    event_type: &'static EventType,
    parent: Option<Arc<HandlerBucket>>,
    generation: AtomicU64,
    direct: Mutex<SmallVec<[Arc<CapabilityHandler>; 4]>>,
    resolved: Mutex<Option<ResolvedCache>>,
}

impl HandlerBucket {
    pub(super) fn new(event_type: &'static EventType, parent: Option<Arc<HandlerBucket>>) -> Self {
        Self {
            event_type,
            parent,
            generation: AtomicU64::new(0),
            direct: Mutex::new(SmallVec::new()),
            resolved: Mutex::new(None),
        }
    }

    /// Inserts a handler into the direct list, preserving the
    /// (priority, sequence) sort order.
    pub(super) fn add_handler(&self, handler: Arc<CapabilityHandler>) {
        let mut direct = lock(&self.direct);
        let at = direct.partition_point(|existing| existing.sort_key() <= handler.sort_key());
        direct.insert(at, handler);
        drop(direct);
        self.invalidate();
    }

    /// Removes every direct handler matching `predicate`. Returns the number
    /// removed; the resolved cache is dropped only when that is non-zero.
    pub(super) fn remove_handlers_if(
        &self,
        predicate: &mut dyn FnMut(&CapabilityHandler) -> bool,
    ) -> usize {
        let mut direct = lock(&self.direct);
        let before = direct.len();
        direct.retain(|handler| !predicate(handler));
        let removed = before - direct.len();
        drop(direct);
        if removed > 0 {
            self.invalidate();
        }
        removed
    }

    fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::Release);
        *lock(&self.resolved) = None;
    }

    fn chain_generation(&self) -> u64 {
        let mut sum = self.generation.load(Ordering::Acquire);
        let mut current = self.parent.as_deref();
        while let Some(bucket) = current {
            sum = sum.wrapping_add(bucket.generation.load(Ordering::Acquire));
            current = bucket.parent.as_deref();
        }
        sum
    }

    /// Returns the resolved handler order for this event type: every handler
    /// on this bucket and its ancestor chain, sorted by (priority, sequence).
    ///
    /// The returned slice is an immutable snapshot; registrations or removals
    /// occurring while a dispatch iterates it are not visible to that
    /// in-flight dispatch.
    pub(super) fn resolve(&self) -> Arc<[Arc<CapabilityHandler>]> {
        let stamp = self.chain_generation();
        let mut cache = lock(&self.resolved);
        if let Some(cached) = cache.as_ref() {
            if cached.stamp == stamp {
                return cached.handlers.clone();
            }
        }

        // Rebuild from the direct lists of the whole ancestor chain.
        let mut merged: Vec<Arc<CapabilityHandler>> = lock(&self.direct).iter().cloned().collect();
        let mut current = self.parent.as_deref();
        while let Some(bucket) = current {
            merged.extend(lock(&bucket.direct).iter().cloned());
            current = bucket.parent.as_deref();
        }
        merged.sort_by_key(|handler| handler.sort_key());

        if !merged.is_empty() {
            debug!(
                "Rebuilt resolved handler list for {} ({} handlers)",
                self.event_type,
                merged.len()
            );
        }

        let handlers: Arc<[Arc<CapabilityHandler>]> = merged.into();
        *cache = Some(ResolvedCache {
            stamp,
            handlers: handlers.clone(),
        });
        handlers
    }

    pub(super) fn event_type(&self) -> &'static EventType {
        self.event_type
    }
}

impl fmt::Debug for HandlerBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBucket")
            .field("event_type", &self.event_type.name())
            .field("parent", &self.parent.as_ref().map(|b| b.event_type.name()))
            .field("direct", &lock(&self.direct).len())
            .finish()
    }
}

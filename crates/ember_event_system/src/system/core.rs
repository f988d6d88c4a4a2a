//! Core EventSystem implementation.

use super::bucket::HandlerBucket;
use super::lock;
use super::stats::{AtomicStats, EventSystemStats};
use crate::error::EventError;
use crate::hierarchy::EventType;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};

/// The event registry and dispatcher for one server runtime.
///
/// This is the central hub for all plugin event processing. It owns one
/// handler bucket per concrete event type seen so far, hands out resolved
/// handler snapshots to the dispatcher, and serializes every mutating
/// operation (bucket creation, registration, removal) behind one exclusive
/// section. Scope an instance to a server context with clear start/stop
/// boundaries rather than holding it in process-wide state.
pub struct EventSystem {
    /// Buckets for every event type seen so far, keyed by descriptor
    /// identity. Reads on the dispatch path go through this map without
    /// touching the mutation lock.
    pub(super) buckets: DashMap<&'static EventType, Arc<HandlerBucket>>,
    /// The global registration sequence counter. Its mutex doubles as the
    /// exclusive section for all registry mutation.
    pub(super) sequence: Mutex<u64>,
    /// Activity counters.
    pub(super) stats: AtomicStats,
}

impl EventSystem {
    /// Creates a new event system with no registered handlers.
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
            sequence: Mutex::new(0),
            stats: AtomicStats::default(),
        }
    }

    /// Gets the current event system statistics.
    pub fn stats(&self) -> EventSystemStats {
        self.stats.snapshot()
    }

    /// Returns the bucket for `event_type`, creating it (and any missing
    /// ancestor buckets) on first sight. Fails for abstract event types:
    /// dispatch targets and handler owners are always concrete.
    pub(super) fn bucket(
        &self,
        event_type: &'static EventType,
    ) -> Result<Arc<HandlerBucket>, EventError> {
        if event_type.is_abstract() {
            return Err(EventError::AbstractEventType(event_type.name()));
        }
        if let Some(bucket) = self.buckets.get(event_type) {
            return Ok(bucket.clone());
        }
        // First sight of this type: build its ancestor chain under the
        // registry mutation lock so concurrent creators cannot race.
        let _mutation = lock(&self.sequence);
        Ok(self.ensure_bucket_chain(event_type))
    }

    /// Retrieves or creates the bucket for `event_type`, recursively ensuring
    /// the bucket of its nearest non-abstract ancestor exists first and
    /// linking to it. Every concrete type's bucket therefore transitively
    /// reaches the top of its chain exactly once.
    ///
    /// Callers must hold the mutation lock.
    pub(super) fn ensure_bucket_chain(
        &self,
        event_type: &'static EventType,
    ) -> Arc<HandlerBucket> {
        if let Some(existing) = self.buckets.get(event_type) {
            return existing.clone();
        }
        let parent = event_type
            .handler_ancestor()
            .map(|ancestor| self.ensure_bucket_chain(ancestor));
        let bucket = Arc::new(HandlerBucket::new(event_type, parent));
        self.buckets.insert(event_type, bucket.clone());
        bucket
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("event_types", &self.buckets.len())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

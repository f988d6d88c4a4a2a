//! Event system statistics.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters describing event system activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventSystemStats {
    /// Handlers currently registered across all event types.
    pub total_handlers: usize,
    /// Dispatch calls completed.
    pub events_dispatched: u64,
    /// Individual handler invocations that failed and were isolated.
    pub handler_failures: u64,
}

#[derive(Debug, Default)]
pub(super) struct AtomicStats {
    pub(super) total_handlers: AtomicUsize,
    pub(super) events_dispatched: AtomicU64,
    pub(super) handler_failures: AtomicU64,
}

impl AtomicStats {
    pub(super) fn snapshot(&self) -> EventSystemStats {
        EventSystemStats {
            total_handlers: self.total_handlers.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
        }
    }
}

//! Event system module - registry, buckets, dispatch, and lifecycle management.

mod bucket;
mod core;
mod dispatch;
mod handlers;
mod management;
mod stats;

pub use self::bucket::CapabilityHandler;
pub use self::core::EventSystem;
pub use self::stats::EventSystemStats;

use std::sync::{Mutex, MutexGuard};

/// Acquires `mutex`, recovering from poisoning.
///
/// Every section guarded here leaves the data structurally sound at any
/// panic point (list mutation is a sorted insert or a `retain`), so a
/// poisoned lock carries no torn state worth aborting over.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

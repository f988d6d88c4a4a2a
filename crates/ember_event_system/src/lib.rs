//! # Ember Event System
//!
//! A priority-ordered, type-safe event dispatch core for game servers with a
//! plugin architecture. Independently loaded plugins subscribe to typed
//! occurrences raised anywhere in the server (chat, combat, world changes)
//! and receive them in a deterministic order, with one occurrence potentially
//! mutated or cancelled by a later handler before the server acts on it.
//!
//! ## Core Features
//!
//! - **Hierarchy-aware dispatch**: a handler registered on an event type also
//!   fires for every descendant type, interleaved strictly by priority and
//!   registration order, without the dispatching caller naming the hierarchy
//! - **Deterministic ordering**: handlers sort by priority, ties broken by a
//!   global registration sequence number that is stable across plugin
//!   load/unload cycles
//! - **Cached resolution**: the per-type resolved handler order is computed
//!   lazily and cached, invalidated by generation counters whenever any
//!   bucket in the ancestor chain changes
//! - **Failure isolation**: a misbehaving handler is logged and skipped;
//!   it never halts the remaining handlers or reaches the dispatching caller
//! - **Plugin lifecycle**: bulk unregistration by callable, by subscriber,
//!   or by owning plugin, used on plugin unload
//!
//! Dispatch is synchronous and in-process: events are not persisted, not
//! serialized, and not delivered across the network.
//!
//! ## Quick Start Example
//!
//! ```rust
//! use ember_event_system::*;
//!
//! static CHAT_EVENT: EventType = EventType::concrete("chat", &EVENT);
//!
//! #[derive(Debug)]
//! struct ChatEvent {
//!     message: String,
//!     cancelled: bool,
//! }
//! impl_event!(ChatEvent, &CHAT_EVENT);
//!
//! let events = create_event_system();
//! let plugin = PluginId::new();
//!
//! events
//!     .on(plugin, EventPriority::Normal, |event: &mut ChatEvent| {
//!         if event.message.contains("spam") {
//!             event.cancelled = true;
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let event = events.dispatch(ChatEvent {
//!     message: "hello world".to_string(),
//!     cancelled: false,
//! });
//! assert!(!event.cancelled);
//!
//! // Unload the plugin: none of its handlers ever fire again.
//! events.unregister_plugin(plugin);
//! ```

mod error;
mod events;
mod executor;
mod hierarchy;
mod macros;
mod subscriber;
mod system;
mod types;

#[cfg(test)]
mod system_tests;

pub use error::EventError;
pub use events::{Event, EventKind};
pub use executor::{CapabilityExecutor, EventExecutor, FnExecutor};
pub use hierarchy::{EventType, EVENT};
pub use subscriber::{EventSubscriber, Subscription};
pub use system::{CapabilityHandler, EventSystem, EventSystemStats};
pub use types::{EventPriority, PluginId};

use std::sync::Arc;

/// Creates a shared event system ready for plugin registration.
pub fn create_event_system() -> Arc<EventSystem> {
    Arc::new(EventSystem::new())
}

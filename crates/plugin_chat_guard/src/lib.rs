//! Chat guard plugin.
//!
//! A small plugin built against the Ember event system: it subscribes to
//! player chat events, cancels messages containing banned words before the
//! server acts on them, and observes the final verdict at monitor priority.
//! The plugin host calls [`on_load`] when the plugin loads and [`on_unload`]
//! when it unloads; after unload none of the guard's handlers ever fire.

use ember_event_system::{
    impl_event, EventPriority, EventSubscriber, EventSystem, EventType, PluginId, Subscription,
    EVENT,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// Event Catalog
// ============================================================================

/// Grouping node for everything a player does.
pub static PLAYER_EVENT: EventType = EventType::concrete("player", &EVENT);
/// A chat line sent by a player.
pub static PLAYER_CHAT_EVENT: EventType = EventType::concrete("player_chat", &PLAYER_EVENT);

/// Payload shared by all player events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerEvent {
    pub player_id: u64,
}
impl_event!(PlayerEvent, &PLAYER_EVENT);

/// A chat message on its way to the rest of the server.
///
/// Handlers may rewrite `message` or set `cancelled`; the server drops
/// cancelled messages after dispatch returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerChatEvent {
    pub base: PlayerEvent,
    pub message: String,
    pub cancelled: bool,
}
impl_event!(PlayerChatEvent, &PLAYER_CHAT_EVENT, parent = base);

impl PlayerChatEvent {
    pub fn new(player_id: u64, message: impl Into<String>) -> Self {
        Self {
            base: PlayerEvent { player_id },
            message: message.into(),
            cancelled: false,
        }
    }
}

// ============================================================================
// Chat Guard Plugin
// ============================================================================

/// Filters chat messages against a banned-word list.
pub struct ChatGuardPlugin {
    plugin_id: PluginId,
    banned_words: Vec<String>,
    blocked_count: AtomicU32,
}

impl ChatGuardPlugin {
    pub fn new(banned_words: Vec<String>) -> Self {
        Self {
            plugin_id: PluginId::new(),
            banned_words,
            blocked_count: AtomicU32::new(0),
        }
    }

    /// The identity under which this plugin's handlers are registered.
    pub fn plugin_id(&self) -> PluginId {
        self.plugin_id
    }

    /// Messages blocked since load.
    pub fn blocked_count(&self) -> u32 {
        self.blocked_count.load(Ordering::Relaxed)
    }
}

impl EventSubscriber for ChatGuardPlugin {
    fn subscriptions(self: Arc<Self>) -> Vec<Subscription> {
        let guard = self.clone();
        vec![
            // Runs early so downstream handlers already see the verdict.
            Subscription::new(EventPriority::Low, move |event: &mut PlayerChatEvent| {
                if guard
                    .banned_words
                    .iter()
                    .any(|word| event.message.contains(word.as_str()))
                {
                    event.cancelled = true;
                    guard.blocked_count.fetch_add(1, Ordering::Relaxed);
                    info!("🛡️ Blocked chat from player {}", event.base.player_id);
                }
                Ok(())
            }),
            // Observe-only pass over the final event state.
            Subscription::new(EventPriority::Monitor, |event: &mut PlayerChatEvent| {
                debug!(
                    "Chat from player {} resolved (cancelled: {})",
                    event.base.player_id, event.cancelled
                );
                Ok(())
            }),
        ]
    }
}

/// Called by the plugin host when the plugin loads.
pub fn on_load(events: &EventSystem, guard: &Arc<ChatGuardPlugin>) -> bool {
    events.register_subscriber(guard.plugin_id(), guard)
}

/// Called by the plugin host when the plugin unloads. Returns the number of
/// handlers removed; afterwards no guard handler ever fires again.
pub fn on_unload(events: &EventSystem, guard: &Arc<ChatGuardPlugin>) -> usize {
    events.unregister_plugin(guard.plugin_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_event_system::create_event_system;
    use std::sync::Mutex;

    fn guard() -> Arc<ChatGuardPlugin> {
        Arc::new(ChatGuardPlugin::new(vec!["grief".to_string()]))
    }

    #[test]
    fn banned_messages_are_cancelled() {
        let events = create_event_system();
        let guard = guard();
        assert!(on_load(&events, &guard));

        let blocked = events.dispatch(PlayerChatEvent::new(7, "come grief my base"));
        assert!(blocked.cancelled);
        assert_eq!(guard.blocked_count(), 1);

        let clean = events.dispatch(PlayerChatEvent::new(7, "hello everyone"));
        assert!(!clean.cancelled);
        assert_eq!(guard.blocked_count(), 1);
    }

    #[test]
    fn server_side_handlers_see_the_guard_verdict() {
        let events = create_event_system();
        let guard = guard();
        on_load(&events, &guard);

        // A Normal-priority server handler runs after the guard's Low pass.
        let verdicts = Arc::new(Mutex::new(Vec::new()));
        let verdicts_ref = verdicts.clone();
        events
            .on(
                PluginId::new(),
                EventPriority::Normal,
                move |event: &mut PlayerChatEvent| {
                    verdicts_ref.lock().unwrap().push(event.cancelled);
                    Ok(())
                },
            )
            .unwrap();

        events.dispatch(PlayerChatEvent::new(1, "grief"));
        events.dispatch(PlayerChatEvent::new(1, "gg"));
        assert_eq!(*verdicts.lock().unwrap(), [true, false]);
    }

    #[test]
    fn guard_handlers_fire_through_the_player_hierarchy() {
        let events = create_event_system();

        // A handler on the shared player level sees chat dispatches too.
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_ref = seen.clone();
        events
            .on(
                PluginId::new(),
                EventPriority::Normal,
                move |event: &mut PlayerEvent| {
                    seen_ref.lock().unwrap().push(event.player_id);
                    Ok(())
                },
            )
            .unwrap();

        events.dispatch(PlayerChatEvent::new(42, "hi"));
        assert_eq!(*seen.lock().unwrap(), [42]);
    }

    #[test]
    fn unload_removes_every_guard_handler() {
        let events = create_event_system();
        let guard = guard();
        on_load(&events, &guard);

        // Filter pass plus monitor pass.
        assert_eq!(on_unload(&events, &guard), 2);

        let event = events.dispatch(PlayerChatEvent::new(3, "grief"));
        assert!(!event.cancelled);
        assert_eq!(guard.blocked_count(), 0);
        assert!(!events.has_handlers(&PLAYER_CHAT_EVENT));

        // Unloading twice is a no-op, not a failure.
        assert_eq!(on_unload(&events, &guard), 0);
    }
}

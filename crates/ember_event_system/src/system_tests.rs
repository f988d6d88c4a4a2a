//! Tests for registration, resolution order, dispatch isolation, and
//! lifecycle management.

use crate::*;
use std::sync::{Arc, Mutex};

static PLAYER_EVENT: EventType = EventType::concrete("player", &EVENT);
static PLAYER_JOIN_EVENT: EventType = EventType::concrete("player_join", &PLAYER_EVENT);
static WORLD_EVENT: EventType = EventType::abstract_type("world", &EVENT);
static BLOCK_PLACE_EVENT: EventType = EventType::concrete("block_place", &WORLD_EVENT);

#[derive(Debug, Default)]
struct PlayerEvent {
    name: String,
}
crate::impl_event!(PlayerEvent, &PLAYER_EVENT);

#[derive(Debug, Default)]
struct PlayerJoinEvent {
    base: PlayerEvent,
    motd: String,
}
crate::impl_event!(PlayerJoinEvent, &PLAYER_JOIN_EVENT, parent = base);

#[derive(Debug, Default)]
struct BlockPlaceEvent {
    cancelled: bool,
}
crate::impl_event!(BlockPlaceEvent, &BLOCK_PLACE_EVENT);

type Log = Arc<Mutex<Vec<&'static str>>>;

fn recording<T: EventKind>(
    log: &Log,
    label: &'static str,
) -> impl Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static {
    let log = log.clone();
    move |_event: &mut T| {
        log.lock().unwrap().push(label);
        Ok(())
    }
}

fn noop<T: EventKind>() -> impl Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static {
    |_event: &mut T| Ok(())
}

fn taken(log: &Log) -> Vec<&'static str> {
    log.lock().unwrap().clone()
}

#[test]
fn priority_overrides_registration_order() {
    let events = EventSystem::new();
    let plugin = PluginId::new();
    let log = Log::default();

    events
        .on(plugin, EventPriority::High, recording::<PlayerEvent>(&log, "high"))
        .unwrap();
    events
        .on(plugin, EventPriority::Lowest, recording::<PlayerEvent>(&log, "lowest"))
        .unwrap();
    events
        .on(plugin, EventPriority::Normal, recording::<PlayerEvent>(&log, "normal"))
        .unwrap();

    events.dispatch(PlayerEvent::default());
    assert_eq!(taken(&log), ["lowest", "normal", "high"]);
}

#[test]
fn equal_priority_ties_break_by_registration_order() {
    let events = EventSystem::new();
    let plugin = PluginId::new();
    let log = Log::default();

    events
        .on(plugin, EventPriority::Normal, recording::<PlayerEvent>(&log, "first"))
        .unwrap();
    events
        .on(plugin, EventPriority::Normal, recording::<PlayerEvent>(&log, "second"))
        .unwrap();

    events.dispatch(PlayerEvent::default());
    assert_eq!(taken(&log), ["first", "second"]);
}

/// Third handler of the join scenario, registered through a subscriber table
/// so it can be removed by subscriber identity.
struct ThirdHandler {
    log: Log,
}

impl EventSubscriber for ThirdHandler {
    fn subscriptions(self: Arc<Self>) -> Vec<Subscription> {
        let me = self.clone();
        vec![Subscription::new(
            EventPriority::Low,
            move |_event: &mut PlayerJoinEvent| {
                me.log.lock().unwrap().push("C");
                Ok(())
            },
        )]
    }
}

#[test]
fn ancestor_handlers_interleave_strictly_by_priority_and_sequence() {
    let events = EventSystem::new();
    let plugin = PluginId::new();
    let log = Log::default();

    // A on the parent type at Normal (sequence 0), B on the child at Low
    // (sequence 1). Low runs before Normal, so a join dispatch is B then A.
    events
        .on(plugin, EventPriority::Normal, recording::<PlayerEvent>(&log, "A"))
        .unwrap();
    events
        .on(plugin, EventPriority::Low, recording::<PlayerJoinEvent>(&log, "B"))
        .unwrap();

    events.dispatch(PlayerJoinEvent::default());
    assert_eq!(taken(&log), ["B", "A"]);
    log.lock().unwrap().clear();

    // C joins at the same priority as B but with a later sequence number.
    let third = Arc::new(ThirdHandler { log: log.clone() });
    assert!(events.register_subscriber(plugin, &third));

    events.dispatch(PlayerJoinEvent::default());
    assert_eq!(taken(&log), ["B", "C", "A"]);
    log.lock().unwrap().clear();

    // Removing the subscriber removes only C.
    assert_eq!(events.unregister_subscriber(&third), 1);
    events.dispatch(PlayerJoinEvent::default());
    assert_eq!(taken(&log), ["B", "A"]);
}

#[test]
fn parent_handler_mutates_child_through_capability_view() {
    let events = EventSystem::new();
    let plugin = PluginId::new();

    events
        .on(plugin, EventPriority::Normal, |event: &mut PlayerEvent| {
            event.name.push('!');
            Ok(())
        })
        .unwrap();

    let out = events.dispatch(PlayerJoinEvent {
        base: PlayerEvent {
            name: "steve".to_string(),
        },
        motd: "welcome".to_string(),
    });
    assert_eq!(out.base.name, "steve!");
    assert_eq!(out.motd, "welcome");
}

#[test]
fn registering_on_abstract_type_always_fails() {
    let events = EventSystem::new();
    let priorities = [
        EventPriority::Lowest,
        EventPriority::Low,
        EventPriority::Normal,
        EventPriority::High,
        EventPriority::Highest,
        EventPriority::Monitor,
    ];

    for priority in priorities {
        let executor: Arc<dyn EventExecutor> = Arc::new(FnExecutor::new(
            "abstract_target",
            |_event: &mut dyn Event| -> Result<(), EventError> { Ok(()) },
        ));
        let err = events
            .register(PluginId::new(), &WORLD_EVENT, priority, executor)
            .unwrap_err();
        assert!(matches!(err, EventError::AbstractEventType("world")));
    }
    assert_eq!(events.stats().total_handlers, 0);
}

struct MixedSubscriber {
    log: Log,
}

impl EventSubscriber for MixedSubscriber {
    fn subscriptions(self: Arc<Self>) -> Vec<Subscription> {
        let me = self.clone();
        vec![
            // Invalid entry: targets an abstract grouping node.
            Subscription::erased(
                &WORLD_EVENT,
                EventPriority::Normal,
                Arc::new(FnExecutor::new(
                    "world_watcher",
                    |_event: &mut dyn Event| -> Result<(), EventError> { Ok(()) },
                )),
            ),
            Subscription::new(EventPriority::Normal, move |_event: &mut PlayerEvent| {
                me.log.lock().unwrap().push("kept");
                Ok(())
            }),
        ]
    }
}

#[test]
fn invalid_subscription_entry_is_skipped_not_fatal() {
    let events = EventSystem::new();
    let log = Log::default();
    let subscriber = Arc::new(MixedSubscriber { log: log.clone() });

    assert!(events.register_subscriber(PluginId::new(), &subscriber));

    events.dispatch(PlayerEvent::default());
    assert_eq!(taken(&log), ["kept"]);
    assert_eq!(events.handler_count(&WORLD_EVENT), 0);
}

#[test]
fn unregister_plugin_leaves_other_plugins_in_order() {
    let events = EventSystem::new();
    let doomed = PluginId::new();
    let survivor = PluginId::new();
    let log = Log::default();

    events
        .on(doomed, EventPriority::Normal, recording::<PlayerEvent>(&log, "doomed_1"))
        .unwrap();
    events
        .on(survivor, EventPriority::Normal, recording::<PlayerEvent>(&log, "survivor_1"))
        .unwrap();
    events
        .on(doomed, EventPriority::Normal, recording::<BlockPlaceEvent>(&log, "doomed_2"))
        .unwrap();
    events
        .on(survivor, EventPriority::Normal, recording::<PlayerEvent>(&log, "survivor_2"))
        .unwrap();

    assert_eq!(events.unregister_plugin(doomed), 2);

    events.dispatch(PlayerEvent::default());
    events.dispatch(BlockPlaceEvent::default());
    assert_eq!(taken(&log), ["survivor_1", "survivor_2"]);

    // Idempotent: nothing left to remove.
    assert_eq!(events.unregister_plugin(doomed), 0);
}

#[test]
fn unregister_executor_matches_by_identity() {
    let events = EventSystem::new();
    let plugin = PluginId::new();
    let log = Log::default();

    let target_log = log.clone();
    let target: Arc<dyn EventExecutor> = Arc::new(FnExecutor::new(
        "target",
        move |_event: &mut dyn Event| -> Result<(), EventError> {
            target_log.lock().unwrap().push("target");
            Ok(())
        },
    ));
    events
        .register(plugin, &PLAYER_EVENT, EventPriority::Normal, target.clone())
        .unwrap();
    events
        .on(plugin, EventPriority::Normal, recording::<PlayerEvent>(&log, "other"))
        .unwrap();

    assert_eq!(events.unregister_executor(&target), 1);
    events.dispatch(PlayerEvent::default());
    assert_eq!(taken(&log), ["other"]);

    assert_eq!(events.unregister_executor(&target), 0);
}

#[test]
fn failing_handler_is_isolated_from_the_rest() {
    let events = EventSystem::new();
    let plugin = PluginId::new();
    let log = Log::default();

    events
        .on(plugin, EventPriority::Low, |_event: &mut PlayerEvent| {
            Err(EventError::HandlerExecution("boom".to_string()))
        })
        .unwrap();
    events
        .on(plugin, EventPriority::Normal, recording::<PlayerEvent>(&log, "after"))
        .unwrap();

    let out = events.dispatch(PlayerEvent {
        name: "alex".to_string(),
    });
    assert_eq!(out.name, "alex");
    assert_eq!(taken(&log), ["after"]);
    assert_eq!(events.stats().handler_failures, 1);
}

#[test]
fn dispatch_with_no_handlers_is_a_noop() {
    let events = EventSystem::new();

    let out = events.dispatch(BlockPlaceEvent { cancelled: false });
    assert!(!out.cancelled);
    assert!(!events.has_handlers(&BLOCK_PLACE_EVENT));
    assert_eq!(events.stats().events_dispatched, 1);
    assert_eq!(events.stats().handler_failures, 0);
}

#[test]
fn handler_registered_mid_dispatch_only_joins_the_next_dispatch() {
    let events = create_event_system();
    let plugin = PluginId::new();
    let log = Log::default();

    let events_ref = events.clone();
    let reg_log = log.clone();
    events
        .on(plugin, EventPriority::Normal, move |_event: &mut PlayerEvent| {
            reg_log.lock().unwrap().push("reg");
            // Highest would run later in this same dispatch if the snapshot
            // were live.
            events_ref.on(
                plugin,
                EventPriority::Highest,
                recording::<PlayerEvent>(&reg_log, "late"),
            )?;
            Ok(())
        })
        .unwrap();

    events.dispatch(PlayerEvent::default());
    assert_eq!(taken(&log), ["reg"]);

    events.dispatch(PlayerEvent::default());
    assert_eq!(taken(&log), ["reg", "reg", "late"]);
}

#[test]
fn ancestor_registration_invalidates_cached_resolution() {
    let events = EventSystem::new();
    let plugin = PluginId::new();
    let log = Log::default();

    events
        .on(plugin, EventPriority::Normal, recording::<PlayerJoinEvent>(&log, "child"))
        .unwrap();
    events.dispatch(PlayerJoinEvent::default());
    assert_eq!(taken(&log), ["child"]);
    log.lock().unwrap().clear();

    // The join bucket's resolved list is cached now; registration on the
    // parent must show up on the next join dispatch.
    events
        .on(plugin, EventPriority::Lowest, recording::<PlayerEvent>(&log, "parent"))
        .unwrap();
    events.dispatch(PlayerJoinEvent::default());
    assert_eq!(taken(&log), ["parent", "child"]);
}

#[test]
fn buckets_are_emptied_but_never_destroyed() {
    let events = EventSystem::new();
    let plugin = PluginId::new();

    events
        .on(plugin, EventPriority::Normal, noop::<PlayerEvent>())
        .unwrap();
    assert_eq!(events.unregister_plugin(plugin), 1);

    assert!(events.registered_types().contains(&&PLAYER_EVENT));
    assert_eq!(events.handler_count(&PLAYER_EVENT), 0);

    // The emptied bucket keeps accepting registrations.
    events
        .on(plugin, EventPriority::Normal, noop::<PlayerEvent>())
        .unwrap();
    assert_eq!(events.handler_count(&PLAYER_EVENT), 1);
}

#[test]
fn cross_thread_registration_does_not_corrupt_dispatch() {
    let events = create_event_system();
    let plugin = PluginId::new();

    let writer = {
        let events = events.clone();
        std::thread::spawn(move || {
            for _ in 0..64 {
                events
                    .on(plugin, EventPriority::Normal, noop::<PlayerEvent>())
                    .unwrap();
            }
        })
    };
    for _ in 0..64 {
        events.dispatch(PlayerJoinEvent::default());
    }
    writer.join().unwrap();

    assert_eq!(events.stats().total_handlers, 64);
    // Every parent handler resolves into the child's order.
    assert_eq!(events.handler_count(&PLAYER_JOIN_EVENT), 64);
}

// Declared with the leaf form even though its type node sits under the
// player node, so it answers no capability lookup for the parent payload.
static PLAYER_SNEAK_EVENT: EventType = EventType::concrete("player_sneak", &PLAYER_EVENT);

#[derive(Debug, Default)]
struct PlayerSneakEvent {
    sneaking: bool,
}
crate::impl_event!(PlayerSneakEvent, &PLAYER_SNEAK_EVENT);

#[test]
fn missing_capability_view_fails_only_that_handler() {
    let events = EventSystem::new();
    let plugin = PluginId::new();
    let log = Log::default();

    events
        .on(plugin, EventPriority::Low, recording::<PlayerEvent>(&log, "parent"))
        .unwrap();
    events
        .on(plugin, EventPriority::Normal, recording::<PlayerSneakEvent>(&log, "sneak"))
        .unwrap();

    // The parent-typed handler resolves for the sneak dispatch but the event
    // exposes no parent payload; that one invocation fails and is isolated.
    let out = events.dispatch(PlayerSneakEvent { sneaking: true });
    assert!(out.sneaking);
    assert_eq!(taken(&log), ["sneak"]);
    assert_eq!(events.stats().handler_failures, 1);
}

#[test]
fn earlier_handler_effects_are_visible_to_later_handlers() {
    let events = EventSystem::new();
    let plugin = PluginId::new();

    events
        .on(plugin, EventPriority::Low, |event: &mut BlockPlaceEvent| {
            event.cancelled = true;
            Ok(())
        })
        .unwrap();

    let observed = Arc::new(Mutex::new(None));
    let observed_ref = observed.clone();
    events
        .on(plugin, EventPriority::Monitor, move |event: &mut BlockPlaceEvent| {
            *observed_ref.lock().unwrap() = Some(event.cancelled);
            Ok(())
        })
        .unwrap();

    let out = events.dispatch(BlockPlaceEvent { cancelled: false });
    assert!(out.cancelled);
    assert_eq!(*observed.lock().unwrap(), Some(true));
}

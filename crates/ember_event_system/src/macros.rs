//! Event declaration macros.

/// Implements [`Event`](crate::Event) and [`EventKind`](crate::EventKind) for
/// an event payload struct.
///
/// Two forms:
///
/// - Leaf form, for payloads with no embedded parent payload:
///   `impl_event!(ChatEvent, &CHAT_EVENT);`
/// - Parent-embedding form, for payloads whose named field holds the
///   parent-level payload and should answer capability lookups for ancestor
///   types: `impl_event!(PlayerJoinEvent, &PLAYER_JOIN_EVENT, parent = base);`
///
/// # Examples
///
/// ```rust
/// use ember_event_system::*;
///
/// static PLAYER_EVENT: EventType = EventType::concrete("player", &EVENT);
/// static PLAYER_JOIN_EVENT: EventType = EventType::concrete("player_join", &PLAYER_EVENT);
///
/// #[derive(Debug, Default)]
/// struct PlayerEvent {
///     name: String,
/// }
/// impl_event!(PlayerEvent, &PLAYER_EVENT);
///
/// #[derive(Debug, Default)]
/// struct PlayerJoinEvent {
///     base: PlayerEvent,
///     first_join: bool,
/// }
/// impl_event!(PlayerJoinEvent, &PLAYER_JOIN_EVENT, parent = base);
/// ```
#[macro_export]
macro_rules! impl_event {
    ($event:ty, $descriptor:expr) => {
        impl $crate::Event for $event {
            fn event_type(&self) -> &'static $crate::EventType {
                <Self as $crate::EventKind>::descriptor()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl $crate::EventKind for $event {
            fn descriptor() -> &'static $crate::EventType {
                $descriptor
            }
        }
    };
    ($event:ty, $descriptor:expr, parent = $field:ident) => {
        impl $crate::Event for $event {
            fn event_type(&self) -> &'static $crate::EventType {
                <Self as $crate::EventKind>::descriptor()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn capability_mut(
                &mut self,
                ty: &'static $crate::EventType,
            ) -> Option<&mut dyn ::std::any::Any> {
                if ty == <Self as $crate::EventKind>::descriptor() {
                    Some(self as &mut dyn ::std::any::Any)
                } else {
                    $crate::Event::capability_mut(&mut self.$field, ty)
                }
            }
        }

        impl $crate::EventKind for $event {
            fn descriptor() -> &'static $crate::EventType {
                $descriptor
            }
        }
    };
}

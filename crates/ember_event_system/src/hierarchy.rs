//! # Event Type Hierarchy
//!
//! Event types form a single-rooted tree of static descriptors. Each node is
//! either *abstract* (groups descendants, can neither be dispatched nor own
//! handlers) or *concrete* (dispatchable, owns handlers). The hierarchy is
//! closed and known at compile time: every node is a `static EventType` whose
//! parent link points at another static, so ancestor resolution is a plain
//! pointer walk with no runtime type introspection.
//!
//! Descriptor identity is pointer identity. Two descriptors compare equal only
//! when they are the same `static` item, which is what makes them usable as
//! registry keys.
//!
//! # Examples
//!
//! ```rust
//! use ember_event_system::{EventType, EVENT};
//!
//! static PLAYER_EVENT: EventType = EventType::concrete("player", &EVENT);
//! static PLAYER_JOIN_EVENT: EventType = EventType::concrete("player_join", &PLAYER_EVENT);
//!
//! assert!(PLAYER_JOIN_EVENT.is_descendant_of(&EVENT));
//! assert_eq!(PLAYER_JOIN_EVENT.handler_ancestor(), Some(&PLAYER_EVENT));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

/// The conventional root of the event hierarchy.
///
/// Applications hang their own event types off this node. The root is abstract,
/// so it can never be dispatched or own handlers directly.
pub static EVENT: EventType = EventType::abstract_root("event");

/// A node in the event type hierarchy.
pub struct EventType {
    name: &'static str,
    parent: Option<&'static EventType>,
    is_abstract: bool,
}

impl EventType {
    /// Declares an abstract root node with no parent.
    pub const fn abstract_root(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            is_abstract: true,
        }
    }

    /// Declares an abstract grouping node under `parent`.
    pub const fn abstract_type(name: &'static str, parent: &'static EventType) -> Self {
        Self {
            name,
            parent: Some(parent),
            is_abstract: true,
        }
    }

    /// Declares a concrete, dispatchable node under `parent`.
    pub const fn concrete(name: &'static str, parent: &'static EventType) -> Self {
        Self {
            name,
            parent: Some(parent),
            is_abstract: false,
        }
    }

    /// The diagnostic name of this event type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this node only groups descendants.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// The direct parent node, if any.
    pub fn parent(&self) -> Option<&'static EventType> {
        self.parent
    }

    /// The nearest ancestor that is itself eligible to own handlers, skipping
    /// over abstract intermediate nodes. `None` when every ancestor up to the
    /// root is abstract.
    pub fn handler_ancestor(&self) -> Option<&'static EventType> {
        let mut current = self.parent;
        while let Some(ancestor) = current {
            if !ancestor.is_abstract {
                return Some(ancestor);
            }
            current = ancestor.parent;
        }
        None
    }

    /// Whether `ancestor` appears anywhere on this node's parent chain.
    pub fn is_descendant_of(&self, ancestor: &'static EventType) -> bool {
        let mut current = self.parent;
        while let Some(node) = current {
            if std::ptr::eq(node, ancestor) {
                return true;
            }
            current = node.parent;
        }
        false
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self as *const EventType as usize).hash(state);
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventType")
            .field("name", &self.name)
            .field("abstract", &self.is_abstract)
            .field("parent", &self.parent.map(EventType::name))
            .finish()
    }
}

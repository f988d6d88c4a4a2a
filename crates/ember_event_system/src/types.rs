//! # Core Type Definitions
//!
//! Identity and ordering types shared across the event system:
//!
//! - [`PluginId`] - Unique identifier for the plugin owning a handler
//! - [`EventPriority`] - Execution precedence for capability handlers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a plugin loaded into the server.
///
/// A wrapper around UUID that provides type safety and ensures plugin IDs
/// cannot be confused with other kinds of IDs in the system. Every handler
/// records the ID of the plugin that registered it, so a plugin's handlers
/// can be removed wholesale when it unloads.
///
/// # Examples
///
/// ```rust
/// use ember_event_system::PluginId;
///
/// let plugin_id = PluginId::new();
/// println!("Plugin ID: {}", plugin_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginId(pub Uuid);

impl PluginId {
    /// Creates a new random plugin ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a plugin ID from a string representation.
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::str::FromStr for PluginId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

impl Default for PluginId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PluginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Execution precedence for capability handlers.
///
/// Lower variants execute earlier on every dispatch, regardless of the order
/// handlers were registered; ties within one priority fall back to the global
/// registration sequence number. `Monitor` runs after everything else and is
/// observe-only by convention: a monitor handler should read the final state
/// of the event (for logging, metrics) without mutating it further.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EventPriority {
    /// Runs first; other handlers may override its effects.
    Lowest,
    /// Runs early.
    Low,
    /// Default precedence.
    Normal,
    /// Runs late.
    High,
    /// Runs last among mutating handlers.
    Highest,
    /// Observes the final event state after all other handlers.
    Monitor,
}

impl Default for EventPriority {
    fn default() -> Self {
        Self::Normal
    }
}

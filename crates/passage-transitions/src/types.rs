//! Core identifier and state types for the transition layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a running transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

impl TransitionId {
    /// Generate a new unique transition ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TransitionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique handle for one shared-element occurrence in the registry.
///
/// The same identity exists once per page; the entry ID is what tells the
/// two occurrences apart, so unregistration can target a specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Generate a new unique entry ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque, equality-comparable key matching elements across two pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Opaque host page handle. Used for liveness checks only; the transition
/// layer never owns or dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageHandle(pub u64);

/// Opaque host element handle: the payload rendered during flights and
/// stagger, and the key the host's layout system resolves geometry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// Which screen's content an effect sample applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenSide {
    /// The page being navigated away from.
    Outgoing,
    /// The page being navigated to.
    Incoming,
}

/// Direction the master progress is being driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackDirection {
    /// Progress advances 0 → 1 (push).
    Forward,
    /// Progress retreats 1 → 0 (pop / dismissal).
    Reverse,
}

/// Current state of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionState {
    /// Transition is actively running.
    Running,
    /// Transition reached a terminal progress value.
    Finished,
    /// Transition was cancelled before completion.
    Cancelled,
}

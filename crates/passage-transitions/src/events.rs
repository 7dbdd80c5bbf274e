//! Transition lifecycle events.
//!
//! The manager queues events during `tick`; hosts poll them afterwards
//! with [`TransitionManager::drain_events`](crate::manager::TransitionManager::drain_events)
//! to react to pairing, stagger scheduling, spring settling, and
//! completion.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

use crate::types::{Identity, TransitionId};

/// Event emitted when a transition or one of its components changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    /// The transition began running.
    Started { transition_id: TransitionId },
    /// Master progress reached a terminal value.
    Finished { transition_id: TransitionId },
    /// The transition was aborted before completion.
    Cancelled { transition_id: TransitionId },
    /// A shared-element identity gained a double-ended pairing.
    FlightPaired {
        transition_id: TransitionId,
        identity: Identity,
    },
    /// Stagger discovery succeeded and sub-intervals were assigned.
    StaggerScheduled {
        transition_id: TransitionId,
        item_count: usize,
        total_duration_ms: f32,
    },
    /// Stagger discovery exhausted its attempts; parent content renders
    /// unmodified.
    StaggerFellBack { transition_id: TransitionId },
    /// A spring-driven effect's simulation reached rest.
    SpringSettled {
        transition_id: TransitionId,
        effect_index: usize,
    },
}

impl TransitionEvent {
    /// The transition this event belongs to.
    pub fn transition_id(&self) -> TransitionId {
        match self {
            Self::Started { transition_id }
            | Self::Finished { transition_id }
            | Self::Cancelled { transition_id }
            | Self::FlightPaired { transition_id, .. }
            | Self::StaggerScheduled { transition_id, .. }
            | Self::StaggerFellBack { transition_id }
            | Self::SpringSettled { transition_id, .. } => *transition_id,
        }
    }
}

/// Default cap on queued events before the oldest are dropped.
const DEFAULT_MAX_EVENTS: usize = 256;

/// Bounded FIFO of transition events.
#[derive(Debug)]
pub struct EventQueue {
    queue: VecDeque<TransitionEvent>,
    max_len: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            max_len: DEFAULT_MAX_EVENTS,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event, dropping the oldest when full.
    pub fn push(&mut self, event: TransitionEvent) {
        if self.queue.len() >= self.max_len {
            warn!("event queue full; dropping oldest transition event");
            self.queue.pop_front();
        }
        self.queue.push_back(event);
    }

    /// Drain all queued events in emission order.
    pub fn drain(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

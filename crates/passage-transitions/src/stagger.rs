//! Staggered reveal: discovery-driven sub-interval scheduling.
//!
//! A stagger effect fans a parent animation out over a set of child
//! elements discovered at runtime. Each child receives a delayed
//! sub-interval of the parent's progress, and the parent's effective
//! duration grows to guarantee the last child finishes.
//!
//! Children may not exist when the transition starts (widgets mount over a
//! few frames), so discovery is a cooperative bounded retry: one attempt
//! per `poll` call, scheduled once the discovered set is stable, falling
//! back to unmodified parent content when attempts run out empty-handed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::effect::Interval;
use crate::error::{Result, TransitionError};
use crate::host::{LayoutHost, TreeDiscovery};
use crate::types::ElementHandle;
use passage_core::geometry::Rect;

/// Declarative stagger parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaggerConfig {
    /// Delay between consecutive items, in milliseconds.
    pub item_interval_ms: f32,
    /// Each item's own animation length, in milliseconds.
    pub item_duration_ms: f32,
    /// Discovery walk bound; at most this many children are animated.
    pub max_items: usize,
    /// Reverse discovery order before assigning indices. Timing direction
    /// is unaffected.
    pub reverse: bool,
    /// Bound on discovery attempts before degrading to unstaggered
    /// content.
    pub max_attempts: u32,
}

impl StaggerConfig {
    /// Create a validated config with default bounds (`max_items` 32,
    /// `max_attempts` 5, forward order).
    pub fn new(item_interval_ms: f32, item_duration_ms: f32) -> Result<Self> {
        if item_interval_ms < 0.0 {
            return Err(TransitionError::InvalidStagger(format!(
                "item interval {item_interval_ms}ms must be >= 0"
            )));
        }
        if item_duration_ms <= 0.0 {
            return Err(TransitionError::InvalidDuration(item_duration_ms));
        }
        Ok(Self {
            item_interval_ms,
            item_duration_ms,
            max_items: 32,
            reverse: false,
            max_attempts: 5,
        })
    }

    pub fn with_max_items(mut self, max_items: usize) -> Result<Self> {
        if max_items == 0 {
            return Err(TransitionError::InvalidStagger(
                "max_items must be at least 1".into(),
            ));
        }
        self.max_items = max_items;
        Ok(self)
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Result<Self> {
        if max_attempts == 0 {
            return Err(TransitionError::InvalidStagger(
                "max_attempts must be at least 1".into(),
            ));
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }
}

/// One discovered child with its assigned sub-interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaggerItem {
    pub element: ElementHandle,
    /// On-screen bounds captured at discovery time. `Rect::ZERO` when the
    /// child had not been laid out yet.
    pub bounds_at_discovery: Rect,
    /// Sub-interval of the parent's progress this item animates over.
    pub interval: Interval,
}

/// The computed schedule for a discovered set of children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaggerSchedule {
    /// Effective parent duration: `max(parent, interval·(n−1) + duration)`.
    pub total_duration_ms: f32,
    pub items: Vec<StaggerItem>,
}

impl StaggerSchedule {
    /// Assign sub-intervals to `children` (discovery order) under `config`.
    ///
    /// `delay_i = interval · i`; item `i` spans
    /// `[delay_i / total, (delay_i + duration) / total]`, the end clamped
    /// to 1. Reverse mode flips the child order before assigning indices.
    pub fn compute(
        config: &StaggerConfig,
        parent_duration_ms: f32,
        mut children: Vec<(ElementHandle, Rect)>,
    ) -> Self {
        if config.reverse {
            children.reverse();
        }

        let n = children.len();
        let span = if n == 0 {
            0.0
        } else {
            config.item_interval_ms * (n as f32 - 1.0) + config.item_duration_ms
        };
        let total_duration_ms = parent_duration_ms.max(span);

        let items = children
            .into_iter()
            .enumerate()
            .map(|(i, (element, bounds))| {
                let delay = config.item_interval_ms * i as f32;
                let start = delay / total_duration_ms;
                let end = (delay + config.item_duration_ms) / total_duration_ms;
                StaggerItem {
                    element,
                    bounds_at_discovery: bounds,
                    interval: Interval::clamped(start, end.min(1.0)),
                }
            })
            .collect();

        Self {
            total_duration_ms,
            items,
        }
    }
}

/// Result of one discovery attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryOutcome {
    /// Children found and stable; schedule computed.
    Scheduled(StaggerSchedule),
    /// Nothing usable yet; poll again next frame.
    Pending,
    /// Attempts exhausted with no children; render the parent content
    /// unmodified.
    FellBack,
}

/// Cooperative retry loop around the host's tree walk.
///
/// Call [`poll`](Self::poll) once per frame until it returns something
/// other than `Pending`. The discovered set is considered stable once two
/// consecutive attempts agree on the child count; this absorbs the race
/// between widget mount and discovery without an unbounded timer chain.
pub struct StaggerScheduler {
    config: StaggerConfig,
    predicate: Box<dyn Fn(ElementHandle) -> bool + Send + Sync>,
    attempts: u32,
    last_count: Option<usize>,
}

impl std::fmt::Debug for StaggerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaggerScheduler")
            .field("config", &self.config)
            .field("attempts", &self.attempts)
            .field("last_count", &self.last_count)
            .finish_non_exhaustive()
    }
}

impl StaggerScheduler {
    pub fn new(
        config: StaggerConfig,
        predicate: Box<dyn Fn(ElementHandle) -> bool + Send + Sync>,
    ) -> Self {
        Self {
            config,
            predicate,
            attempts: 0,
            last_count: None,
        }
    }

    pub fn config(&self) -> &StaggerConfig {
        &self.config
    }

    /// Run one discovery attempt.
    ///
    /// Schedules when the discovered count is nonzero and stable (or
    /// attempts are exhausted with at least one child); falls back once
    /// attempts are exhausted with none.
    pub fn poll(
        &mut self,
        parent_duration_ms: f32,
        discovery: &dyn TreeDiscovery,
        layout: &dyn LayoutHost,
    ) -> DiscoveryOutcome {
        self.attempts += 1;
        let found = discovery.find_matching(self.predicate.as_ref(), self.config.max_items);
        let count = found.len();
        let exhausted = self.attempts >= self.config.max_attempts;

        if count == 0 {
            if exhausted {
                warn!(
                    attempts = self.attempts,
                    "stagger discovery found no children; rendering unstaggered"
                );
                return DiscoveryOutcome::FellBack;
            }
            self.last_count = Some(0);
            return DiscoveryOutcome::Pending;
        }

        let stable = self.last_count == Some(count);
        if !stable && !exhausted {
            debug!(count, attempt = self.attempts, "stagger discovery still settling");
            self.last_count = Some(count);
            return DiscoveryOutcome::Pending;
        }

        let children = found
            .into_iter()
            .map(|element| {
                let bounds = layout.capture_geometry(element).unwrap_or(Rect::ZERO);
                (element, bounds)
            })
            .collect();
        let schedule = StaggerSchedule::compute(&self.config, parent_duration_ms, children);
        debug!(
            count,
            total_ms = schedule.total_duration_ms,
            "stagger schedule computed"
        );
        DiscoveryOutcome::Scheduled(schedule)
    }
}

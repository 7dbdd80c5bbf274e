//! The transition manager: master clock, coordination, and per-frame
//! output.
//!
//! The manager owns every running transition and is driven by the host
//! once per rendered frame: `tick(dt_ms, …)` advances master progress,
//! pumps shared-element geometry capture, polls stagger discovery, steps
//! spring simulations, and returns a `TransitionFrame` snapshot per active
//! transition for the host to paint. Everything runs on the UI thread;
//! nothing here is safe for concurrent mutation.
//!
//! # Usage
//!
//! ```ignore
//! let mut manager = TransitionManager::new();
//! let mut registry = SharedElementRegistry::new();
//!
//! let id = manager.start(
//!     TransitionBuilder::new(300.0)?
//!         .fade_in()
//!         .shared_element("hero", SharedElementConfig::default())
//!         .build(),
//! );
//!
//! // Each frame:
//! let frames = manager.tick(16.7, &mut registry, &layout, &discovery);
//! for event in manager.drain_events() { /* react */ }
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::chain::TransitionRequest;
use crate::compositor::{VisualOp, sample_chain_with};
use crate::effect::{Interval, ProgressDriver};
use crate::events::{EventQueue, TransitionEvent};
use crate::flight::FlightFrame;
use crate::host::{LayoutHost, TreeDiscovery};
use crate::registry::{IdentityState, SharedElementRegistry};
use crate::spring_driver::SpringDriver;
use crate::stagger::{DiscoveryOutcome, StaggerSchedule, StaggerScheduler};
use crate::types::{
    ElementHandle, Identity, PlaybackDirection, ScreenSide, TransitionId, TransitionState,
};
use passage_core::geometry::Rect;

/// One stagger child's contribution for a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaggerItemFrame {
    pub element: ElementHandle,
    pub bounds_at_discovery: Rect,
    /// The parent chain sampled over this item's sub-interval.
    pub ops: Vec<VisualOp>,
}

/// Everything the host needs to paint one transition for one frame.
///
/// When flights or stagger items are absent (no pairing yet, discovery
/// fell back), the plain `outgoing`/`incoming` stacks still describe a
/// renderable frame; content degrades, it never disappears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionFrame {
    pub transition_id: TransitionId,
    pub progress: f32,
    pub direction: PlaybackDirection,
    /// `Finished` marks the last frame this transition will produce.
    pub state: TransitionState,
    /// Effect stack for the outgoing page, declaration order.
    pub outgoing: Vec<VisualOp>,
    /// Effect stack for the incoming page, declaration order.
    pub incoming: Vec<VisualOp>,
    /// Shared-element flights resolvable this frame.
    pub flights: Vec<FlightFrame>,
    /// Staggered children, present once discovery has scheduled.
    pub stagger_items: Vec<StaggerItemFrame>,
}

/// Stagger progress within one running transition.
#[derive(Debug)]
enum StaggerState {
    /// Discovery still retrying.
    Polling(StaggerScheduler),
    /// Sub-intervals assigned.
    Scheduled(StaggerSchedule),
    /// Attempts exhausted; parent renders unstaggered.
    Degraded,
}

/// A running transition and its driver state.
#[derive(Debug)]
struct ActiveTransition {
    id: TransitionId,
    request: TransitionRequest,
    progress: f32,
    direction: PlaybackDirection,
    /// Grows beyond `request.duration_ms` when a stagger schedule needs
    /// more time.
    effective_duration_ms: f32,
    /// Spring drivers keyed by effect index in the chain.
    springs: HashMap<usize, SpringDriver>,
    stagger: Option<StaggerState>,
    /// Identities already reported as paired.
    paired_reported: HashSet<Identity>,
    /// Spring effect indices already reported as settled.
    settled_reported: HashSet<usize>,
}

impl ActiveTransition {
    fn new(id: TransitionId, mut request: TransitionRequest) -> Self {
        let springs: HashMap<usize, SpringDriver> = request
            .chain
            .iter()
            .enumerate()
            .filter_map(|(i, effect)| match effect.driver {
                ProgressDriver::Spring(desc) => Some((i, SpringDriver::new(desc))),
                ProgressDriver::Curve(_) => None,
            })
            .collect();
        let stagger = request
            .stagger
            .take()
            .map(|s| StaggerState::Polling(StaggerScheduler::new(s.config, s.predicate)));
        Self {
            id,
            effective_duration_ms: request.duration_ms,
            request,
            progress: 0.0,
            direction: PlaybackDirection::Forward,
            springs,
            stagger,
            paired_reported: HashSet::new(),
            settled_reported: HashSet::new(),
        }
    }

    fn springs_settled(&self) -> bool {
        self.springs.values().all(SpringDriver::is_settled)
    }

    /// Whether this transition has nothing left to do.
    ///
    /// Master progress topping out is not enough on its own: spring
    /// simulations run until physically settled, decoupled from the
    /// parent duration, so a forward transition holds at progress 1.0
    /// and keeps stepping its springs until the last one comes to rest.
    fn at_terminal(&self) -> bool {
        match self.direction {
            PlaybackDirection::Forward => self.progress >= 1.0 && self.springs_settled(),
            PlaybackDirection::Reverse => self.progress <= 0.0,
        }
    }
}

/// Central coordinator for all running transitions.
#[derive(Debug, Default)]
pub struct TransitionManager {
    transitions: HashMap<TransitionId, ActiveTransition>,
    events: EventQueue,
}

impl TransitionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin running a transition; progress starts at `0.0` moving
    /// forward.
    pub fn start(&mut self, request: TransitionRequest) -> TransitionId {
        let id = TransitionId::new();
        debug!(?id, effects = request.chain.len(), "transition started");
        self.transitions.insert(id, ActiveTransition::new(id, request));
        self.events.push(TransitionEvent::Started { transition_id: id });
        id
    }

    /// Flip a transition's driving direction (e.g., a pop gesture turning
    /// a push back around). Spring drivers react per their gating rule.
    ///
    /// Unknown IDs are logged no-ops.
    pub fn set_direction(&mut self, id: TransitionId, direction: PlaybackDirection) {
        let Some(active) = self.transitions.get_mut(&id) else {
            debug!(?id, "set_direction for unknown transition ignored");
            return;
        };
        active.direction = direction;
        for driver in active.springs.values_mut() {
            driver.sync_direction(direction);
        }
    }

    /// Abort a transition before completion.
    ///
    /// All driver state is dropped: spring simulations stop and stagger
    /// polling ends, so nothing stays attached to a clock that is no
    /// longer meaningful. Unknown IDs are logged no-ops.
    pub fn cancel(&mut self, id: TransitionId) {
        let Some(mut active) = self.transitions.remove(&id) else {
            debug!(?id, "cancel for unknown transition ignored");
            return;
        };
        for driver in active.springs.values_mut() {
            driver.stop();
        }
        debug!(?id, "transition cancelled");
        self.events
            .push(TransitionEvent::Cancelled { transition_id: id });
    }

    /// Advance every running transition by `dt_ms` and produce one frame
    /// snapshot each.
    ///
    /// Also pumps the registry: stale entries are purged and pending
    /// geometry captured once per tick, which satisfies the
    /// at-least-once-per-transition purge requirement.
    pub fn tick(
        &mut self,
        dt_ms: f32,
        registry: &mut SharedElementRegistry,
        layout: &dyn LayoutHost,
        discovery: &dyn TreeDiscovery,
    ) -> Vec<TransitionFrame> {
        registry.purge_stale(layout);
        registry.capture_pending(layout);

        let mut frames = Vec::with_capacity(self.transitions.len());
        let mut finished: Vec<TransitionId> = Vec::new();

        for active in self.transitions.values_mut() {
            // Stagger discovery first: a schedule can stretch the
            // effective duration before progress advances.
            if let Some(StaggerState::Polling(scheduler)) = &mut active.stagger {
                match scheduler.poll(active.request.duration_ms, discovery, layout) {
                    DiscoveryOutcome::Pending => {}
                    DiscoveryOutcome::Scheduled(schedule) => {
                        active.effective_duration_ms =
                            active.request.duration_ms.max(schedule.total_duration_ms);
                        self.events.push(TransitionEvent::StaggerScheduled {
                            transition_id: active.id,
                            item_count: schedule.items.len(),
                            total_duration_ms: schedule.total_duration_ms,
                        });
                        active.stagger = Some(StaggerState::Scheduled(schedule));
                    }
                    DiscoveryOutcome::FellBack => {
                        self.events.push(TransitionEvent::StaggerFellBack {
                            transition_id: active.id,
                        });
                        active.stagger = Some(StaggerState::Degraded);
                    }
                }
            }

            // Master progress.
            let delta = dt_ms / active.effective_duration_ms;
            active.progress = match active.direction {
                PlaybackDirection::Forward => (active.progress + delta).min(1.0),
                PlaybackDirection::Reverse => (active.progress - delta).max(0.0),
            };
            trace!(id = ?active.id, progress = active.progress, "tick");

            // Spring drivers.
            for (&index, driver) in active.springs.iter_mut() {
                driver.sync_direction(active.direction);
                driver.step(dt_ms / 1000.0, active.progress);
                if driver.is_settled()
                    && active.direction == PlaybackDirection::Forward
                    && active.settled_reported.insert(index)
                {
                    self.events.push(TransitionEvent::SpringSettled {
                        transition_id: active.id,
                        effect_index: index,
                    });
                }
            }

            // Newly formed pairings.
            for (identity, _) in &active.request.shared_elements {
                if registry.identity_state(identity) == IdentityState::Paired
                    && !active.paired_reported.contains(identity)
                {
                    active.paired_reported.insert(identity.clone());
                    self.events.push(TransitionEvent::FlightPaired {
                        transition_id: active.id,
                        identity: identity.clone(),
                    });
                }
            }

            frames.push(build_frame(active, registry));

            if active.at_terminal() {
                finished.push(active.id);
            }
        }

        for id in finished {
            self.transitions.remove(&id);
            debug!(?id, "transition finished");
            self.events
                .push(TransitionEvent::Finished { transition_id: id });
        }

        frames
    }

    /// Drain lifecycle events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<TransitionEvent> {
        self.events.drain().collect()
    }

    pub fn progress(&self, id: TransitionId) -> Option<f32> {
        self.transitions.get(&id).map(|t| t.progress)
    }

    pub fn direction(&self, id: TransitionId) -> Option<PlaybackDirection> {
        self.transitions.get(&id).map(|t| t.direction)
    }

    pub fn is_active(&self, id: TransitionId) -> bool {
        self.transitions.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.transitions.len()
    }
}

/// Assemble the per-frame snapshot for one transition.
fn build_frame(active: &ActiveTransition, registry: &SharedElementRegistry) -> TransitionFrame {
    let springs = &active.springs;
    let spring_value = |index: usize| springs.get(&index).map(SpringDriver::value);

    let outgoing = sample_chain_with(
        &active.request.chain,
        active.progress,
        ScreenSide::Outgoing,
        spring_value,
    );
    let incoming = sample_chain_with(
        &active.request.chain,
        active.progress,
        ScreenSide::Incoming,
        spring_value,
    );

    let flights = active
        .request
        .shared_elements
        .iter()
        .filter_map(|(identity, config)| {
            let spec = registry.resolve(identity)?;
            // The flight occupies the leading sub-interval of the
            // transition and holds its end geometry afterwards.
            let window = Interval::clamped(
                0.0,
                config.flight_duration_ms / active.effective_duration_ms,
            );
            let factor = config.flight_curve.evaluate(window.local_progress(active.progress));
            let in_flight = spec.target.is_some();
            Some(FlightFrame {
                identity: identity.clone(),
                element: spec.identity_element,
                rect: spec.rect_at(factor, config),
                in_flight,
                elevated: config.use_elevation && in_flight,
            })
        })
        .collect();

    let stagger_items = match &active.stagger {
        Some(StaggerState::Scheduled(schedule)) => schedule
            .items
            .iter()
            .map(|item| StaggerItemFrame {
                element: item.element,
                bounds_at_discovery: item.bounds_at_discovery,
                ops: sample_chain_with(
                    &active.request.chain,
                    item.interval.local_progress(active.progress),
                    ScreenSide::Incoming,
                    spring_value,
                ),
            })
            .collect(),
        _ => Vec::new(),
    };

    TransitionFrame {
        transition_id: active.id,
        progress: active.progress,
        direction: active.direction,
        state: if active.at_terminal() {
            TransitionState::Finished
        } else {
            TransitionState::Running
        },
        outgoing,
        incoming,
        flights,
        stagger_items,
    }
}

// The manager crosses no threads at runtime, but staying Send keeps it
// embeddable in hosts that move their UI state between threads.
static_assertions::assert_impl_all!(TransitionManager: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::TransitionBuilder;
    use crate::effect::Effect;
    use crate::flight::SharedElementConfig;
    use crate::stagger::StaggerConfig;
    use crate::types::PageHandle;
    use passage_core::easing::EasingFunction;
    use passage_core::geometry::Offset;
    use passage_core::spring::SpringDescription;
    use std::collections::HashMap as StdHashMap;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[derive(Default)]
    struct FakeHost {
        geometry: StdHashMap<ElementHandle, Rect>,
        dead_pages: HashSet<PageHandle>,
    }

    impl LayoutHost for FakeHost {
        fn capture_geometry(&self, element: ElementHandle) -> Option<Rect> {
            self.geometry.get(&element).copied()
        }
        fn is_page_live(&self, page: PageHandle) -> bool {
            !self.dead_pages.contains(&page)
        }
    }

    struct FixedDiscovery(usize);

    impl TreeDiscovery for FixedDiscovery {
        fn find_matching(
            &self,
            _predicate: &dyn Fn(ElementHandle) -> bool,
            limit: usize,
        ) -> Vec<ElementHandle> {
            (0..self.0.min(limit))
                .map(|i| ElementHandle(100 + i as u64))
                .collect()
        }
    }

    fn linear_fade_request(duration_ms: f32) -> TransitionRequest {
        TransitionBuilder::new(duration_ms)
            .unwrap()
            .push(Effect::fade_in().with_curve(EasingFunction::Linear))
            .build()
    }

    fn tick_simple(
        manager: &mut TransitionManager,
        registry: &mut SharedElementRegistry,
        dt_ms: f32,
    ) -> Vec<TransitionFrame> {
        manager.tick(dt_ms, registry, &FakeHost::default(), &FixedDiscovery(0))
    }

    #[test]
    fn test_start_tick_finish_lifecycle() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let id = manager.start(linear_fade_request(100.0));

        assert!(manager.is_active(id));
        let events = manager.drain_events();
        assert!(matches!(events[0], TransitionEvent::Started { .. }));

        let frames = tick_simple(&mut manager, &mut registry, 50.0);
        assert_eq!(frames.len(), 1);
        assert!(approx_eq(frames[0].progress, 0.5));
        assert_eq!(frames[0].state, TransitionState::Running);

        let frames = tick_simple(&mut manager, &mut registry, 60.0);
        assert_eq!(frames[0].state, TransitionState::Finished);
        assert!(approx_eq(frames[0].progress, 1.0));
        assert!(!manager.is_active(id));
        let events = manager.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, TransitionEvent::Finished { .. }))
        );
    }

    #[test]
    fn test_frame_always_renders_both_sides() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        manager.start(linear_fade_request(100.0));

        let frames = tick_simple(&mut manager, &mut registry, 25.0);
        let frame = &frames[0];
        assert_eq!(frame.incoming.len(), 1);
        assert_eq!(frame.outgoing.len(), 1);
        let VisualOp::Fade { opacity: inc } = frame.incoming[0] else {
            panic!()
        };
        let VisualOp::Fade { opacity: out } = frame.outgoing[0] else {
            panic!()
        };
        assert!(approx_eq(inc, 0.25));
        assert!(approx_eq(out, 0.75));
    }

    #[test]
    fn test_reverse_progress_and_finish_at_zero() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let id = manager.start(linear_fade_request(100.0));

        tick_simple(&mut manager, &mut registry, 60.0);
        manager.set_direction(id, PlaybackDirection::Reverse);
        let frames = tick_simple(&mut manager, &mut registry, 30.0);
        assert!(approx_eq(frames[0].progress, 0.3));

        tick_simple(&mut manager, &mut registry, 40.0);
        assert!(!manager.is_active(id));
    }

    #[test]
    fn test_cancel_detaches_and_emits() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let id = manager.start(
            TransitionBuilder::new(300.0)
                .unwrap()
                .spring(
                    SpringDescription::default(),
                    Effect::slide_in_from(Offset::new(1.0, 0.0)),
                )
                .unwrap()
                .build(),
        );

        tick_simple(&mut manager, &mut registry, 16.0);
        manager.cancel(id);

        assert_eq!(manager.active_count(), 0);
        let events = manager.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, TransitionEvent::Cancelled { .. }))
        );

        // Cancelling again is a no-op, not a panic.
        manager.cancel(id);
        assert!(
            !manager
                .drain_events()
                .iter()
                .any(|e| matches!(e, TransitionEvent::Cancelled { .. }))
        );
    }

    #[test]
    fn test_flight_pairing_flows_into_frame() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let mut host = FakeHost::default();
        host.geometry
            .insert(ElementHandle(1), Rect::new(0.0, 0.0, 100.0, 100.0));
        host.geometry
            .insert(ElementHandle(2), Rect::new(200.0, 200.0, 50.0, 50.0));

        registry.register("hero", PageHandle(1), ElementHandle(1));
        registry.register("hero", PageHandle(2), ElementHandle(2));

        let id = manager.start(
            TransitionBuilder::new(300.0)
                .unwrap()
                .fade_in()
                .shared_element("hero", SharedElementConfig::default())
                .build(),
        );

        let frames = manager.tick(16.0, &mut registry, &host, &FixedDiscovery(0));
        let frame = &frames[0];
        assert_eq!(frame.flights.len(), 1);
        assert!(frame.flights[0].in_flight);
        assert!(frame.flights[0].elevated);

        let events = manager.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            TransitionEvent::FlightPaired { transition_id, .. } if *transition_id == id
        )));

        // Pairing reported once, not every frame.
        manager.tick(16.0, &mut registry, &host, &FixedDiscovery(0));
        assert!(
            !manager
                .drain_events()
                .iter()
                .any(|e| matches!(e, TransitionEvent::FlightPaired { .. }))
        );
    }

    #[test]
    fn test_unpaired_identity_degrades_to_static_flight() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let mut host = FakeHost::default();
        host.geometry
            .insert(ElementHandle(1), Rect::new(0.0, 0.0, 100.0, 100.0));

        registry.register("hero", PageHandle(1), ElementHandle(1));

        manager.start(
            TransitionBuilder::new(300.0)
                .unwrap()
                .fade_in()
                .shared_element("hero", SharedElementConfig::default())
                .build(),
        );

        let frames = manager.tick(16.0, &mut registry, &host, &FixedDiscovery(0));
        let frame = &frames[0];
        // Single-ended: still renders, no flight motion, no elevation.
        assert_eq!(frame.flights.len(), 1);
        assert!(!frame.flights[0].in_flight);
        assert!(!frame.flights[0].elevated);
        assert_eq!(frame.flights[0].rect, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_stagger_schedule_extends_duration() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let discovery = FixedDiscovery(5);
        let host = FakeHost::default();

        let id = manager.start(
            TransitionBuilder::new(300.0)
                .unwrap()
                .fade_in()
                .stagger(StaggerConfig::new(60.0, 400.0).unwrap(), |_| true)
                .build(),
        );

        // Two polls to stabilize the count, third frame has the schedule.
        manager.tick(10.0, &mut registry, &host, &discovery);
        manager.tick(10.0, &mut registry, &host, &discovery);
        let frames = manager.tick(10.0, &mut registry, &host, &discovery);
        assert_eq!(frames[0].stagger_items.len(), 5);

        let events = manager.drain_events();
        let scheduled = events.iter().find_map(|e| match e {
            TransitionEvent::StaggerScheduled {
                transition_id,
                item_count,
                total_duration_ms,
            } if *transition_id == id => Some((*item_count, *total_duration_ms)),
            _ => None,
        });
        let (count, total) = scheduled.expect("stagger should schedule");
        assert_eq!(count, 5);
        assert!(approx_eq(total, 640.0));

        // Effective duration grew: 10ms ticks now advance by 10/640.
        let before = manager.progress(id).unwrap();
        manager.tick(10.0, &mut registry, &host, &discovery);
        let after = manager.progress(id).unwrap();
        assert!(approx_eq(after - before, 10.0 / 640.0));
    }

    #[test]
    fn test_stagger_fallback_keeps_rendering() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let host = FakeHost::default();
        let discovery = FixedDiscovery(0);

        let config = StaggerConfig::new(60.0, 400.0)
            .unwrap()
            .with_max_attempts(2)
            .unwrap();
        manager.start(
            TransitionBuilder::new(300.0)
                .unwrap()
                .fade_in()
                .stagger(config, |_| true)
                .build(),
        );

        manager.tick(10.0, &mut registry, &host, &discovery);
        let frames = manager.tick(10.0, &mut registry, &host, &discovery);

        // No stagger items, but the parent content still renders.
        assert!(frames[0].stagger_items.is_empty());
        assert_eq!(frames[0].incoming.len(), 1);
        assert!(
            manager
                .drain_events()
                .iter()
                .any(|e| matches!(e, TransitionEvent::StaggerFellBack { .. }))
        );
    }

    #[test]
    fn test_spring_settles_and_reports_once() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let id = manager.start(
            TransitionBuilder::new(10_000.0)
                .unwrap()
                .spring(
                    SpringDescription::default(),
                    Effect::slide_in_from(Offset::new(1.0, 0.0)),
                )
                .unwrap()
                .build(),
        );

        // Step well past the spring's settling time; the parent (10s) is
        // still running, the spring being decoupled from its duration.
        for _ in 0..300 {
            tick_simple(&mut manager, &mut registry, 16.7);
        }
        assert!(manager.is_active(id));

        let settled: Vec<_> = manager
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, TransitionEvent::SpringSettled { .. }))
            .collect();
        assert_eq!(settled.len(), 1);
    }

    #[test]
    fn test_spring_outlives_short_parent_duration() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let id = manager.start(
            TransitionBuilder::new(100.0)
                .unwrap()
                .spring(
                    SpringDescription::default(),
                    Effect::slide_in_from(Offset::new(1.0, 0.0)),
                )
                .unwrap()
                .build(),
        );

        // Master progress tops out long before the spring is at rest.
        for _ in 0..10 {
            tick_simple(&mut manager, &mut registry, 16.7);
        }
        assert!(approx_eq(manager.progress(id).unwrap(), 1.0));
        assert!(
            manager.is_active(id),
            "an unsettled spring must keep the transition alive"
        );

        // Keep ticking; the element must ride the simulation all the
        // way in before the transition finishes.
        let mut last_dx = f32::MAX;
        for _ in 0..600 {
            let frames = tick_simple(&mut manager, &mut registry, 16.7);
            if let Some(frame) = frames.first() {
                let VisualOp::Slide { offset } = frame.incoming[0] else {
                    panic!()
                };
                last_dx = offset.dx;
            }
            if !manager.is_active(id) {
                break;
            }
        }
        assert!(!manager.is_active(id), "spring should settle within 10s");
        assert!(approx_eq(last_dx, 0.0));

        let events = manager.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, TransitionEvent::SpringSettled { .. }))
        );
        assert!(
            events
                .iter()
                .any(|e| matches!(e, TransitionEvent::Finished { .. }))
        );
    }

    #[test]
    fn test_spring_reversal_mirrors_progress() {
        let mut manager = TransitionManager::new();
        let mut registry = SharedElementRegistry::new();
        let id = manager.start(
            TransitionBuilder::new(1000.0)
                .unwrap()
                .spring(
                    SpringDescription::default(),
                    Effect::fade(0.0, 1.0).unwrap(),
                )
                .unwrap()
                .build(),
        );

        for _ in 0..20 {
            tick_simple(&mut manager, &mut registry, 16.7);
        }
        manager.set_direction(id, PlaybackDirection::Reverse);
        let frames = tick_simple(&mut manager, &mut registry, 16.7);

        // Reversing drives the effect straight from master progress.
        let p = manager.progress(id).unwrap();
        let VisualOp::Fade { opacity } = frames[0].incoming[0] else {
            panic!()
        };
        assert!(approx_eq(opacity, p.clamp(0.0, 1.0)));
    }
}

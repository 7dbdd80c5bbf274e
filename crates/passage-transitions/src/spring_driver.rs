//! Direction-gated spring driving for a single effect.
//!
//! A spring-driven effect swaps its eased-curve progress for the position
//! of an independent `SpringSimulation`. The simulation is gated by the
//! parent transition's direction:
//!
//! - entering **forward** (re)launches the simulation from rest over
//!   `0 → 1` with initial velocity `1.0`; it then runs on frame deltas
//!   until physically settled, decoupled from the parent's duration,
//! - entering **reverse** stops simulating and mirrors the parent's
//!   progress directly: the output reverses immediately instead of
//!   re-simulating from rest.

use crate::types::PlaybackDirection;
use passage_core::spring::{SpringDescription, SpringSimulation};

/// Initial velocity for forward launches, in full-travel units per second.
const LAUNCH_VELOCITY: f32 = 1.0;

/// Per-effect spring state owned by the running transition.
#[derive(Debug, Clone)]
pub struct SpringDriver {
    desc: SpringDescription,
    sim: Option<SpringSimulation>,
    direction: Option<PlaybackDirection>,
    value: f32,
}

impl SpringDriver {
    pub fn new(desc: SpringDescription) -> Self {
        Self {
            desc,
            sim: None,
            direction: None,
            value: 0.0,
        }
    }

    /// Track the parent's direction, (re)launching or abandoning the
    /// simulation on change.
    pub fn sync_direction(&mut self, direction: PlaybackDirection) {
        if self.direction == Some(direction) {
            return;
        }
        self.direction = Some(direction);
        match direction {
            PlaybackDirection::Forward => {
                self.sim = Some(SpringSimulation::launch(self.desc, LAUNCH_VELOCITY));
            }
            PlaybackDirection::Reverse => {
                // No re-simulation on reverse; output follows the parent.
                self.sim = None;
            }
        }
    }

    /// Advance by `dt` seconds and return the current drive value.
    ///
    /// `parent_progress` is the master progress, used directly while
    /// reversing.
    pub fn step(&mut self, dt_s: f32, parent_progress: f32) -> f32 {
        self.value = match (&mut self.sim, self.direction) {
            (Some(sim), Some(PlaybackDirection::Forward)) => sim.step(dt_s),
            _ => parent_progress,
        };
        self.value
    }

    /// Current drive value without stepping.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Whether the forward simulation has physically settled. Always true
    /// while reversing (there is nothing left to simulate).
    pub fn is_settled(&self) -> bool {
        match &self.sim {
            Some(sim) => sim.is_settled(),
            None => true,
        }
    }

    /// Abandon any in-flight simulation; used on transition cancellation
    /// so no stepping outlives the parent clock.
    pub fn stop(&mut self) {
        self.sim = None;
    }
}

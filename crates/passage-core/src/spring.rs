//! Spring physics for progress driving.
//!
//! A spring simulation replaces a fixed-duration eased curve with a damped
//! harmonic oscillator: `m·x'' + c·x' + k·(x - target) = 0`. The simulation
//! owns its own `position`/`velocity` state and is stepped with the frame
//! delta, independent of any parent animation's duration; it runs until it
//! physically settles.
//!
//! Damping behavior falls out of the damping ratio `ζ = c / (2√(k·m))`:
//! under-damped springs (`ζ < 1`) overshoot and ring, critically damped
//! springs (`ζ = 1`) settle as fast as possible without overshoot, and
//! over-damped springs (`ζ > 1`) creep in slowly.

use serde::{Deserialize, Serialize};

/// How close position must be to the target to count as settled.
const POSITION_THRESHOLD: f32 = 0.001;

/// How slow the spring must be moving to count as settled.
const VELOCITY_THRESHOLD: f32 = 0.001;

/// Integration substep length in seconds. Frame deltas are subdivided so a
/// dropped frame cannot destabilize the integrator.
const SUBSTEP: f32 = 1.0 / 240.0;

/// Qualitative damping behavior derived from the damping ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DampingClass {
    /// ζ < 1: overshoots the target and oscillates while decaying.
    Underdamped,
    /// ζ ≈ 1: fastest approach with no overshoot.
    CriticallyDamped,
    /// ζ > 1: approaches the target slowly with no overshoot.
    Overdamped,
}

/// Physical parameters of a spring.
///
/// All three values must be positive; the transition builder rejects
/// non-positive parameters at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringDescription {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringDescription {
    /// A gently under-damped spring suitable for screen-scale motion.
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 180.0,
            damping: 20.0,
        }
    }
}

impl SpringDescription {
    pub fn new(mass: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            mass,
            stiffness,
            damping,
        }
    }

    /// A critically damped spring settling in roughly `duration_s` seconds.
    ///
    /// For a critically damped spring to reach within 1% of the target at
    /// time T, the natural frequency is about `6.6 / T`; stiffness follows
    /// from `k = ω₀²·m` and damping from `c = 2√(k·m)`.
    pub fn critically_damped(duration_s: f32) -> Self {
        let omega_0 = 6.6 / duration_s.max(0.01);
        let mass = 1.0;
        let stiffness = omega_0 * omega_0 * mass;
        Self {
            mass,
            stiffness,
            damping: 2.0 * (stiffness * mass).sqrt(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.mass > 0.0 && self.stiffness > 0.0 && self.damping > 0.0
    }

    /// The damping ratio ζ = c / (2√(k·m)).
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Classify the spring's qualitative behavior.
    pub fn damping_class(&self) -> DampingClass {
        let zeta = self.damping_ratio();
        if (zeta - 1.0).abs() < 1e-3 {
            DampingClass::CriticallyDamped
        } else if zeta < 1.0 {
            DampingClass::Underdamped
        } else {
            DampingClass::Overdamped
        }
    }
}

/// A running spring simulation over `[0, 1]`.
///
/// Stepped with semi-implicit Euler integration. Position may transiently
/// leave `[0, 1]` for under-damped springs; consumers clamp bounded
/// channels the same way they do for overshooting curves.
#[derive(Debug, Clone)]
pub struct SpringSimulation {
    desc: SpringDescription,
    target: f32,
    position: f32,
    velocity: f32,
    settled: bool,
}

impl SpringSimulation {
    /// Start a simulation from `0.0` toward `1.0` with the given initial
    /// velocity (in units of full travel per second).
    pub fn launch(desc: SpringDescription, initial_velocity: f32) -> Self {
        Self {
            desc,
            target: 1.0,
            position: 0.0,
            velocity: initial_velocity,
            settled: false,
        }
    }

    /// Restart the simulation from rest at `0.0` with the given velocity.
    pub fn reset(&mut self, initial_velocity: f32) {
        self.position = 0.0;
        self.velocity = initial_velocity;
        self.settled = false;
    }

    /// Advance the simulation by `dt` seconds, returning the new position.
    ///
    /// Once settled the position snaps to the target and further stepping
    /// is a no-op.
    pub fn step(&mut self, dt: f32) -> f32 {
        if self.settled || dt <= 0.0 {
            return self.position;
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP);
            remaining -= h;

            let displacement = self.position - self.target;
            let accel = (-self.desc.stiffness * displacement
                - self.desc.damping * self.velocity)
                / self.desc.mass;
            self.velocity += accel * h;
            self.position += self.velocity * h;

            if (self.position - self.target).abs() < POSITION_THRESHOLD
                && self.velocity.abs() < VELOCITY_THRESHOLD
            {
                self.position = self.target;
                self.velocity = 0.0;
                self.settled = true;
                break;
            }
        }

        self.position
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_rest(sim: &mut SpringSimulation, max_seconds: f32) -> f32 {
        let mut elapsed = 0.0;
        while !sim.is_settled() && elapsed < max_seconds {
            sim.step(1.0 / 60.0);
            elapsed += 1.0 / 60.0;
        }
        sim.position()
    }

    #[test]
    fn test_damping_classification() {
        let under = SpringDescription::new(1.0, 100.0, 5.0);
        assert_eq!(under.damping_class(), DampingClass::Underdamped);

        let critical = SpringDescription::new(1.0, 100.0, 20.0);
        assert_eq!(critical.damping_class(), DampingClass::CriticallyDamped);

        let over = SpringDescription::new(1.0, 100.0, 40.0);
        assert_eq!(over.damping_class(), DampingClass::Overdamped);
    }

    #[test]
    fn test_settles_at_target() {
        let mut sim = SpringSimulation::launch(SpringDescription::default(), 1.0);
        let final_pos = run_to_rest(&mut sim, 10.0);
        assert!(sim.is_settled(), "spring should settle within 10s");
        assert!((final_pos - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_underdamped_overshoots() {
        let desc = SpringDescription::new(1.0, 300.0, 5.0);
        let mut sim = SpringSimulation::launch(desc, 1.0);

        let mut peak = 0.0_f32;
        for _ in 0..600 {
            peak = peak.max(sim.step(1.0 / 60.0));
            if sim.is_settled() {
                break;
            }
        }
        assert!(peak > 1.0, "under-damped spring must overshoot, peak {}", peak);
    }

    #[test]
    fn test_critically_damped_never_overshoots() {
        let desc = SpringDescription::critically_damped(0.3);
        let mut sim = SpringSimulation::launch(desc, 0.0);

        for _ in 0..600 {
            let pos = sim.step(1.0 / 60.0);
            assert!(pos <= 1.0 + 1e-3, "critically damped must not overshoot");
            if sim.is_settled() {
                break;
            }
        }
        assert!(sim.is_settled());
    }

    #[test]
    fn test_settled_step_is_noop() {
        let mut sim = SpringSimulation::launch(SpringDescription::default(), 1.0);
        run_to_rest(&mut sim, 10.0);
        let before = sim.position();
        sim.step(1.0);
        assert_eq!(sim.position(), before);
    }

    #[test]
    fn test_reset_restarts_from_zero() {
        let mut sim = SpringSimulation::launch(SpringDescription::default(), 1.0);
        run_to_rest(&mut sim, 10.0);
        sim.reset(1.0);
        assert!(!sim.is_settled());
        assert_eq!(sim.position(), 0.0);
    }

    #[test]
    fn test_description_serde_round_trip() {
        let desc = SpringDescription::new(2.0, 120.0, 14.0);
        let json = serde_json::to_string(&desc).unwrap();
        let back: SpringDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }

    #[test]
    fn test_validity() {
        assert!(SpringDescription::default().is_valid());
        assert!(!SpringDescription::new(0.0, 100.0, 10.0).is_valid());
        assert!(!SpringDescription::new(1.0, -1.0, 10.0).is_valid());
    }
}

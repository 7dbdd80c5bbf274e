//! Easing curves for transition timing.
//!
//! A curve maps linear progress in `[0, 1]` to an eased output value. The
//! CSS set (`linear`, `ease`, `ease-in`, …) stays within `[0, 1]`, but the
//! overshooting curves (`ElasticOut`, `BackOut`) intentionally exceed it:
//! they are what give flights and scale effects their snap. Consumers that
//! feed curve output into bounded channels (opacity, blur sigma, blend
//! fractions) must clamp the result; see the compositor in
//! `passage-transitions`.
//!
//! # Usage
//!
//! ```
//! use passage_core::easing::EasingFunction;
//!
//! let ease = EasingFunction::EaseOut;
//! let progress = ease.evaluate(0.5);
//!
//! let springy = EasingFunction::ElasticOut { period: 0.4 };
//! assert!(springy.evaluate(0.2) > 1.0); // overshoots
//! ```

use serde::{Deserialize, Serialize};

/// Position of the jump for stepped curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval.
    Start,
    /// Jump at the end of each interval.
    End,
}

impl Default for StepPosition {
    fn default() -> Self {
        Self::End
    }
}

/// An easing curve: an opaque function from `[0, 1]` progress to an eased
/// output value.
///
/// Output is *not* guaranteed to stay in `[0, 1]`: custom beziers with `y`
/// control points outside that range, `ElasticOut`, and `BackOut` all
/// overshoot by design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing.
    Linear,

    /// CSS `ease`: `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,

    /// CSS `ease-in`: `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// CSS `ease-out`: `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// CSS `ease-in-out`: `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier. `x` control points must lie in `[0, 1]`;
    /// `y` control points may be anything (values outside `[0, 1]`
    /// produce overshoot).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },

    /// Discrete jumps; `count` intervals.
    Steps { count: u32, position: StepPosition },

    /// Exponentially decaying sine wave that overshoots the target and
    /// rings down. `period` controls oscillation frequency (CSS-less,
    /// a typical value is `0.4`).
    ElasticOut { period: f32 },

    /// Decelerating curve that overshoots once before settling.
    /// `overshoot` controls how far past the target it travels
    /// (`1.70158` gives roughly 10% overshoot).
    BackOut { overshoot: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Ease
    }
}

impl EasingFunction {
    /// Evaluate the curve at progress `t`.
    ///
    /// Input is clamped to `[0, 1]`; output may exceed that range for
    /// overshooting variants.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
            Self::Steps { count, position } => stepped(*count, *position, t),
            Self::ElasticOut { period } => elastic_out(*period, t),
            Self::BackOut { overshoot } => back_out(*overshoot, t),
        }
    }

    /// Create a custom cubic bezier curve.
    ///
    /// # Panics
    /// Panics if `x1` or `x2` are outside `[0, 1]`.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Create a stepped curve.
    ///
    /// # Panics
    /// Panics if `count` is 0.
    pub fn steps(count: u32, position: StepPosition) -> Self {
        assert!(count >= 1, "Steps must be at least 1");
        Self::Steps { count, position }
    }

    /// Whether this curve can produce output outside `[0, 1]`.
    ///
    /// Used by tests and diagnostics; the compositor clamps bounded
    /// channels unconditionally rather than trusting this.
    pub fn may_overshoot(&self) -> bool {
        match self {
            Self::ElasticOut { .. } | Self::BackOut { .. } => true,
            Self::CubicBezier { y1, y2, .. } => {
                !(0.0..=1.0).contains(y1) || !(0.0..=1.0).contains(y2)
            }
            _ => false,
        }
    }
}

/// Evaluate a cubic bezier timing curve at `progress`.
///
/// Finds the bezier parameter whose x coordinate matches the input progress
/// via Newton-Raphson iteration, then evaluates the y coordinate there.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_parameter(x1, x2, progress);
    bezier_axis(y1, y2, t)
}

/// Solve for the bezier parameter t with x(t) == target_x.
fn solve_bezier_parameter(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;

    for _ in 0..8 {
        let err = bezier_axis(x1, x2, t) - target_x;
        if err.abs() < 1e-6 {
            break;
        }
        let slope = bezier_axis_derivative(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - err / slope).clamp(0.0, 1.0);
    }

    t
}

/// One-dimensional cubic bezier with endpoints pinned at 0 and 1:
/// `b(t) = 3(1-t)²t·c1 + 3(1-t)t²·c2 + t³`
#[inline]
fn bezier_axis(c1: f32, c2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * c1 + 3.0 * mt * t * t * c2 + t * t * t
}

/// Derivative of `bezier_axis` with respect to t.
#[inline]
fn bezier_axis_derivative(c1: f32, c2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * c1 + 6.0 * mt * t * (c2 - c1) + 3.0 * t * t * (1.0 - c2)
}

/// Evaluate a stepped curve.
fn stepped(count: u32, position: StepPosition, t: f32) -> f32 {
    if count == 0 {
        return t;
    }
    let steps = count as f32;
    match position {
        StepPosition::Start => ((t * steps).ceil() / steps).min(1.0),
        StepPosition::End => ((t * steps).floor() / steps).min(1.0),
    }
}

/// Exponentially damped sine that rings around 1.0.
///
/// `e(t) = 2^(-10t) · sin((t - p/4) · 2π/p) + 1`
fn elastic_out(period: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let p = period.max(0.05);
    let s = p / 4.0;
    (2.0_f32).powf(-10.0 * t) * ((t - s) * std::f32::consts::TAU / p).sin() + 1.0
}

/// Decelerating cubic that overshoots once:
/// `e(t) = 1 + (s+1)(t-1)³ + s(t-1)²` with `s = overshoot`.
fn back_out(overshoot: f32, t: f32) -> f32 {
    let s = overshoot;
    let u = t - 1.0;
    1.0 + (s + 1.0) * u * u * u + s * u * u
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_linear() {
        let ease = EasingFunction::Linear;
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_css_curves_hit_boundaries() {
        for ease in [
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ] {
            assert!(approx_eq(ease.evaluate(0.0), 0.0));
            assert!(approx_eq(ease.evaluate(1.0), 1.0));
        }
    }

    #[test]
    fn test_ease_in_out_symmetry() {
        let ease = EasingFunction::EaseInOut;
        let early = ease.evaluate(0.25);
        let late = ease.evaluate(0.75);
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(early + late, 1.0));
    }

    #[test]
    fn test_monotonic_css_curve() {
        let ease = EasingFunction::Ease;
        let mut last = 0.0;
        for i in 0..=20 {
            let v = ease.evaluate(i as f32 / 20.0);
            assert!(v >= last - EPSILON, "ease must be non-decreasing");
            last = v;
        }
    }

    #[test]
    fn test_steps_end() {
        let ease = EasingFunction::steps(4, StepPosition::End);
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.24), 0.0));
        assert!(approx_eq(ease.evaluate(0.25), 0.25));
        assert!(approx_eq(ease.evaluate(0.99), 0.75));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_steps_start() {
        let ease = EasingFunction::steps(4, StepPosition::Start);
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.01), 0.25));
        assert!(approx_eq(ease.evaluate(0.76), 1.0));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_elastic_overshoots() {
        let ease = EasingFunction::ElasticOut { period: 0.4 };
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));

        let peak = (0..100)
            .map(|i| ease.evaluate(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "elastic-out must exceed 1.0, peak was {}", peak);
    }

    #[test]
    fn test_back_out_overshoots() {
        let ease = EasingFunction::BackOut { overshoot: 1.70158 };
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));

        let peak = (0..100)
            .map(|i| ease.evaluate(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.05, "back-out must overshoot, peak was {}", peak);
    }

    #[test]
    fn test_may_overshoot() {
        assert!(EasingFunction::ElasticOut { period: 0.4 }.may_overshoot());
        assert!(EasingFunction::BackOut { overshoot: 1.7 }.may_overshoot());
        assert!(!EasingFunction::Ease.may_overshoot());
        assert!(
            EasingFunction::CubicBezier {
                x1: 0.3,
                y1: -0.5,
                x2: 0.7,
                y2: 1.5
            }
            .may_overshoot()
        );
    }

    #[test]
    fn test_input_clamping() {
        let ease = EasingFunction::Ease;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
    }

    #[test]
    fn test_serde_round_trip() {
        for ease in [
            EasingFunction::Linear,
            EasingFunction::EaseInOut,
            EasingFunction::cubic_bezier(0.3, -0.5, 0.7, 1.5),
            EasingFunction::steps(4, StepPosition::Start),
            EasingFunction::ElasticOut { period: 0.4 },
            EasingFunction::BackOut { overshoot: 1.70158 },
        ] {
            let json = serde_json::to_string(&ease).unwrap();
            let back: EasingFunction = serde_json::from_str(&json).unwrap();
            assert_eq!(back, ease);
        }
    }

    #[test]
    #[should_panic(expected = "Bezier x values must be in [0, 1]")]
    fn test_invalid_bezier_x() {
        EasingFunction::cubic_bezier(-0.1, 0.0, 0.5, 1.0);
    }

    #[test]
    #[should_panic(expected = "Steps must be at least 1")]
    fn test_invalid_steps() {
        EasingFunction::steps(0, StepPosition::End);
    }
}

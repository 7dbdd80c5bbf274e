//! The effect model: time-windowed, curved visual transformations.
//!
//! An `Effect` is a pure value: which visual channel it drives
//! (`EffectKind`), the sub-interval of the master progress it is active in
//! (`Interval`), and what drives its local progress (`ProgressDriver`, an
//! easing curve or a spring simulation).
//!
//! Effects are immutable once created; `with_*` helpers produce modified
//! copies. Malformed parameters are rejected at construction with
//! `TransitionError`, never coerced.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransitionError};
use passage_core::easing::EasingFunction;
use passage_core::geometry::Offset;
use passage_core::spring::SpringDescription;

/// The sub-interval of master progress `[0, 1]` an effect is active in.
///
/// Outside the interval the effect's output clamps to the boundary value;
/// there is no extrapolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    start: f32,
    end: f32,
}

impl Interval {
    /// The whole transition: `[0, 1]`.
    pub const FULL: Self = Self {
        start: 0.0,
        end: 1.0,
    };

    /// Create a validated interval. `start` and `end` must satisfy
    /// `0 <= start <= end <= 1`.
    pub fn new(start: f32, end: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) || start > end {
            return Err(TransitionError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build an interval from computed values, ordering and clamping them
    /// into `[0, 1]`.
    ///
    /// For *derived* timing only (e.g., stagger sub-intervals, flight
    /// windows), where clamping is the documented behavior. User-supplied
    /// intervals go through [`Interval::new`] and error instead.
    pub fn clamped(start: f32, end: f32) -> Self {
        let start = start.clamp(0.0, 1.0);
        let end = end.clamp(0.0, 1.0);
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    /// Remap master progress into this interval's local progress.
    ///
    /// Returns `clamp((p - start) / (end - start), 0, 1)`. A degenerate
    /// interval (`end == start`) is a step: `0` before `start`, `1` at or
    /// after it.
    pub fn local_progress(&self, p: f32) -> f32 {
        if self.end > self.start {
            ((p - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
        } else if p < self.start {
            0.0
        } else {
            1.0
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::FULL
    }
}

/// What converts local progress into the effect's drive factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "driver", rename_all = "snake_case")]
pub enum ProgressDriver {
    /// A fixed easing curve over the effect's interval.
    Curve(EasingFunction),
    /// An independent spring simulation; runs until physically settled,
    /// decoupled from the parent duration. See `spring_driver`.
    Spring(SpringDescription),
}

impl Default for ProgressDriver {
    fn default() -> Self {
        Self::Curve(EasingFunction::default())
    }
}

/// The visual channel an effect drives, with its endpoint parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    /// Opacity, endpoints in `[0, 1]`.
    Fade { from: f32, to: f32 },
    /// Translation, typically in screen fractions.
    Slide { from: Offset, to: Offset },
    /// Uniform scale, endpoints `>= 0`.
    Scale { from: f32, to: f32 },
    /// Rotation in turns (1.0 = full revolution).
    Rotate { from_turns: f32, to_turns: f32 },
    /// Gaussian blur sigma, endpoints `>= 0`.
    Blur { from_sigma: f32, to_sigma: f32 },
    /// Revealed fraction of a clip region, endpoints in `[0, 1]`.
    Clip { from: f32, to: f32 },
    /// Translation at a fraction of the main motion, for depth cues.
    /// The drive factor scales `offset` by `factor`.
    Parallax { offset: Offset, factor: f32 },
    /// Blend toward a wash color; mix endpoints in `[0, 1]`.
    Tint {
        color: [f32; 4],
        from_mix: f32,
        to_mix: f32,
    },
}

/// A time-windowed, driven visual transformation.
///
/// Created through the checked constructors below (or the
/// `TransitionBuilder` sugar); immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub interval: Interval,
    pub driver: ProgressDriver,
}

impl Effect {
    /// Create an effect over the full transition with the default curve,
    /// validating the kind's parameters.
    pub fn new(kind: EffectKind) -> Result<Self> {
        validate_kind(&kind)?;
        Ok(Self {
            kind,
            interval: Interval::FULL,
            driver: ProgressDriver::default(),
        })
    }

    /// Fade between two opacities.
    pub fn fade(from: f32, to: f32) -> Result<Self> {
        Self::new(EffectKind::Fade { from, to })
    }

    /// Fade from fully transparent to fully opaque.
    pub fn fade_in() -> Self {
        Self {
            kind: EffectKind::Fade { from: 0.0, to: 1.0 },
            interval: Interval::FULL,
            driver: ProgressDriver::default(),
        }
    }

    /// Fade from fully opaque to fully transparent.
    pub fn fade_out() -> Self {
        Self {
            kind: EffectKind::Fade { from: 1.0, to: 0.0 },
            interval: Interval::FULL,
            driver: ProgressDriver::default(),
        }
    }

    /// Slide between two offsets.
    pub fn slide(from: Offset, to: Offset) -> Result<Self> {
        Self::new(EffectKind::Slide { from, to })
    }

    /// Slide in from `from`, settling at rest.
    pub fn slide_in_from(from: Offset) -> Self {
        Self {
            kind: EffectKind::Slide {
                from,
                to: Offset::ZERO,
            },
            interval: Interval::FULL,
            driver: ProgressDriver::default(),
        }
    }

    /// Scale between two factors.
    pub fn scale(from: f32, to: f32) -> Result<Self> {
        Self::new(EffectKind::Scale { from, to })
    }

    /// Rotate between two angles, in turns.
    pub fn rotate(from_turns: f32, to_turns: f32) -> Result<Self> {
        Self::new(EffectKind::Rotate {
            from_turns,
            to_turns,
        })
    }

    /// Blur between two sigmas.
    pub fn blur(from_sigma: f32, to_sigma: f32) -> Result<Self> {
        Self::new(EffectKind::Blur {
            from_sigma,
            to_sigma,
        })
    }

    /// Reveal between two clip fractions.
    pub fn clip(from: f32, to: f32) -> Result<Self> {
        Self::new(EffectKind::Clip { from, to })
    }

    /// Parallax translation at `factor` of the main motion.
    pub fn parallax(offset: Offset, factor: f32) -> Result<Self> {
        Self::new(EffectKind::Parallax { offset, factor })
    }

    /// Color wash between two mix fractions.
    pub fn tint(color: [f32; 4], from_mix: f32, to_mix: f32) -> Result<Self> {
        Self::new(EffectKind::Tint {
            color,
            from_mix,
            to_mix,
        })
    }

    /// Copy with a different active interval.
    pub fn with_interval(self, interval: Interval) -> Self {
        Self { interval, ..self }
    }

    /// Copy with a different easing curve.
    pub fn with_curve(self, curve: EasingFunction) -> Self {
        Self {
            driver: ProgressDriver::Curve(curve),
            ..self
        }
    }

    /// Copy driven by a spring simulation instead of a curve.
    pub fn with_spring(self, spring: SpringDescription) -> Result<Self> {
        if !spring.is_valid() {
            return Err(TransitionError::InvalidSpring {
                mass: spring.mass,
                stiffness: spring.stiffness,
                damping: spring.damping,
            });
        }
        Ok(Self {
            driver: ProgressDriver::Spring(spring),
            ..self
        })
    }

    /// Whether this effect is driven by a spring simulation.
    pub fn is_spring_driven(&self) -> bool {
        matches!(self.driver, ProgressDriver::Spring(_))
    }
}

fn validate_kind(kind: &EffectKind) -> Result<()> {
    match *kind {
        EffectKind::Fade { from, to } => {
            for v in [from, to] {
                if !(0.0..=1.0).contains(&v) {
                    return Err(TransitionError::InvalidOpacity(v));
                }
            }
        }
        EffectKind::Scale { from, to } => {
            for v in [from, to] {
                if v < 0.0 {
                    return Err(TransitionError::InvalidScale(v));
                }
            }
        }
        EffectKind::Blur {
            from_sigma,
            to_sigma,
        } => {
            for v in [from_sigma, to_sigma] {
                if v < 0.0 {
                    return Err(TransitionError::InvalidBlurSigma(v));
                }
            }
        }
        EffectKind::Clip { from, to } => {
            for v in [from, to] {
                if !(0.0..=1.0).contains(&v) {
                    return Err(TransitionError::InvalidClipFraction(v));
                }
            }
        }
        EffectKind::Tint {
            from_mix, to_mix, ..
        } => {
            for v in [from_mix, to_mix] {
                if !(0.0..=1.0).contains(&v) {
                    return Err(TransitionError::InvalidTintMix(v));
                }
            }
        }
        EffectKind::Slide { .. } | EffectKind::Rotate { .. } | EffectKind::Parallax { .. } => {}
    }
    Ok(())
}

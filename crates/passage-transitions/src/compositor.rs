//! The interval compositor: from one master progress value to a stacked
//! visual state.
//!
//! Each effect remaps master progress into its own interval, applies its
//! driver (curve or externally supplied spring value), and contributes one
//! `VisualOp`. Ops are emitted in declaration order; the host applies them
//! innermost-first so each effect wraps the previous result. Effects are
//! stacked, never blended with each other.
//!
//! # Curve safety
//!
//! Several curves intentionally overshoot (`ElasticOut`, `BackOut`, custom
//! beziers). An unclamped elastic curve can drive opacity or a blend
//! fraction outside `[0, 1]`, which is invalid state for anything that is
//! not a pure rendering transform, so every bounded channel is clamped
//! here, unconditionally. Transform channels (offsets, rotation) pass the
//! overshoot through; that is what makes those curves useful.

use serde::{Deserialize, Serialize};

use crate::chain::EffectChain;
use crate::effect::{Effect, EffectKind, ProgressDriver};
use crate::types::ScreenSide;
use passage_core::geometry::{Offset, lerp};
use passage_core::interpolate::Interpolate;

/// One effect's resolved contribution for a frame.
///
/// Values are clamped to each channel's legal range; the host can consume
/// them without re-validating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum VisualOp {
    /// Opacity in `[0, 1]`.
    Fade { opacity: f32 },
    /// Translation; unbounded.
    Slide { offset: Offset },
    /// Uniform scale, `>= 0`.
    Scale { factor: f32 },
    /// Rotation in turns; unbounded.
    Rotate { turns: f32 },
    /// Blur sigma, `>= 0`.
    Blur { sigma: f32 },
    /// Revealed clip fraction in `[0, 1]`.
    Clip { fraction: f32 },
    /// Parallax translation; unbounded.
    Parallax { offset: Offset },
    /// Color wash with mix in `[0, 1]`.
    Tint { color: [f32; 4], mix: f32 },
}

/// Resolve an effect kind at drive factor `t` for one screen side.
///
/// `t` is the final driving value (eased local progress or spring
/// position) and may lie outside `[0, 1]`. Positional kinds are negated
/// for the outgoing side so the two screens move apart rather than
/// together.
pub fn sample_kind(kind: &EffectKind, t: f32, side: ScreenSide) -> VisualOp {
    let outgoing = side == ScreenSide::Outgoing;
    match *kind {
        EffectKind::Fade { from, to } => VisualOp::Fade {
            opacity: lerp(from, to, t).clamp(0.0, 1.0),
        },
        EffectKind::Slide { from, to } => {
            let offset = from.interpolate(&to, t);
            VisualOp::Slide {
                offset: if outgoing { offset.scaled(-1.0) } else { offset },
            }
        }
        EffectKind::Scale { from, to } => VisualOp::Scale {
            factor: lerp(from, to, t).max(0.0),
        },
        EffectKind::Rotate {
            from_turns,
            to_turns,
        } => VisualOp::Rotate {
            turns: lerp(from_turns, to_turns, t),
        },
        EffectKind::Blur {
            from_sigma,
            to_sigma,
        } => VisualOp::Blur {
            sigma: lerp(from_sigma, to_sigma, t).max(0.0),
        },
        EffectKind::Clip { from, to } => VisualOp::Clip {
            fraction: lerp(from, to, t).clamp(0.0, 1.0),
        },
        EffectKind::Parallax { offset, factor } => {
            let scaled = offset.scaled(factor * t);
            VisualOp::Parallax {
                offset: if outgoing { scaled.scaled(-1.0) } else { scaled },
            }
        }
        EffectKind::Tint {
            color,
            from_mix,
            to_mix,
        } => VisualOp::Tint {
            color,
            mix: lerp(from_mix, to_mix, t).clamp(0.0, 1.0),
        },
    }
}

/// Compute a curve-driven effect's drive factor at master progress `p`.
///
/// Spring-driven effects have no meaningful factor here; the manager
/// supplies their simulation position instead.
pub fn drive_factor(effect: &Effect, p: f32) -> f32 {
    let local = effect.interval.local_progress(p);
    match effect.driver {
        ProgressDriver::Curve(curve) => curve.evaluate(local),
        // Fall back to the raw local progress when sampled without a
        // running simulation (e.g., standalone chain preview).
        ProgressDriver::Spring(_) => local,
    }
}

/// Sample one effect at master progress `p` for a screen side.
///
/// The outgoing side sees mirrored progress (`1 − p`): as the incoming
/// page settles in, the outgoing page plays the same effects out.
pub fn sample_effect(effect: &Effect, p: f32, side: ScreenSide) -> VisualOp {
    let p = side_progress(p, side);
    sample_kind(&effect.kind, drive_factor(effect, p), side)
}

/// Sample a whole chain, in declaration order.
pub fn sample_chain(chain: &EffectChain, p: f32, side: ScreenSide) -> Vec<VisualOp> {
    sample_chain_with(chain, p, side, |_| None)
}

/// Sample a chain with externally driven spring values.
///
/// `spring_value(index)` returns the simulation position for the effect at
/// `index` when it is spring-driven and its simulation is running; `None`
/// falls back to curve/local-progress driving. Spring positions get the
/// same side treatment as progress: the outgoing side sees the mirrored
/// value `1 - position`.
pub fn sample_chain_with(
    chain: &EffectChain,
    p: f32,
    side: ScreenSide,
    spring_value: impl Fn(usize) -> Option<f32>,
) -> Vec<VisualOp> {
    let p = side_progress(p, side);
    chain
        .iter()
        .enumerate()
        .map(|(index, effect)| {
            let t = match spring_value(index) {
                Some(position) if effect.is_spring_driven() => side_progress(position, side),
                _ => drive_factor(effect, p),
            };
            sample_kind(&effect.kind, t, side)
        })
        .collect()
}

#[inline]
fn side_progress(p: f32, side: ScreenSide) -> f32 {
    match side {
        ScreenSide::Incoming => p,
        ScreenSide::Outgoing => 1.0 - p,
    }
}

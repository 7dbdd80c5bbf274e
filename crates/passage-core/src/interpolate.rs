//! Interpolation for blendable values.
//!
//! `Interpolate` is the seam between eased progress and concrete visual
//! values: the compositor computes an eased factor and asks the value type
//! to blend itself toward a target.

use crate::geometry::{Offset, Point, Rect, Size, lerp};

/// Trait for types that can be interpolated between two values.
///
/// When `t = 0.0`, returns `self`; when `t = 1.0`, returns `to`. Values of
/// `t` outside `[0, 1]` extrapolate linearly; overshooting curves rely on
/// this for transform channels.
pub trait Interpolate: Sized {
    /// Interpolate from `self` toward `to` at factor `t`.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Size {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Offset {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Rect {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for [f32; 4] {
    /// Per-component RGBA interpolation in linear space.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        [
            lerp(self[0], to[0], t),
            lerp(self[1], to[1], t),
            lerp(self[2], to[2], t),
            lerp(self[3], to[3], t),
        ]
    }
}

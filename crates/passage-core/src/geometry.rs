//! Geometry types for transition composition.
//!
//! These are plain value types: absolute on-screen rectangles captured from
//! the host's layout pass, and relative offsets used by slide/parallax
//! effects. All interpolation here is linear; easing is applied to the
//! progress value before it reaches geometry.

use serde::{Deserialize, Serialize};

/// A point in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between two points.
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
        }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Linear interpolation between two sizes.
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
        }
    }
}

/// An axis-aligned rectangle in absolute screen coordinates.
///
/// Rectangles are what the shared-element registry captures from the host
/// after layout and what flight animations interpolate between.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Linear interpolation of both origin and size.
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            origin: self.origin.lerp(&to.origin, t),
            size: self.size.lerp(&to.size, t),
        }
    }

    /// Translate the rectangle by an offset, keeping its size.
    pub fn translated(&self, offset: Offset) -> Self {
        Self {
            origin: Point::new(self.origin.x + offset.dx, self.origin.y + offset.dy),
            size: self.size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }
}

/// A relative 2D displacement, used by slide and parallax effects.
///
/// Slide effects commonly express the offset in screen fractions
/// (e.g. `Offset::new(1.0, 0.0)` is "one full screen to the right"); the
/// host scales fractions to pixels when painting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Linear interpolation between two offsets.
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            dx: lerp(self.dx, to.dx, t),
            dy: lerp(self.dy, to.dy, t),
        }
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }
}

/// Linear interpolation helper for f32 values.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_rect_lerp_endpoints() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(200.0, 100.0, 40.0, 40.0);

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);

        let mid = a.lerp(&b, 0.5);
        assert!(approx_eq(mid.origin.x, 100.0));
        assert!(approx_eq(mid.origin.y, 50.0));
        assert!(approx_eq(mid.size.width, 70.0));
        assert!(approx_eq(mid.size.height, 45.0));
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 60.0);
        let c = r.center();
        assert!(approx_eq(c.x, 60.0));
        assert!(approx_eq(c.y, 50.0));
    }

    #[test]
    fn test_rect_translated_keeps_size() {
        let r = Rect::new(10.0, 20.0, 100.0, 60.0);
        let moved = r.translated(Offset::new(5.0, -5.0));
        assert!(approx_eq(moved.origin.x, 15.0));
        assert!(approx_eq(moved.origin.y, 15.0));
        assert_eq!(moved.size, r.size);
    }

    #[test]
    fn test_offset_scaled() {
        let o = Offset::new(1.0, -0.5).scaled(2.0);
        assert!(approx_eq(o.dx, 2.0));
        assert!(approx_eq(o.dy, -1.0));
    }

    #[test]
    fn test_empty_rect() {
        assert!(Rect::ZERO.is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}

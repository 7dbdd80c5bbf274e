//! Host-agnostic primitives for the Passage transition layer.
//!
//! This crate has no knowledge of pages, widgets, or rendering. It provides:
//! - **Geometry**: points, sizes, rectangles, and offsets with lerp support
//! - **Easing**: CSS-compatible timing functions plus overshooting curves
//! - **Interpolation**: the `Interpolate` trait for blendable values
//! - **Spring physics**: a stepped damped-harmonic-oscillator simulation
//!
//! The transition layer (`passage-transitions`) builds its effect model,
//! registry, and scheduling on top of these types.

pub mod easing;
pub mod geometry;
pub mod interpolate;
pub mod spring;

pub use easing::{EasingFunction, StepPosition};
pub use geometry::{Offset, Point, Rect, Size};
pub use interpolate::Interpolate;
pub use spring::{DampingClass, SpringDescription, SpringSimulation};

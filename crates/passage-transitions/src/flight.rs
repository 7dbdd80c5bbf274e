//! Shared-element flight: config and geometry interpolation.
//!
//! A flight is the synthetic animation of a shared element between its
//! source rectangle (on the outgoing page) and target rectangle (on the
//! incoming page). The registry produces `FlightSpec`s; this module turns
//! them into per-frame geometry.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransitionError};
use crate::types::{ElementHandle, Identity};
use passage_core::easing::EasingFunction;
use passage_core::geometry::{Offset, Rect};

/// Typed configuration for a shared-element flight.
///
/// Replaces the original design's untyped parameter map with an enumerated
/// set of recognized options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharedElementConfig {
    /// Flight length in milliseconds. If shorter than the owning
    /// transition, the flight occupies the leading sub-interval and holds
    /// its target geometry afterwards. Default: 300ms.
    pub flight_duration_ms: f32,
    /// Curve applied to flight progress. Default: ease-in-out.
    pub flight_curve: EasingFunction,
    /// When true, the rectangle's size morphs along the flight; when
    /// false, the source rectangle translates along the center path at its
    /// original size. Default: true.
    pub enable_morphing: bool,
    /// Hint for the host to raise the flying content above both pages
    /// while in flight. Default: true.
    pub use_elevation: bool,
}

impl Default for SharedElementConfig {
    fn default() -> Self {
        Self {
            flight_duration_ms: 300.0,
            flight_curve: EasingFunction::EaseInOut,
            enable_morphing: true,
            use_elevation: true,
        }
    }
}

impl SharedElementConfig {
    pub fn with_duration_ms(mut self, duration_ms: f32) -> Result<Self> {
        if duration_ms <= 0.0 {
            return Err(TransitionError::InvalidDuration(duration_ms));
        }
        self.flight_duration_ms = duration_ms;
        Ok(self)
    }

    pub fn with_curve(mut self, curve: EasingFunction) -> Self {
        self.flight_curve = curve;
        self
    }

    pub fn with_morphing(mut self, enable: bool) -> Self {
        self.enable_morphing = enable;
        self
    }

    pub fn with_elevation(mut self, enable: bool) -> Self {
        self.use_elevation = enable;
        self
    }
}

/// Resolved flight input for one identity: the content to render and the
/// best-available geometry.
///
/// `target` is `None` until the registry has paired two live, captured
/// entries; a single-ended spec renders statically at `source`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightSpec {
    pub identity_element: ElementHandle,
    pub source: Rect,
    pub target: Option<Rect>,
}

impl FlightSpec {
    /// Flight geometry at eased progress `t`.
    ///
    /// Without a target the source rectangle is returned unchanged (static
    /// single-ended display). With morphing the whole rectangle lerps;
    /// without it the source translates along the path between the two
    /// centers at its original size. `t` may exceed `[0, 1]` when the
    /// flight curve overshoots; geometry extrapolates.
    pub fn rect_at(&self, t: f32, config: &SharedElementConfig) -> Rect {
        let Some(target) = self.target else {
            return self.source;
        };
        if config.enable_morphing {
            self.source.lerp(&target, t)
        } else {
            let from = self.source.center();
            let to = target.center();
            let delta = Offset::new(to.x - from.x, to.y - from.y).scaled(t);
            self.source.translated(delta)
        }
    }
}

/// A flight resolved for one frame, handed to the host for painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightFrame {
    pub identity: Identity,
    pub element: ElementHandle,
    /// Where to paint the flying content this frame.
    pub rect: Rect,
    /// Whether the flight is double-ended (paired) this frame.
    pub in_flight: bool,
    /// Elevation hint from the config.
    pub elevated: bool,
}

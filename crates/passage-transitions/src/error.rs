//! Error types for transition construction.
//!
//! These cover construction-time failures only. Transient unavailability
//! (geometry not captured yet, children not discovered yet) is modeled as
//! `Option`/retry, and stale-reference operations are logged no-ops; neither
//! surfaces here.

use thiserror::Error;

/// Result type for transition construction.
pub type Result<T> = std::result::Result<T, TransitionError>;

/// Errors raised while building a transition request.
///
/// All of these are reported at the point of chain construction; the
/// library never silently coerces malformed descriptors. (Curve-output
/// clamping in the compositor is a numeric-safety measure, not error
/// suppression.)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// Interval bounds were out of order or outside `[0, 1]`.
    #[error("invalid effect interval: start {start} .. end {end} (need 0 <= start <= end <= 1)")]
    InvalidInterval { start: f32, end: f32 },

    /// A duration was zero or negative.
    #[error("invalid duration: {0}ms (must be positive)")]
    InvalidDuration(f32),

    /// An opacity endpoint fell outside `[0, 1]`.
    #[error("invalid opacity endpoint: {0} (must be in [0, 1])")]
    InvalidOpacity(f32),

    /// A blur sigma endpoint was negative.
    #[error("invalid blur sigma: {0} (must be >= 0)")]
    InvalidBlurSigma(f32),

    /// A scale endpoint was negative.
    #[error("invalid scale factor: {0} (must be >= 0)")]
    InvalidScale(f32),

    /// A clip fraction endpoint fell outside `[0, 1]`.
    #[error("invalid clip fraction: {0} (must be in [0, 1])")]
    InvalidClipFraction(f32),

    /// A tint mix endpoint fell outside `[0, 1]`.
    #[error("invalid tint mix: {0} (must be in [0, 1])")]
    InvalidTintMix(f32),

    /// Spring parameters were non-positive.
    #[error("invalid spring: mass {mass}, stiffness {stiffness}, damping {damping} (all must be > 0)")]
    InvalidSpring {
        mass: f32,
        stiffness: f32,
        damping: f32,
    },

    /// A stagger config had a non-positive item count limit or attempt count.
    #[error("invalid stagger config: {0}")]
    InvalidStagger(String),
}

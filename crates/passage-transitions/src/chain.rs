//! Effect chains and the transition builder.
//!
//! Callers describe a transition by chaining effect descriptors onto a
//! `TransitionBuilder`; `build` produces an immutable `TransitionRequest`
//! the manager runs. Order is visually meaningful: later effects compose
//! on top of (wrap) earlier ones.
//!
//! # Usage
//!
//! ```
//! use passage_transitions::chain::TransitionBuilder;
//! use passage_transitions::effect::{Effect, Interval};
//! use passage_core::Offset;
//!
//! let request = TransitionBuilder::new(300.0)?
//!     .push(Effect::fade_in())
//!     .push(
//!         Effect::slide_in_from(Offset::new(1.0, 0.0))
//!             .with_interval(Interval::new(0.0, 0.8)?),
//!     )
//!     .build();
//! assert_eq!(request.chain.len(), 2);
//! # Ok::<(), passage_transitions::error::TransitionError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::error::{Result, TransitionError};
use crate::flight::SharedElementConfig;
use crate::stagger::StaggerConfig;
use crate::types::{ElementHandle, Identity};
use passage_core::geometry::Offset;
use passage_core::spring::SpringDescription;

/// An ordered sequence of effects. Immutable once a transition starts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectChain {
    effects: Vec<Effect>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Effect> {
        self.effects.get(index)
    }

    /// Effects in declaration order (bottom of the stack first).
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }
}

/// Predicate selecting stagger children in the host tree.
pub type ChildPredicate = Box<dyn Fn(ElementHandle) -> bool + Send + Sync>;

/// The stagger portion of a request: declarative config plus the runtime
/// discovery predicate.
pub struct StaggerRequest {
    pub config: StaggerConfig,
    pub predicate: ChildPredicate,
}

impl std::fmt::Debug for StaggerRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaggerRequest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A fully assembled transition, ready to hand to the manager.
///
/// Owned exclusively by the transition run; dropped when it completes.
#[derive(Debug)]
pub struct TransitionRequest {
    /// Nominal duration in milliseconds. A stagger schedule may stretch the
    /// effective duration beyond this.
    pub duration_ms: f32,
    pub chain: EffectChain,
    /// Identities whose shared elements should fly, with per-identity
    /// flight options.
    pub shared_elements: Vec<(Identity, SharedElementConfig)>,
    pub stagger: Option<StaggerRequest>,
}

/// Fluent, fallible builder for transition requests.
///
/// Methods that can receive malformed parameters return
/// `Result<Self, TransitionError>` so errors surface at the exact point of
/// chain construction; infallible sugar returns `Self` directly.
#[derive(Debug)]
pub struct TransitionBuilder {
    duration_ms: f32,
    chain: EffectChain,
    shared_elements: Vec<(Identity, SharedElementConfig)>,
    stagger: Option<StaggerRequest>,
}

impl TransitionBuilder {
    /// Start a builder for a transition of `duration_ms` milliseconds.
    pub fn new(duration_ms: f32) -> Result<Self> {
        if duration_ms <= 0.0 {
            return Err(TransitionError::InvalidDuration(duration_ms));
        }
        Ok(Self {
            duration_ms,
            chain: EffectChain::new(),
            shared_elements: Vec::new(),
            stagger: None,
        })
    }

    /// Append an already-validated effect.
    pub fn push(mut self, effect: Effect) -> Self {
        self.chain.push(effect);
        self
    }

    /// Append a fade between two opacities.
    pub fn fade(self, from: f32, to: f32) -> Result<Self> {
        Ok(self.push(Effect::fade(from, to)?))
    }

    /// Append a fade from transparent to opaque.
    pub fn fade_in(self) -> Self {
        self.push(Effect::fade_in())
    }

    /// Append a fade from opaque to transparent.
    pub fn fade_out(self) -> Self {
        self.push(Effect::fade_out())
    }

    /// Append a slide between two offsets.
    pub fn slide(self, from: Offset, to: Offset) -> Result<Self> {
        Ok(self.push(Effect::slide(from, to)?))
    }

    /// Append a slide settling at rest from `from`.
    pub fn slide_in_from(self, from: Offset) -> Self {
        self.push(Effect::slide_in_from(from))
    }

    /// Append a scale between two factors.
    pub fn scale(self, from: f32, to: f32) -> Result<Self> {
        Ok(self.push(Effect::scale(from, to)?))
    }

    /// Append a rotation between two angles, in turns.
    pub fn rotate(self, from_turns: f32, to_turns: f32) -> Result<Self> {
        Ok(self.push(Effect::rotate(from_turns, to_turns)?))
    }

    /// Append a blur between two sigmas.
    pub fn blur(self, from_sigma: f32, to_sigma: f32) -> Result<Self> {
        Ok(self.push(Effect::blur(from_sigma, to_sigma)?))
    }

    /// Append a clip reveal between two fractions.
    pub fn clip(self, from: f32, to: f32) -> Result<Self> {
        Ok(self.push(Effect::clip(from, to)?))
    }

    /// Append a parallax translation at `factor` of the main motion.
    pub fn parallax(self, offset: Offset, factor: f32) -> Result<Self> {
        Ok(self.push(Effect::parallax(offset, factor)?))
    }

    /// Append a color wash between two mix fractions.
    pub fn tint(self, color: [f32; 4], from_mix: f32, to_mix: f32) -> Result<Self> {
        Ok(self.push(Effect::tint(color, from_mix, to_mix)?))
    }

    /// Append an effect re-driven by a spring simulation.
    pub fn spring(self, spring: SpringDescription, effect: Effect) -> Result<Self> {
        Ok(self.push(effect.with_spring(spring)?))
    }

    /// Request a shared-element flight for `identity`.
    pub fn shared_element(
        mut self,
        identity: impl Into<Identity>,
        config: SharedElementConfig,
    ) -> Self {
        self.shared_elements.push((identity.into(), config));
        self
    }

    /// Request a staggered reveal of children matching `predicate`.
    pub fn stagger(
        mut self,
        config: StaggerConfig,
        predicate: impl Fn(ElementHandle) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.stagger = Some(StaggerRequest {
            config,
            predicate: Box::new(predicate),
        });
        self
    }

    /// Finish the chain, producing the immutable request.
    pub fn build(self) -> TransitionRequest {
        TransitionRequest {
            duration_ms: self.duration_ms,
            chain: self.chain,
            shared_elements: self.shared_elements,
            stagger: self.stagger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Interval;

    #[test]
    fn test_builder_rejects_bad_duration() {
        assert_eq!(
            TransitionBuilder::new(0.0).unwrap_err(),
            TransitionError::InvalidDuration(0.0)
        );
        assert!(TransitionBuilder::new(-5.0).is_err());
    }

    #[test]
    fn test_builder_rejects_bad_effect_params() {
        let result = TransitionBuilder::new(300.0).unwrap().fade(0.0, 2.0);
        assert_eq!(result.unwrap_err(), TransitionError::InvalidOpacity(2.0));
    }

    #[test]
    fn test_chain_preserves_declaration_order() {
        let request = TransitionBuilder::new(300.0)
            .unwrap()
            .fade_in()
            .slide_in_from(Offset::new(0.0, 1.0))
            .blur(8.0, 0.0)
            .unwrap()
            .build();

        assert_eq!(request.chain.len(), 3);
        let kinds: Vec<_> = request
            .chain
            .iter()
            .map(|e| std::mem::discriminant(&e.kind))
            .collect();
        assert_eq!(kinds.len(), 3);
        assert_ne!(kinds[0], kinds[1]);
    }

    #[test]
    fn test_spring_sugar_sets_driver() {
        let request = TransitionBuilder::new(300.0)
            .unwrap()
            .spring(
                SpringDescription::default(),
                Effect::slide_in_from(Offset::new(1.0, 0.0)),
            )
            .unwrap()
            .build();

        assert!(request.chain.get(0).unwrap().is_spring_driven());
    }

    #[test]
    fn test_shared_element_and_stagger_attach() {
        let request = TransitionBuilder::new(300.0)
            .unwrap()
            .shared_element("hero", SharedElementConfig::default())
            .stagger(StaggerConfig::new(60.0, 400.0).unwrap(), |_| true)
            .build();

        assert_eq!(request.shared_elements.len(), 1);
        assert_eq!(request.shared_elements[0].0, Identity::new("hero"));
        assert!(request.stagger.is_some());
    }

    #[test]
    fn test_windowed_effect_through_builder() {
        let request = TransitionBuilder::new(300.0)
            .unwrap()
            .push(Effect::fade_in().with_interval(Interval::new(0.5, 1.0).unwrap()))
            .build();
        assert_eq!(request.chain.get(0).unwrap().interval.start(), 0.5);
    }
}

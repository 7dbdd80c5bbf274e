//! Declarative page and route transitions.
//!
//! This crate provides:
//! - **Effect chains**: Composable visual effects (fade, slide, scale,
//!   blur, clip, parallax, tint) scoped to sub-intervals of a transition
//! - **Shared elements**: Identity-tagged content that flies between the
//!   outgoing and incoming page
//! - **Stagger**: Cascading reveals of child elements discovered at
//!   transition start
//! - **Spring drivers**: Physics-driven progress for individual effects
//! - **Transition events**: Lifecycle notifications for the host
//!
//! # Architecture
//!
//! ```text
//! TransitionManager
//!   ├── Active transitions (master progress, direction)
//!   │     ├── Spring drivers (per spring-driven effect)
//!   │     └── Stagger scheduler → schedule (per-child sub-intervals)
//!   └── Event queue (lifecycle notifications)
//!
//! SharedElementRegistry
//!   └── Identity → entries → paired flight specs, resolved per frame
//! ```
//!
//! The host drives everything through [`TransitionManager::tick`] once per
//! rendered frame and paints the returned [`TransitionFrame`]s.

pub mod chain;
pub mod compositor;
pub mod effect;
pub mod error;
pub mod events;
pub mod flight;
pub mod host;
pub mod manager;
pub mod registry;
pub mod spring_driver;
pub mod stagger;
pub mod types;

pub use chain::{ChildPredicate, EffectChain, StaggerRequest, TransitionBuilder, TransitionRequest};
pub use compositor::{VisualOp, sample_chain, sample_chain_with};
pub use effect::{Effect, EffectKind, Interval, ProgressDriver};
pub use error::{Result, TransitionError};
pub use events::{EventQueue, TransitionEvent};
pub use flight::{FlightFrame, FlightSpec, SharedElementConfig};
pub use host::{LayoutHost, TreeDiscovery};
pub use manager::{StaggerItemFrame, TransitionFrame, TransitionManager};
pub use registry::{IdentityState, SharedElementEntry, SharedElementRegistry};
pub use spring_driver::SpringDriver;
pub use stagger::{DiscoveryOutcome, StaggerConfig, StaggerItem, StaggerSchedule, StaggerScheduler};
pub use types::{
    ElementHandle, EntryId, Identity, PageHandle, PlaybackDirection, ScreenSide, TransitionId,
    TransitionState,
};

//! Collaborator traits presented by the host toolkit.
//!
//! The transition layer is host-agnostic: everything it needs from the
//! widget tree arrives through these two traits. Both are queried on the
//! UI thread between frames; implementations must not block.
//!
//! Geometry is only meaningful after a layout pass, so the registry and the
//! stagger scheduler call into these lazily from `TransitionManager::tick`
//! rather than at registration time.

use crate::types::{ElementHandle, PageHandle};
use passage_core::Rect;

/// Access to the host's layout results and page lifecycle.
pub trait LayoutHost {
    /// Absolute on-screen bounds of an element, or `None` if the element
    /// has not been laid out yet (or no longer exists).
    fn capture_geometry(&self, element: ElementHandle) -> Option<Rect>;

    /// Whether a page is still mounted. Entries on dead pages are stale and
    /// get purged rather than read.
    fn is_page_live(&self, page: PageHandle) -> bool;
}

/// Host tree walk for discovering stagger children at runtime.
pub trait TreeDiscovery {
    /// Return up to `limit` elements matching the predicate, in tree
    /// (visual) order. May legitimately return fewer, or none, while
    /// widgets are still mounting; callers retry.
    fn find_matching(
        &self,
        predicate: &dyn Fn(ElementHandle) -> bool,
        limit: usize,
    ) -> Vec<ElementHandle>;
}

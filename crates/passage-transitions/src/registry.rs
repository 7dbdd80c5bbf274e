//! The shared-element registry: cross-page identity pairing and geometry
//! capture.
//!
//! Elements tagged with the same `Identity` live once on the outgoing page
//! and once on the incoming page. Each occurrence registers here; geometry
//! arrives later (capture is deferred until after the host's layout pass),
//! and whenever a new geometry lands the registry re-attempts pairing. The
//! two pages register in no guaranteed order; either side may arrive
//! first.
//!
//! The registry is explicitly owned and explicitly passed: callers hold
//! one instance for the lifetime of their navigation stack; there is no
//! process-wide singleton. Entries are never removed automatically on page
//! teardown (teardown order is racy with in-flight callbacks); callers
//! purge stale entries at least once per transition via
//! [`purge_stale`](SharedElementRegistry::purge_stale).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::flight::FlightSpec;
use crate::host::LayoutHost;
use crate::types::{ElementHandle, EntryId, Identity, PageHandle};
use passage_core::geometry::Rect;

/// One occurrence of an identity-tagged element on one page.
///
/// `geometry` is only trusted once captured post-layout; `page` is used
/// for liveness checks only and never dereferenced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedElementEntry {
    pub id: EntryId,
    pub identity: Identity,
    pub page: PageHandle,
    pub element: ElementHandle,
    pub geometry: Option<Rect>,
    /// The cyclically-next entry's geometry, set while the identity is
    /// paired.
    pub partner_geometry: Option<Rect>,
}

/// Observable lifecycle state of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityState {
    /// No entries.
    Unregistered,
    /// At least one entry, none with captured geometry.
    Registered,
    /// Geometry captured but fewer than two captured entries.
    Captured,
    /// Two or more captured entries; partners assigned.
    Paired,
}

/// Identity-keyed table of shared-element occurrences.
#[derive(Debug, Default)]
pub struct SharedElementRegistry {
    entries: HashMap<Identity, Vec<SharedElementEntry>>,
}

impl SharedElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an occurrence of `identity` on `page`. Geometry is unknown at
    /// registration time; it is captured on a later
    /// [`capture_pending`](Self::capture_pending) call, after layout.
    pub fn register(
        &mut self,
        identity: impl Into<Identity>,
        page: PageHandle,
        element: ElementHandle,
    ) -> EntryId {
        let identity = identity.into();
        let id = EntryId::new();
        trace!(%identity, ?page, "shared element registered");
        self.entries
            .entry(identity.clone())
            .or_default()
            .push(SharedElementEntry {
                id,
                identity,
                page,
                element,
                geometry: None,
                partner_geometry: None,
            });
        id
    }

    /// Remove one specific occurrence. Keyed by entry ID, not just
    /// identity: the same identity exists once per page and the two must
    /// not be conflated.
    ///
    /// Unregistering an unknown entry is a logged no-op; teardown
    /// ordering is inherently racy with in-flight callbacks.
    pub fn unregister(&mut self, identity: &Identity, entry: EntryId) {
        let Some(list) = self.entries.get_mut(identity) else {
            debug!(%identity, "unregister for unknown identity ignored");
            return;
        };
        let before = list.len();
        list.retain(|e| e.id != entry);
        if list.len() == before {
            debug!(%identity, ?entry, "unregister for unknown entry ignored");
            return;
        }
        if list.is_empty() {
            self.entries.remove(identity);
        }
        self.attempt_pairing(identity);
    }

    /// Capture geometry for entries that do not have it yet, re-attempting
    /// pairing for every identity that gained a rectangle.
    ///
    /// Call after the host's layout pass; entries whose geometry is not
    /// available yet simply stay pending (transient unavailability is not
    /// an error). Dead-page entries are skipped here and removed by
    /// [`purge_stale`](Self::purge_stale).
    pub fn capture_pending(&mut self, host: &dyn LayoutHost) {
        // Snapshot the pending set first; host callbacks must not observe
        // a half-iterated table.
        let pending: Vec<(Identity, EntryId, ElementHandle, PageHandle)> = self
            .entries
            .values()
            .flatten()
            .filter(|e| e.geometry.is_none())
            .map(|e| (e.identity.clone(), e.id, e.element, e.page))
            .collect();

        let mut touched: Vec<Identity> = Vec::new();
        for (identity, entry_id, element, page) in pending {
            if !host.is_page_live(page) {
                continue;
            }
            let Some(rect) = host.capture_geometry(element) else {
                continue;
            };
            if let Some(entry) = self
                .entries
                .get_mut(&identity)
                .and_then(|list| list.iter_mut().find(|e| e.id == entry_id))
            {
                entry.geometry = Some(rect);
                if !touched.contains(&identity) {
                    touched.push(identity);
                }
            }
        }

        for identity in touched {
            self.attempt_pairing(&identity);
        }
    }

    /// Re-derive partner geometry for an identity.
    ///
    /// Entries with captured geometry are paired in discovery order, each
    /// with the cyclically-next captured entry. With more than two live
    /// entries per identity this is deterministic but not necessarily the
    /// pairing a caller intended; N-way morphing is out of scope.
    pub fn attempt_pairing(&mut self, identity: &Identity) {
        let Some(list) = self.entries.get_mut(identity) else {
            return;
        };

        let captured: Vec<(usize, Rect)> = list
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.geometry.map(|g| (i, g)))
            .collect();

        if captured.len() < 2 {
            for e in list.iter_mut() {
                e.partner_geometry = None;
            }
            return;
        }

        for (slot, &(index, _)) in captured.iter().enumerate() {
            let (_, partner_rect) = captured[(slot + 1) % captured.len()];
            list[index].partner_geometry = Some(partner_rect);
        }
        debug!(%identity, entries = captured.len(), "shared element paired");
    }

    /// Resolve the best-available flight input for an identity.
    ///
    /// Returns the first entry with captured geometry; `target` is `None`
    /// until a pairing exists (single-ended display, no flight).
    pub fn resolve(&self, identity: &Identity) -> Option<FlightSpec> {
        self.entries.get(identity)?.iter().find_map(|e| {
            e.geometry.map(|source| FlightSpec {
                identity_element: e.element,
                source,
                target: e.partner_geometry,
            })
        })
    }

    /// Remove entries whose page is no longer live, returning how many
    /// were removed. Idempotent: with no intervening registrations a
    /// second call removes nothing.
    pub fn purge_stale(&mut self, host: &dyn LayoutHost) -> usize {
        let mut removed = 0;
        let mut repair: Vec<Identity> = Vec::new();

        self.entries.retain(|identity, list| {
            let before = list.len();
            list.retain(|e| host.is_page_live(e.page));
            if list.len() != before {
                removed += before - list.len();
                repair.push(identity.clone());
            }
            !list.is_empty()
        });

        for identity in repair {
            self.attempt_pairing(&identity);
        }
        if removed > 0 {
            debug!(removed, "purged stale shared element entries");
        }
        removed
    }

    /// Current lifecycle state of an identity.
    pub fn identity_state(&self, identity: &Identity) -> IdentityState {
        let Some(list) = self.entries.get(identity) else {
            return IdentityState::Unregistered;
        };
        let captured = list.iter().filter(|e| e.geometry.is_some()).count();
        if captured >= 2 {
            IdentityState::Paired
        } else if captured == 1 {
            IdentityState::Captured
        } else {
            IdentityState::Registered
        }
    }

    /// Total number of registered occurrences across all identities.
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change evaluation for presenters.
//!
//! Level transitions and stamps mark layer slots dirty as they happen.
//! [`LayerManager::evaluate`] drains both channels and diffs each dirty
//! layer's [`Visibility`] against what was last reported:
//!
//! 1. **VISIBILITY** — Hidden → visible is a reveal, visible → Hidden a
//!    conceal, and Revealed ↔ Pinned a re-clip (the layer stays on screen
//!    but switches between full drawing and drawing clipped to its stamps).
//!    A layer revealed and concealed again between two evaluations reports
//!    nothing.
//! 2. **STAMPS** — Drain dirty slots (no diffing; presenters read the
//!    stamp circles directly from the layer).

use alloc::vec::Vec;

use super::category::Visibility;
use super::id::LayerAddress;
use super::manager::LayerManager;
use crate::dirty;

/// The set of changes produced by a single [`LayerManager::evaluate`] call.
///
/// Each list is in ascending slot order: category by category, level 0
/// first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelChanges {
    /// Layers that became visible.
    pub revealed: Vec<LayerAddress>,
    /// Layers that became hidden.
    pub concealed: Vec<LayerAddress>,
    /// Layers that stayed visible but switched between full and
    /// stamp-clipped drawing.
    pub reclipped: Vec<LayerAddress>,
    /// Layers that received stamps.
    pub stamped: Vec<LayerAddress>,
}

impl LevelChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.revealed.clear();
        self.concealed.clear();
        self.reclipped.clear();
        self.stamped.clear();
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
            && self.concealed.is_empty()
            && self.reclipped.is_empty()
            && self.stamped.is_empty()
    }
}

impl LayerManager {
    /// Drains pending changes and returns what a presenter must update.
    pub fn evaluate(&mut self) -> LevelChanges {
        let mut changes = LevelChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut LevelChanges) {
        changes.clear();

        // Drain VISIBILITY channel, then diff against the last report.
        let dirty_visibility: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();
        for slot in dirty_visibility {
            let address = self.address_of(slot);
            let now = self.visibility(address).unwrap_or(Visibility::Hidden);
            let before = core::mem::replace(&mut self.presented[slot as usize], now);
            match (before.is_visible(), now.is_visible()) {
                (false, true) => changes.revealed.push(address),
                (true, false) => changes.concealed.push(address),
                (true, true) if before != now => changes.reclipped.push(address),
                _ => {}
            }
        }

        // Drain STAMPS channel.
        let dirty_stamps: Vec<u32> = self
            .dirty
            .drain(dirty::STAMPS)
            .deterministic()
            .run()
            .collect();
        changes.stamped = dirty_stamps
            .into_iter()
            .map(|slot| self.address_of(slot))
            .collect();
    }
}

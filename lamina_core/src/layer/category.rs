// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-category reveal state machine.
//!
//! A [`LayerCategory`] owns the layers of one named hierarchy and a
//! *current level*: the deepest level that is logically revealed. Levels
//! `0..=current` are revealed; `None` means nothing is revealed.
//!
//! Stamps decouple the logical level from what is on screen. A stamped
//! layer stays visible after the current level recedes past it, so level
//! transitions only report a layer when its visibility actually flips.

use alloc::string::String;
use alloc::vec::Vec;

use super::model::Layer;
use crate::allocate::{AllocError, Hierarchy, allocate};
use crate::feature::FeatureRecord;
use crate::stamp::Stamp;
use crate::trace::Tracer;

/// Where a category's current level starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InitialLevel {
    /// Nothing revealed.
    Hidden,
    /// Only level 0 revealed.
    #[default]
    First,
    /// Every level revealed.
    Full,
}

/// How a single layer currently presents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Above the current level and unstamped: not drawn.
    Hidden,
    /// At or below the current level: drawn in full.
    Revealed,
    /// Above the current level but stamped: drawn clipped to its stamps.
    Pinned,
}

impl Visibility {
    /// Returns whether anything of the layer is drawn.
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// The result of one effective level transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelStep {
    /// Current level before the transition.
    pub from: Option<usize>,
    /// Current level after the transition.
    pub to: Option<usize>,
    /// The level whose visibility flipped, or `None` when the candidate was
    /// already pinned by stamps.
    pub changed: Option<usize>,
}

/// An ordered hierarchy of layers with a reveal level.
#[derive(Debug)]
pub struct LayerCategory {
    name: String,
    layers: Vec<Layer>,
    current: Option<usize>,
}

impl LayerCategory {
    /// Builds a category from allocated layers.
    ///
    /// Empty layers are discarded and the rest are renumbered densely, so
    /// that `layers()[i].level() == i`. The level each layer was allocated
    /// at remains available as [`Layer::source_level`].
    #[must_use]
    pub fn new(name: impl Into<String>, mut layers: Vec<Layer>, initial: InitialLevel) -> Self {
        layers.retain(|layer| !layer.is_empty());
        for (level, layer) in layers.iter_mut().enumerate() {
            layer.level = level;
        }
        let current = match initial {
            InitialLevel::Hidden => None,
            InitialLevel::First => (!layers.is_empty()).then_some(0),
            InitialLevel::Full => layers.len().checked_sub(1),
        };
        Self {
            name: name.into(),
            layers,
            current,
        }
    }

    /// Allocates `features` with `hierarchy` and builds the category.
    ///
    /// # Errors
    ///
    /// Propagates [`AllocError`] from the allocator.
    pub fn allocate(
        name: impl Into<String>,
        index: usize,
        hierarchy: &Hierarchy,
        features: Vec<FeatureRecord>,
        initial: InitialLevel,
        tracer: &mut Tracer<'_>,
    ) -> Result<Self, AllocError> {
        let allocation = allocate(index, hierarchy, features, tracer)?;
        Ok(Self::new(name, allocation.layers, initial))
    }

    /// Returns the category name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current level, or `None` when nothing is revealed.
    #[must_use]
    pub fn current_level(&self) -> Option<usize> {
        self.current
    }

    /// Returns the highest level index, or `None` for an empty category.
    #[must_use]
    pub fn max_level(&self) -> Option<usize> {
        self.layers.len().checked_sub(1)
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns whether the category has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the layer at `level`.
    #[must_use]
    pub fn layer(&self, level: usize) -> Option<&Layer> {
        self.layers.get(level)
    }

    /// Returns all layers, level 0 first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Returns the revealed layers, `0..=current`.
    #[must_use]
    pub fn current_layers(&self) -> &[Layer] {
        match self.current {
            Some(current) => &self.layers[..=current],
            None => &[],
        }
    }

    /// Returns how the layer at `level` presents, or `None` if there is no
    /// such level.
    #[must_use]
    pub fn visibility(&self, level: usize) -> Option<Visibility> {
        let layer = self.layers.get(level)?;
        Some(if self.current.is_some_and(|c| level <= c) {
            Visibility::Revealed
        } else if layer.has_stamps() {
            Visibility::Pinned
        } else {
            Visibility::Hidden
        })
    }

    // -- Transitions --

    /// Advances the current level by one.
    ///
    /// Returns `None` if already at the top. Otherwise the level advances
    /// and the step reports the new level as changed unless stamps already
    /// pin it visible.
    pub fn step_up(&mut self) -> Option<LevelStep> {
        let next = self.current.map_or(0, |c| c + 1);
        let candidate = self.layers.get(next)?;
        let changed = (!candidate.has_stamps()).then_some(next);
        let from = self.current;
        self.current = Some(next);
        Some(LevelStep {
            from,
            to: self.current,
            changed,
        })
    }

    /// Recedes the current level by one.
    ///
    /// Returns `None` if nothing is revealed. Otherwise the level recedes
    /// and the step reports the old level as changed unless stamps keep it
    /// visible.
    pub fn step_down(&mut self) -> Option<LevelStep> {
        let current = self.current?;
        let changed = (!self.layers[current].has_stamps()).then_some(current);
        self.current = current.checked_sub(1);
        Some(LevelStep {
            from: Some(current),
            to: self.current,
            changed,
        })
    }

    /// Reveals the next level, returning the layer to show, if any.
    pub fn increment_level(&mut self) -> Option<&Layer> {
        let step = self.step_up()?;
        step.changed.map(|level| &self.layers[level])
    }

    /// Conceals the current level, returning the layer to hide, if any.
    pub fn decrement_level(&mut self) -> Option<&Layer> {
        let step = self.step_down()?;
        step.changed.map(|level| &self.layers[level])
    }

    /// Appends `stamp` to every revealed layer and returns how many layers
    /// received it.
    pub fn add_stamp(&mut self, stamp: Stamp) -> usize {
        let Some(current) = self.current else {
            return 0;
        };
        for layer in &mut self.layers[..=current] {
            layer.add_stamp(stamp);
        }
        current + 1
    }

    /// Assigns z-indices starting at `offset`; level 0 gets the highest.
    pub fn set_z_indices(&mut self, offset: i32) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "layer counts are far below i32::MAX"
        )]
        let count = self.layers.len() as i32;
        for layer in &mut self.layers {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "levels are below the layer count"
            )]
            let level = layer.level as i32;
            layer.z_index = offset + (count - 1 - level);
        }
    }
}

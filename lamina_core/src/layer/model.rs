// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Layer`] bucket: features, style, stamps, and lifecycle handlers.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Circle, Rect};

use super::id::{LayerAddress, LayerHandle};
use crate::feature::FeatureRecord;
use crate::stamp::Stamp;
use crate::style::{ResolvedStyle, Style};

/// Render lifecycle events a layer can forward to registered callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerEvent {
    /// Fired by the renderer before the layer is composed.
    PreCompose,
    /// Fired by the renderer after the layer is composed.
    PostCompose,
}

/// Callback invoked with the layer that fired an event.
pub type LayerHandler = Rc<dyn Fn(&Layer)>;

/// One non-empty bucket of features at a single hierarchy level.
pub struct Layer {
    pub(crate) category: usize,
    pub(crate) level: usize,
    pub(crate) source_level: usize,
    pub(crate) z_index: i32,
    features: Vec<FeatureRecord>,
    style: Style,
    stamps: Vec<Stamp>,
    handlers: Vec<(LayerEvent, LayerHandler)>,
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("category", &self.category)
            .field("level", &self.level)
            .field("source_level", &self.source_level)
            .field("z_index", &self.z_index)
            .field("features", &self.features.len())
            .field("style", &self.style)
            .field("stamps", &self.stamps.len())
            .finish_non_exhaustive()
    }
}

impl Layer {
    /// Creates an empty layer for `level` of `category`.
    #[must_use]
    pub fn new(category: usize, level: usize, style: Style) -> Self {
        Self {
            category,
            level,
            source_level: level,
            z_index: 0,
            features: Vec::new(),
            style,
            stamps: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Moves a feature into this layer.
    pub fn add_feature(&mut self, feature: FeatureRecord) {
        self.features.push(feature);
    }

    /// Returns the index of the owning category.
    #[must_use]
    pub fn category(&self) -> usize {
        self.category
    }

    /// Returns the dense level index within the category.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the level the allocator originally assigned, before empty
    /// buckets were dropped.
    #[must_use]
    pub fn source_level(&self) -> usize {
        self.source_level
    }

    /// Returns the category/level address.
    #[must_use]
    pub fn address(&self) -> LayerAddress {
        LayerAddress {
            category: self.category,
            level: self.level,
        }
    }

    /// Returns the stacking order assigned by the manager.
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Returns the renderable handle for this layer.
    #[must_use]
    pub fn handle(&self) -> LayerHandle {
        LayerHandle {
            address: self.address(),
            z_index: self.z_index,
        }
    }

    /// Returns the features in this layer.
    #[must_use]
    pub fn features(&self) -> &[FeatureRecord] {
        &self.features
    }

    /// Returns the number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns whether the layer holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the layer style.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Resolves the layer style for one of its features.
    #[must_use]
    pub fn resolve_style(&self, feature: &FeatureRecord) -> ResolvedStyle {
        self.style.resolve(feature)
    }

    /// Returns the union of all feature extents.
    #[must_use]
    pub fn extent(&self) -> Option<Rect> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.bounding_box())
            .reduce(|a, b| a.union(b))
    }

    // -- Stamps (append-only) --

    /// Appends a stamp.
    pub fn add_stamp(&mut self, stamp: Stamp) {
        self.stamps.push(stamp);
    }

    /// Returns whether any stamp pins this layer.
    #[must_use]
    pub fn has_stamps(&self) -> bool {
        !self.stamps.is_empty()
    }

    /// Returns the stamps in the order they were added.
    #[must_use]
    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    /// Returns the stamp circles a renderer clips a pinned layer to.
    pub fn stamp_circles(&self) -> impl Iterator<Item = Circle> + '_ {
        self.stamps.iter().map(Stamp::circle)
    }

    // -- Lifecycle handlers --

    /// Registers `handler` for `event`.
    pub fn set_handler(&mut self, event: LayerEvent, handler: LayerHandler) {
        self.handlers.push((event, handler));
    }

    /// Invokes every handler registered for `event`, in registration order.
    pub fn dispatch(&self, event: LayerEvent) {
        for (registered, handler) in &self.handlers {
            if *registered == event {
                handler(self);
            }
        }
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer addressing and renderable handles.

use core::fmt;

/// The position of a layer: category index plus dense level index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerAddress {
    /// Index of the category in the manager.
    pub category: usize,
    /// Level within the category.
    pub level: usize,
}

impl fmt::Debug for LayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerAddress({}:{})", self.category, self.level)
    }
}

/// A lightweight handle a renderer uses to refer to one layer.
///
/// Handles are returned by level transitions and by the
/// [`handles`](super::LayerManager::handles) queries. They are plain values;
/// resolve them back to a [`Layer`](super::Layer) with
/// [`LayerManager::layer_for`](super::LayerManager::layer_for).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle {
    /// Where the layer lives.
    pub address: LayerAddress,
    /// Stacking order assigned by the manager; larger draws on top.
    pub z_index: i32,
}

impl fmt::Debug for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LayerHandle({}:{}@z{})",
            self.address.category, self.address.level, self.z_index
        )
    }
}

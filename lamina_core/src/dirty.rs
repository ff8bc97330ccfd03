// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The [`LayerManager`](crate::layer::LayerManager) records which layers
//! may need presenting again using multi-channel dirty tracking (via
//! [`understory_dirty`]). Keys are layer slots: the global index of a layer
//! across all categories, in category order.
//!
//! Both channels are local-only. A level transition affects exactly the
//! layer it names, and a stamp affects exactly the layers it was appended
//! to, so there are no dependency edges.
//!
//! # Consumption
//!
//! Callers never need to query dirty state directly. Each
//! [`LayerManager::evaluate`](crate::layer::LayerManager::evaluate) call
//! drains both channels and surfaces the results as
//! [`LevelChanges`](crate::layer::LevelChanges), which presenters
//! [consume](crate::backend::Presenter::apply).

use understory_dirty::Channel;

/// A level transition may have flipped the layer's visibility.
pub const VISIBILITY: Channel = Channel::new(0);

/// A stamp was appended; the layer's clip region grew.
pub const STAMPS: Channel = Channel::new(1);

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers, categories and the manager that orchestrates them.
//!
//! A *layer* is one non-empty bucket of features at a single hierarchy
//! level. Each layer has:
//!
//! - An address ([`LayerAddress`]): category index plus dense level index.
//! - A [`Style`](crate::style::Style) shared by its features.
//! - An append-only list of [`Stamp`](crate::stamp::Stamp)s.
//! - A z-index assigned by the [`LayerManager`].
//!
//! A [`LayerCategory`] owns the layers of one hierarchy and the reveal
//! level: levels `0..=current` are revealed. Stamped layers above the
//! current level stay on screen, clipped to their stamps.
//!
//! # Dirty tracking
//!
//! Level transitions and stamps mark the affected layers in the manager's
//! dirty channels (see [`dirty`](crate::dirty)). [`LayerManager::evaluate`]
//! turns them into [`LevelChanges`].

mod category;
mod evaluate;
mod id;
mod manager;
mod model;

pub use category::{InitialLevel, LayerCategory, LevelStep, Visibility};
pub use evaluate::LevelChanges;
pub use id::{LayerAddress, LayerHandle};
pub use manager::{LayerManager, ManagerError};
pub use model::{Layer, LayerEvent, LayerHandler};

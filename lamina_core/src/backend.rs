// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract for rendering collaborators.
//!
//! `lamina_core` owns classification and reveal state. Drawing features,
//! hosting map widgets and reading user input all live outside it. A
//! renderer implements [`Presenter`] and is fed the changes of each
//! interaction.

use crate::layer::{LayerManager, LevelChanges};

/// Applies evaluated level changes to a rendering surface.
///
/// # Interaction loop pseudocode
///
/// ```rust,ignore
/// fn on_key(key: Key) {
///     match key {
///         Key::Up => { manager.increment_level(); }
///         Key::Down => { manager.decrement_level(); }
///         Key::Tab => manager.toggle_category(),
///         _ => return,
///     }
///
///     // Evaluate: drain dirty channels, diff against what was shown
///     let changes = manager.evaluate();
///
///     // Present: show, hide or re-clip the affected layers
///     presenter.apply(&manager, &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`LevelChanges`], reading layer contents and
    /// visibility from `manager` as needed.
    fn apply(&mut self, manager: &LayerManager, changes: &LevelChanges);
}

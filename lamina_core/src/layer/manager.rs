// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-category orchestration.
//!
//! The [`LayerManager`] owns every [`LayerCategory`], the *active category*
//! that untargeted operations go to, and the global stacking order. Every
//! mutation routes through it so that z-indices, the feature side-table,
//! and dirty tracking stay consistent.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;
use understory_dirty::{CycleHandling, DirtyTracker};

use super::category::{LayerCategory, Visibility};
use super::id::{LayerAddress, LayerHandle};
use super::model::{Layer, LayerEvent, LayerHandler};
use crate::dirty;
use crate::feature::FeatureId;
use crate::stamp::Stamp;
use crate::trace::{
    ActiveCategoryEvent, LevelChangeEvent, LevelDirection, StampEvent, TraceSink, Tracer,
};

/// Errors from [`LayerManager::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagerError {
    /// A manager needs at least one category to keep an active one.
    NoCategories,
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCategories => f.write_str("a layer manager needs at least one category"),
        }
    }
}

impl core::error::Error for ManagerError {}

/// Owns all categories and routes level and stamp operations to them.
pub struct LayerManager {
    categories: Vec<LayerCategory>,
    active: usize,
    /// Feature identity → owning layer.
    features: BTreeMap<FeatureId, LayerAddress>,
    /// Global slot of each category's level 0; slots key the dirty tracker.
    slot_offsets: Vec<u32>,
    pub(crate) dirty: DirtyTracker<u32>,
    /// Visibility last reported by `evaluate`, per slot.
    pub(crate) presented: Vec<Visibility>,
    sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for LayerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerManager")
            .field("categories", &self.categories)
            .field("active", &self.active)
            .field("features", &self.features.len())
            .field("traced", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink.as_deref_mut() {
        Some(sink) => Tracer::new(sink),
        None => Tracer::none(),
    }
}

impl LayerManager {
    /// Takes ownership of `categories` and assigns z-indices.
    ///
    /// Each layer's category index is set to its position in `categories`.
    /// The last category starts out active. Every layer is marked dirty, so
    /// the first [`evaluate`](Self::evaluate) reports the initially revealed
    /// layers.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NoCategories`] if `categories` is empty.
    pub fn new(mut categories: Vec<LayerCategory>) -> Result<Self, ManagerError> {
        let Some(active) = categories.len().checked_sub(1) else {
            return Err(ManagerError::NoCategories);
        };

        let mut features = BTreeMap::new();
        let mut slot_offsets = Vec::with_capacity(categories.len());
        let mut slots: u32 = 0;
        for (index, category) in categories.iter_mut().enumerate() {
            slot_offsets.push(slots);
            for layer in category.layers_mut() {
                layer.category = index;
                for feature in layer.features() {
                    // First registration wins if providers reuse ids.
                    features.entry(feature.id).or_insert(layer.address());
                }
            }
            #[expect(
                clippy::cast_possible_truncation,
                reason = "layer counts are far below u32::MAX"
            )]
            let len = category.len() as u32;
            slots += len;
        }

        let mut dirty_tracker = DirtyTracker::with_cycle_handling(CycleHandling::Error);
        for slot in 0..slots {
            dirty_tracker.mark(slot, dirty::VISIBILITY);
        }

        let mut manager = Self {
            categories,
            active,
            features,
            slot_offsets,
            dirty: dirty_tracker,
            presented: alloc::vec![Visibility::Hidden; slots as usize],
            sink: None,
        };
        manager.set_z_indices();
        Ok(manager)
    }

    /// Routes trace events to `sink`, replacing any previous sink.
    ///
    /// Events are only emitted when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    // -- Queries --

    /// Returns all categories in configuration order.
    #[must_use]
    pub fn categories(&self) -> &[LayerCategory] {
        &self.categories
    }

    /// Returns the number of categories (always at least one).
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Returns the category at `index`.
    #[must_use]
    pub fn category(&self, index: usize) -> Option<&LayerCategory> {
        self.categories.get(index)
    }

    /// Returns the index of the active category.
    #[must_use]
    pub fn active_category(&self) -> usize {
        self.active
    }

    /// Returns the layer at `level` of `category`.
    #[must_use]
    pub fn layer(&self, category: usize, level: usize) -> Option<&Layer> {
        self.categories.get(category)?.layer(level)
    }

    /// Resolves a handle back to its layer.
    #[must_use]
    pub fn layer_for(&self, handle: LayerHandle) -> Option<&Layer> {
        self.layer(handle.address.category, handle.address.level)
    }

    /// Returns how the layer at `address` presents right now.
    #[must_use]
    pub fn visibility(&self, address: LayerAddress) -> Option<Visibility> {
        self.categories.get(address.category)?.visibility(address.level)
    }

    /// Returns handles for every layer, category by category, level 0 first.
    #[must_use]
    pub fn handles(&self) -> Vec<LayerHandle> {
        self.categories
            .iter()
            .flat_map(|c| c.layers().iter().map(Layer::handle))
            .collect()
    }

    /// Returns handles for the layers at or below each category's current
    /// level.
    #[must_use]
    pub fn current_handles(&self) -> Vec<LayerHandle> {
        self.categories
            .iter()
            .flat_map(|c| c.current_layers().iter().map(Layer::handle))
            .collect()
    }

    /// Returns the current level of `category`.
    ///
    /// # Panics
    ///
    /// Panics if `category` is out of range.
    #[must_use]
    pub fn current_level_for_category(&self, category: usize) -> Option<usize> {
        self.checked(category);
        self.categories[category].current_level()
    }

    /// Returns the layer that holds feature `id`.
    #[must_use]
    pub fn locate(&self, id: FeatureId) -> Option<LayerAddress> {
        self.features.get(&id).copied()
    }

    /// Returns the union extent of every layer, for fitting a view.
    #[must_use]
    pub fn extent(&self) -> Option<Rect> {
        self.categories
            .iter()
            .flat_map(LayerCategory::layers)
            .filter_map(Layer::extent)
            .reduce(|a, b| a.union(b))
    }

    // -- Level transitions --

    /// Reveals the next level of the active category.
    ///
    /// Returns the handle of the layer to show, or `None` if the category
    /// was already fully revealed or the layer is already pinned by stamps.
    pub fn increment_level(&mut self) -> Option<LayerHandle> {
        self.step(self.active, LevelDirection::Up)
    }

    /// Conceals the current level of the active category.
    ///
    /// Returns the handle of the layer to hide, or `None` if nothing was
    /// revealed or the layer stays visible because of its stamps.
    pub fn decrement_level(&mut self) -> Option<LayerHandle> {
        self.step(self.active, LevelDirection::Down)
    }

    /// Like [`increment_level`](Self::increment_level), for `category`.
    ///
    /// # Panics
    ///
    /// Panics if `category` is out of range.
    pub fn increment_level_for_category(&mut self, category: usize) -> Option<LayerHandle> {
        self.checked(category);
        self.step(category, LevelDirection::Up)
    }

    /// Like [`decrement_level`](Self::decrement_level), for `category`.
    ///
    /// # Panics
    ///
    /// Panics if `category` is out of range.
    pub fn decrement_level_for_category(&mut self, category: usize) -> Option<LayerHandle> {
        self.checked(category);
        self.step(category, LevelDirection::Down)
    }

    fn step(&mut self, category: usize, direction: LevelDirection) -> Option<LayerHandle> {
        let cat = &mut self.categories[category];
        let step = match direction {
            LevelDirection::Up => cat.step_up(),
            LevelDirection::Down => cat.step_down(),
        }?;

        // The layer that entered or left the revealed range. Its
        // presentation may change even when stamps keep it visible.
        let moved = match direction {
            LevelDirection::Up => step.to,
            LevelDirection::Down => step.from,
        };
        if let Some(level) = moved {
            let slot = self.slot(LayerAddress { category, level });
            self.dirty.mark(slot, dirty::VISIBILITY);
        }

        let changed = step.changed.map(|level| LayerAddress { category, level });
        tracer(&mut self.sink).level_change(&LevelChangeEvent {
            category,
            direction,
            from: step.from,
            to: step.to,
            changed,
        });
        changed.map(|address| self.categories[category].layers()[address.level].handle())
    }

    // -- Stamps --

    /// Stamps the revealed layers of the active category.
    ///
    /// Returns how many layers received the stamp.
    pub fn add_stamp(&mut self, stamp: Stamp) -> usize {
        self.stamp_category(self.active, stamp)
    }

    /// Stamps the revealed layers of `category`.
    ///
    /// # Panics
    ///
    /// Panics if `category` is out of range.
    pub fn add_stamp_for_category(&mut self, stamp: Stamp, category: usize) -> usize {
        self.checked(category);
        self.stamp_category(category, stamp)
    }

    fn stamp_category(&mut self, category: usize, stamp: Stamp) -> usize {
        let stamped = self.categories[category].add_stamp(stamp);
        let first = self.slot_offsets[category];
        for level in 0..stamped {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "levels are below the layer count"
            )]
            let level = level as u32;
            self.dirty.mark(first + level, dirty::STAMPS);
        }
        let center = stamp.center();
        tracer(&mut self.sink).stamp(&StampEvent {
            category,
            layers: stamped,
            x: center.x,
            y: center.y,
            radius: stamp.radius(),
        });
        stamped
    }

    // -- Active category --

    /// Makes the next category active, wrapping around after the last.
    pub fn toggle_category(&mut self) {
        let next = (self.active + 1) % self.categories.len();
        self.activate(next);
    }

    /// Makes `category` active. No category's current level changes.
    ///
    /// # Panics
    ///
    /// Panics if `category` is out of range.
    pub fn set_active_category(&mut self, category: usize) {
        self.checked(category);
        self.activate(category);
    }

    fn activate(&mut self, category: usize) {
        let from = core::mem::replace(&mut self.active, category);
        tracer(&mut self.sink).active_category(&ActiveCategoryEvent { from, to: category });
    }

    // -- Rendering glue --

    /// Registers `handler` for `event` on every layer.
    pub fn set_handlers(&mut self, event: LayerEvent, handler: LayerHandler) {
        for category in &mut self.categories {
            for layer in category.layers_mut() {
                layer.set_handler(event, Rc::clone(&handler));
            }
        }
    }

    /// Reassigns z-indices so that categories stack without collision.
    ///
    /// Each category is offset by the total layer count of the categories
    /// before it; within a category level 0 is on top.
    pub fn set_z_indices(&mut self) {
        let mut offset: i32 = 0;
        for category in &mut self.categories {
            category.set_z_indices(offset);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "layer counts are far below i32::MAX"
            )]
            let len = category.len() as i32;
            offset += len;
        }
    }

    // -- Slots --

    /// Returns the global slot of `address`.
    pub(crate) fn slot(&self, address: LayerAddress) -> u32 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "levels are below the layer count"
        )]
        let level = address.level as u32;
        self.slot_offsets[address.category] + level
    }

    /// Returns the address of a global slot.
    pub(crate) fn address_of(&self, slot: u32) -> LayerAddress {
        // Empty categories share an offset with their successor; the last
        // offset not above `slot` is the category that owns it.
        let category = self.slot_offsets.partition_point(|&o| o <= slot) - 1;
        LayerAddress {
            category,
            level: (slot - self.slot_offsets[category]) as usize,
        }
    }

    #[track_caller]
    fn checked(&self, category: usize) {
        assert!(
            category < self.categories.len(),
            "category index {category} out of range ({} categories)",
            self.categories.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::cell::Cell;

    use kurbo::Point;

    use super::*;
    use crate::feature::{FeatureRecord, Geometry};
    use crate::layer::InitialLevel;
    use crate::style::Style;

    /// A category with `levels` single-feature layers; feature ids start at
    /// `first_id`.
    fn category(name: &str, levels: usize, first_id: u32, initial: InitialLevel) -> LayerCategory {
        let layers = (0..levels)
            .map(|level| {
                let mut layer = Layer::new(
                    0,
                    level,
                    Style::TextLabel {
                        field: "name".into(),
                    },
                );
                #[expect(clippy::cast_possible_truncation, reason = "test levels are tiny")]
                let id = first_id + level as u32;
                let x = level as f64;
                layer.add_feature(FeatureRecord::new(
                    FeatureId(id),
                    Geometry::Point(Point::new(x, -x)),
                ));
                layer
            })
            .collect();
        LayerCategory::new(name, layers, initial)
    }

    fn manager() -> LayerManager {
        LayerManager::new(vec![
            category("a", 3, 0, InitialLevel::First),
            category("b", 2, 100, InitialLevel::First),
        ])
        .unwrap()
    }

    fn stamp() -> Stamp {
        Stamp::from_brush(Point::new(2.0, 2.0), 5.0).unwrap()
    }

    #[test]
    fn empty_manager_is_an_error() {
        assert_eq!(LayerManager::new(Vec::new()).unwrap_err(), ManagerError::NoCategories);
    }

    #[test]
    fn z_indices_stack_categories() {
        let m = manager();
        let z: Vec<i32> = m.handles().iter().map(|h| h.z_index).collect();
        assert_eq!(z, vec![2, 1, 0, 4, 3], "A gets 2,1,0 and B is offset by 3");
    }

    #[test]
    fn z_indices_never_collide() {
        let m = LayerManager::new(vec![
            category("a", 4, 0, InitialLevel::First),
            category("empty", 0, 0, InitialLevel::First),
            category("b", 1, 10, InitialLevel::First),
            category("c", 3, 20, InitialLevel::First),
        ])
        .unwrap();
        let mut z: Vec<i32> = m.handles().iter().map(|h| h.z_index).collect();
        z.sort_unstable();
        assert_eq!(z, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn layers_learn_their_category_index() {
        let m = manager();
        for (index, category) in m.categories().iter().enumerate() {
            assert!(category.layers().iter().all(|l| l.category() == index));
        }
        assert_eq!(m.layer(1, 1).map(Layer::z_index), Some(3));
        assert!(m.layer(2, 0).is_none());
        assert!(m.layer(0, 3).is_none());
    }

    #[test]
    fn last_category_starts_active() {
        let mut m = manager();
        assert_eq!(m.active_category(), 1);
        let revealed = m.increment_level().unwrap();
        assert_eq!(revealed.address, LayerAddress { category: 1, level: 1 });
        assert_eq!(m.current_level_for_category(0), Some(0), "A untouched");
    }

    #[test]
    fn toggle_wraps_and_keeps_levels() {
        let mut m = manager();
        let _ = m.increment_level();
        m.toggle_category();
        assert_eq!(m.active_category(), 0);
        m.toggle_category();
        assert_eq!(m.active_category(), 1);
        assert_eq!(m.current_level_for_category(1), Some(1));
        m.set_active_category(0);
        assert_eq!(m.current_level_for_category(1), Some(1));
        let _ = m.increment_level();
        assert_eq!(m.current_level_for_category(0), Some(1));
    }

    #[test]
    fn per_category_operations_ignore_active() {
        let mut m = manager();
        let shown = m.increment_level_for_category(0).unwrap();
        assert_eq!(shown.address, LayerAddress { category: 0, level: 1 });
        assert_eq!(shown.z_index, 1);
        assert_eq!(m.add_stamp_for_category(stamp(), 0), 2);
        assert!(m.layer(0, 1).unwrap().has_stamps());
        assert!(!m.layer(1, 0).unwrap().has_stamps(), "active category untouched");
        assert!(m.decrement_level_for_category(0).is_none(), "stamped layer stays");
        assert_eq!(m.visibility(LayerAddress { category: 0, level: 1 }), Some(Visibility::Pinned));
    }

    #[test]
    fn current_handles_follow_levels() {
        let mut m = manager();
        assert_eq!(m.current_handles().len(), 2, "level 0 of each category");
        let _ = m.increment_level();
        let _ = m.decrement_level_for_category(0);
        let addresses: Vec<LayerAddress> = m.current_handles().iter().map(|h| h.address).collect();
        assert_eq!(
            addresses,
            vec![
                LayerAddress { category: 1, level: 0 },
                LayerAddress { category: 1, level: 1 },
            ]
        );
        assert_eq!(m.handles().len(), 5);
    }

    #[test]
    fn handles_resolve_to_layers() {
        let m = manager();
        for handle in m.handles() {
            let layer = m.layer_for(handle).unwrap();
            assert_eq!(layer.handle(), handle);
        }
    }

    #[test]
    fn features_are_located_without_mutation() {
        let m = manager();
        assert_eq!(m.locate(FeatureId(2)), Some(LayerAddress { category: 0, level: 2 }));
        assert_eq!(m.locate(FeatureId(101)), Some(LayerAddress { category: 1, level: 1 }));
        assert_eq!(m.locate(FeatureId(55)), None);
    }

    #[test]
    fn extent_covers_every_layer() {
        let m = manager();
        assert_eq!(m.extent(), Some(Rect::new(0.0, -2.0, 2.0, 0.0)));
    }

    #[test]
    fn handlers_reach_every_layer() {
        let mut m = manager();
        let calls = Rc::new(Cell::new(0_usize));
        let counter = Rc::clone(&calls);
        m.set_handlers(
            LayerEvent::PostCompose,
            Rc::new(move |_: &Layer| counter.set(counter.get() + 1)),
        );
        for category in m.categories() {
            for layer in category.layers() {
                layer.dispatch(LayerEvent::PostCompose);
                layer.dispatch(LayerEvent::PreCompose);
            }
        }
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn slots_round_trip_across_empty_categories() {
        let m = LayerManager::new(vec![
            category("a", 2, 0, InitialLevel::First),
            category("empty", 0, 0, InitialLevel::First),
            category("b", 3, 10, InitialLevel::First),
        ])
        .unwrap();
        for handle in m.handles() {
            assert_eq!(m.address_of(m.slot(handle.address)), handle.address);
        }
        assert_eq!(m.address_of(2), LayerAddress { category: 2, level: 0 });
    }

    #[test]
    #[should_panic(expected = "category index 2 out of range (2 categories)")]
    fn set_active_category_out_of_range_panics() {
        manager().set_active_category(2);
    }

    #[test]
    #[should_panic(expected = "category index 7 out of range")]
    fn increment_for_missing_category_panics() {
        let _ = manager().increment_level_for_category(7);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn transitions_are_traced() {
        use core::cell::RefCell;

        #[derive(Default)]
        struct Log {
            events: Vec<&'static str>,
        }
        struct Shared(Rc<RefCell<Log>>);
        impl TraceSink for Shared {
            fn on_level_change(&mut self, _: &LevelChangeEvent) {
                self.0.borrow_mut().events.push("level");
            }
            fn on_stamp(&mut self, _: &StampEvent) {
                self.0.borrow_mut().events.push("stamp");
            }
            fn on_active_category(&mut self, _: &ActiveCategoryEvent) {
                self.0.borrow_mut().events.push("active");
            }
        }

        let log = Rc::new(RefCell::new(Log::default()));
        let mut m = manager();
        m.set_trace_sink(Box::new(Shared(Rc::clone(&log))));
        let _ = m.increment_level();
        let _ = m.add_stamp(stamp());
        m.toggle_category();
        // A no-op transition emits nothing.
        let _ = m.increment_level_for_category(1);
        assert_eq!(log.borrow().events, vec!["level", "stamp", "active"]);
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instrumentation for allocation and level-state transitions.
//!
//! This module provides a [`TraceSink`] trait with one method per event.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::layer::LayerAddress;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which allocator produced a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllocatorKind {
    /// Predicate matching.
    Manual,
    /// Equal-width metric bands.
    Percentile,
    /// Equal-count rank bands.
    Fraction,
    /// Natural breaks.
    Cluster,
}

/// Direction of a level transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelDirection {
    /// `increment_level`.
    Up,
    /// `decrement_level`.
    Down,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after features have been allocated into layers.
#[derive(Clone, Copy, Debug)]
pub struct CategoryAllocatedEvent {
    /// Index of the category being built.
    pub category: usize,
    /// Allocator that ran.
    pub allocator: AllocatorKind,
    /// Features offered to the allocator.
    pub features: usize,
    /// Features excluded by the allocator.
    pub dropped: usize,
    /// Non-empty layers produced.
    pub layers: usize,
}

/// Emitted on every effective level transition.
#[derive(Clone, Copy, Debug)]
pub struct LevelChangeEvent {
    /// Category whose level moved.
    pub category: usize,
    /// Which way it moved.
    pub direction: LevelDirection,
    /// Current level before the transition.
    pub from: Option<usize>,
    /// Current level after the transition.
    pub to: Option<usize>,
    /// The layer whose visibility flipped, if any.
    pub changed: Option<LayerAddress>,
}

/// Emitted when a stamp is appended to a category.
#[derive(Clone, Copy, Debug)]
pub struct StampEvent {
    /// Category that received the stamp.
    pub category: usize,
    /// Number of layers the stamp was appended to.
    pub layers: usize,
    /// Stamp center, x.
    pub x: f64,
    /// Stamp center, y.
    pub y: f64,
    /// Stamp radius.
    pub radius: f64,
}

/// Emitted when the active category changes.
#[derive(Clone, Copy, Debug)]
pub struct ActiveCategoryEvent {
    /// Previously active category.
    pub from: usize,
    /// Newly active category.
    pub to: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a category has been allocated.
    fn on_category_allocated(&mut self, e: &CategoryAllocatedEvent) {
        _ = e;
    }

    /// Called on every effective level transition.
    fn on_level_change(&mut self, e: &LevelChangeEvent) {
        _ = e;
    }

    /// Called when a stamp is added.
    fn on_stamp(&mut self, e: &StampEvent) {
        _ = e;
    }

    /// Called when the active category changes.
    fn on_active_category(&mut self, e: &ActiveCategoryEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`CategoryAllocatedEvent`].
    #[inline]
    pub fn category_allocated(&mut self, e: &CategoryAllocatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_category_allocated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LevelChangeEvent`].
    #[inline]
    pub fn level_change(&mut self, e: &LevelChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_level_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StampEvent`].
    #[inline]
    pub fn stamp(&mut self, e: &StampEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_stamp(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ActiveCategoryEvent`].
    #[inline]
    pub fn active_category(&mut self, e: &ActiveCategoryEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_active_category(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use lamina_core::trace::{
    ActiveCategoryEvent, AllocatorKind, CategoryAllocatedEvent, LevelChangeEvent,
    LevelDirection, StampEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub(crate) fn allocator_name(kind: AllocatorKind) -> &'static str {
    match kind {
        AllocatorKind::Manual => "manual",
        AllocatorKind::Percentile => "percentile",
        AllocatorKind::Fraction => "fraction",
        AllocatorKind::Cluster => "cluster",
    }
}

pub(crate) fn direction_name(direction: LevelDirection) -> &'static str {
    match direction {
        LevelDirection::Up => "up",
        LevelDirection::Down => "down",
    }
}

/// Formats a current level, with `-` for "nothing revealed".
fn level(level: Option<usize>) -> String {
    level.map_or_else(|| "-".into(), |l| l.to_string())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_category_allocated(&mut self, e: &CategoryAllocatedEvent) {
        let _ = writeln!(
            self.writer,
            "[alloc] category={} {} features={} dropped={} layers={}",
            e.category,
            allocator_name(e.allocator),
            e.features,
            e.dropped,
            e.layers,
        );
    }

    fn on_level_change(&mut self, e: &LevelChangeEvent) {
        let changed = match e.changed {
            Some(address) => format!("layer={}", address.level),
            None => "pinned".into(),
        };
        let _ = writeln!(
            self.writer,
            "[level:{}] category={} {}→{} {changed}",
            direction_name(e.direction),
            e.category,
            level(e.from),
            level(e.to),
        );
    }

    fn on_stamp(&mut self, e: &StampEvent) {
        let _ = writeln!(
            self.writer,
            "[stamp] category={} layers={} at ({:.1}, {:.1}) r={:.1}",
            e.category, e.layers, e.x, e.y, e.radius,
        );
    }

    fn on_active_category(&mut self, e: &ActiveCategoryEvent) {
        let _ = writeln!(self.writer, "[active] {}→{}", e.from, e.to);
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, JSON-lines logging, and state snapshots for lamina
//! diagnostics.
//!
//! This crate provides [`TraceSink`](lamina_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`json::JsonLinesSink`] — one JSON object per event, for log pipelines.
//! - [`json::snapshot`] — the full reveal state of a
//!   [`LayerManager`](lamina_core::layer::LayerManager) as JSON.

pub mod json;
pub mod pretty;

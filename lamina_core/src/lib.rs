// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchy allocation and progressive level reveal for map features.
//!
//! `lamina_core` partitions the features of each category into an ordered
//! hierarchy of levels, then lets a user reveal and conceal those levels one
//! at a time while stamps pin already-revealed context on screen. It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Feature provider
//!       │
//!       ▼
//!   FeatureRecord[] ──► allocate(Hierarchy) ──► Layer[] ──► LayerCategory
//!                                                                │
//!                 ┌──────────────────────────────────────────────┘
//!                 ▼
//!   LayerManager ◄── increment / decrement / add_stamp / toggle_category
//!       │
//!       ▼
//!   LayerManager::evaluate() ──► LevelChanges ──► Presenter::apply()
//! ```
//!
//! **[`feature`]** — Feature records: geometry built on `kurbo` plus a
//! scalar property map.
//!
//! **[`allocate`]** — The manual (predicate) allocator and the area
//! allocator with its percentile, fraction and natural-break strategies.
//!
//! **[`layer`]** — Layers, the per-category reveal state machine, and the
//! [`LayerManager`](layer::LayerManager) with its z-index assignment.
//!
//! **[`style`]** — Static and per-feature style descriptors.
//!
//! **[`stamp`]** — Circular lock regions.
//!
//! **[`dirty`]** — Change tracking channels via `understory_dirty`.
//!
//! **[`backend`]** — The [`Presenter`](backend::Presenter) trait that
//! rendering collaborators implement.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod allocate;
pub mod backend;
pub mod dirty;
pub mod feature;
pub mod layer;
pub mod stamp;
pub mod style;
pub mod trace;

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON configuration for lamina hierarchies.
//!
//! A [`DataConfig`] lists categories in display order; each names its data
//! source and a hierarchy (`manual` predicate levels or `area` bucketing).
//! [`build_manager`] resolves every hierarchy, loads features through a
//! [`FeatureProvider`], allocates them, and returns a ready
//! [`LayerManager`](lamina_core::layer::LayerManager).
//!
//! ```rust,ignore
//! let config = DataConfig::from_reader(File::open("dataConfig.json")?)?;
//! let mut manager = build_manager(&config, &mut GeoJsonProvider::new("data/"))?;
//! ```

mod color;
mod error;
mod model;
mod provider;

pub use color::parse_color;
pub use error::ConfigError;
pub use model::{CategoryConfig, DataConfig, HierarchyConfig, InitialLevelConfig};
pub use provider::{FeatureProvider, MemoryProvider, build_manager, build_manager_traced};

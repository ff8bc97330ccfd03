// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature loading and manager construction.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::error::Error;

use lamina_core::feature::FeatureRecord;
use lamina_core::layer::{LayerCategory, LayerManager};
use lamina_core::trace::Tracer;

use crate::ConfigError;
use crate::model::{CategoryConfig, DataConfig};

/// Loads the features of one category from its data source.
///
/// The data source descriptor (`dataFileName`, `fileType`) is opaque to
/// this crate; decoding geographic formats is the provider's job.
pub trait FeatureProvider {
    /// Error reported when a data source cannot be loaded.
    type Error: Error + Send + Sync + 'static;

    /// Returns the features of the category at `index`.
    fn load(
        &mut self,
        index: usize,
        category: &CategoryConfig,
    ) -> Result<Vec<FeatureRecord>, Self::Error>;
}

/// A provider serving pre-decoded features by category name.
///
/// Categories without an entry load as empty.
#[derive(Clone, Debug, Default)]
pub struct MemoryProvider {
    features: BTreeMap<String, Vec<FeatureRecord>>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the features of the category called `name`.
    #[must_use]
    pub fn with_category(mut self, name: impl Into<String>, features: Vec<FeatureRecord>) -> Self {
        self.features.insert(name.into(), features);
        self
    }
}

impl FeatureProvider for MemoryProvider {
    type Error = Infallible;

    fn load(
        &mut self,
        _index: usize,
        category: &CategoryConfig,
    ) -> Result<Vec<FeatureRecord>, Self::Error> {
        Ok(self.features.remove(&category.name).unwrap_or_default())
    }
}

/// Builds a manager with every configured category, in configuration order.
///
/// # Errors
///
/// See [`build_manager_traced`].
pub fn build_manager(
    config: &DataConfig,
    provider: &mut impl FeatureProvider,
) -> Result<LayerManager, ConfigError> {
    build_manager_traced(config, provider, &mut Tracer::none())
}

/// Like [`build_manager`], reporting each allocation to `tracer`.
///
/// Every hierarchy definition is validated before any data is loaded, so a
/// bad configuration fails without touching the provider. A category's
/// index is always its position in the configuration.
///
/// # Errors
///
/// Returns the first hierarchy definition error, then any
/// [`ConfigError::Provider`] or [`ConfigError::Alloc`] failure, and
/// [`ConfigError::Manager`] for a configuration without categories.
pub fn build_manager_traced(
    config: &DataConfig,
    provider: &mut impl FeatureProvider,
    tracer: &mut Tracer<'_>,
) -> Result<LayerManager, ConfigError> {
    let hierarchies = config
        .categories
        .iter()
        .map(CategoryConfig::hierarchy)
        .collect::<Result<Vec<_>, _>>()?;

    let mut categories = Vec::with_capacity(hierarchies.len());
    for (index, (category, hierarchy)) in config.categories.iter().zip(&hierarchies).enumerate() {
        let features =
            provider
                .load(index, category)
                .map_err(|source| ConfigError::Provider {
                    category: category.name.clone(),
                    source: Box::new(source),
                })?;
        let built = LayerCategory::allocate(
            &category.name,
            index,
            hierarchy,
            features,
            category.initial_level.into(),
            tracer,
        )
        .map_err(|source| ConfigError::Alloc {
            category: category.name.clone(),
            source,
        })?;
        categories.push(built);
    }

    Ok(LayerManager::new(categories)?)
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use kurbo::{Circle, Point};
    use lamina_core::feature::{FeatureId, Geometry};
    use lamina_core::layer::{LayerAddress, ManagerError};

    use super::*;

    const CONFIG: &str = r#"{ "categories": [
        {
            "name": "Roads",
            "dataFileName": "roads.geojson",
            "fileType": "geojson",
            "hierarchy": { "type": "manual", "definition": { "levels": [
                { "properties": [{ "key": "highway", "value": "motorway" }],
                  "style": { "stroke": { "color": "#e892a2", "width": 4 } } },
                { "properties": [{ "key": "highway", "value": "trunk" }], "style": {} },
                { "properties": [{ "key": "highway", "value": "primary" }], "style": {} }
            ] } }
        },
        {
            "name": "Lakes",
            "dataFileName": "lakes.topojson",
            "fileType": "topojson",
            "initialLevel": "hidden",
            "hierarchy": { "type": "area", "definition": { "divisions": 2, "strategy": "cluster" } }
        }
    ] }"#;

    fn road(id: u32, highway: &str) -> FeatureRecord {
        FeatureRecord::new(FeatureId(id), Geometry::Point(Point::ORIGIN)).with_property("highway", highway)
    }

    fn lake(id: u32, radius: f64) -> FeatureRecord {
        FeatureRecord::new(FeatureId(id), Geometry::Circle(Circle::new(Point::ORIGIN, radius)))
    }

    fn provider() -> MemoryProvider {
        MemoryProvider::new()
            .with_category(
                "Roads",
                vec![road(1, "motorway"), road(2, "primary"), road(3, "footway")],
            )
            .with_category("Lakes", vec![lake(10, 10.0), lake(11, 9.0), lake(12, 1.0)])
    }

    #[test]
    fn builds_categories_in_order() {
        let config = DataConfig::from_json(CONFIG).unwrap();
        let m = build_manager(&config, &mut provider()).unwrap();

        assert_eq!(m.category_count(), 2);
        let roads = m.category(0).unwrap();
        assert_eq!(roads.name(), "Roads");
        assert_eq!(roads.len(), 2, "trunk level had no features");
        assert_eq!(roads.layers()[1].source_level(), 2);
        assert_eq!(roads.current_level(), Some(0));

        let lakes = m.category(1).unwrap();
        assert_eq!(lakes.current_level(), None, "configured hidden");
        assert_eq!(lakes.len(), 2);
        assert_eq!(m.active_category(), 1);

        assert_eq!(m.locate(FeatureId(12)), Some(LayerAddress { category: 1, level: 1 }));
        assert_eq!(m.locate(FeatureId(3)), None, "footway matches no level");

        let z: Vec<i32> = m.handles().iter().map(|h| h.z_index).collect();
        assert_eq!(z, vec![1, 0, 3, 2]);
    }

    #[test]
    fn bad_definition_fails_before_loading() {
        struct Panicking;
        impl FeatureProvider for Panicking {
            type Error = Infallible;
            fn load(&mut self, _: usize, _: &CategoryConfig) -> Result<Vec<FeatureRecord>, Infallible> {
                panic!("provider must not be called");
            }
        }

        let config = DataConfig::from_json(
            r#"{ "categories": [
                { "name": "ok", "hierarchy": { "type": "area", "definition": { "divisions": 2 } } },
                { "name": "bad", "hierarchy": { "type": "grid", "definition": {} } }
            ] }"#,
        )
        .unwrap();
        let err = build_manager(&config, &mut Panicking).unwrap_err();
        assert!(
            matches!(&err, ConfigError::UnknownHierarchyType { category, kind }
                if category == "bad" && kind == "grid"),
            "got {err}"
        );
    }

    #[test]
    fn provider_errors_are_chained() {
        #[derive(Debug)]
        struct Missing;
        impl fmt::Display for Missing {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("file not found")
            }
        }
        impl Error for Missing {}

        struct Failing;
        impl FeatureProvider for Failing {
            type Error = Missing;
            fn load(&mut self, _: usize, _: &CategoryConfig) -> Result<Vec<FeatureRecord>, Missing> {
                Err(Missing)
            }
        }

        let config = DataConfig::from_json(CONFIG).unwrap();
        let err = build_manager(&config, &mut Failing).unwrap_err();
        assert_eq!(err.to_string(), "category `Roads`: failed to load features: file not found");
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("file not found"));
    }

    #[test]
    fn empty_configuration_has_no_manager() {
        let err = build_manager(&DataConfig::default(), &mut MemoryProvider::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Manager(ManagerError::NoCategories)), "got {err}");
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = DataConfig::from_json("{ \"categories\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)), "got {err}");
        assert!(err.source().is_some(), "serde error is chained");
    }
}

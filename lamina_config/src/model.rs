// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The JSON configuration model.
//!
//! ```json
//! {
//!   "categories": [
//!     {
//!       "name": "Roads",
//!       "dataFileName": "roads.geojson",
//!       "fileType": "geojson",
//!       "initialLevel": "first",
//!       "hierarchy": {
//!         "type": "manual",
//!         "definition": {
//!           "levels": [
//!             {
//!               "properties": [{ "key": "highway", "value": "motorway" }],
//!               "style": { "stroke": { "color": "#e892a2", "width": 4 } }
//!             }
//!           ]
//!         }
//!       }
//!     },
//!     {
//!       "name": "Parks",
//!       "dataFileName": "parks.topojson",
//!       "fileType": "topojson",
//!       "hierarchy": { "type": "area", "definition": { "divisions": 4 } }
//!     }
//!   ]
//! }
//! ```
//!
//! The hierarchy definition is kept as raw JSON until
//! [`CategoryConfig::hierarchy`] interprets it according to its `type`, so
//! that an unknown type is reported by name instead of as a shape mismatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lamina_core::allocate::{
    AreaHierarchy, AreaStrategy, Hierarchy, ManualHierarchy, ManualLevel, Predicate,
};
use lamina_core::feature::PropertyValue;
use lamina_core::layer::InitialLevel;
use lamina_core::style::{Stroke, Style};

use crate::ConfigError;
use crate::color::parse_color;

/// Top-level configuration: categories in display order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DataConfig {
    /// Categories; the position of each is its category index.
    pub categories: Vec<CategoryConfig>,
}

impl DataConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a configuration document from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed or cannot
    /// be read.
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Where a category's reveal level starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialLevelConfig {
    /// Nothing revealed.
    Hidden,
    /// Level 0 revealed.
    #[default]
    First,
    /// Every level revealed.
    Full,
}

impl From<InitialLevelConfig> for InitialLevel {
    fn from(config: InitialLevelConfig) -> Self {
        match config {
            InitialLevelConfig::Hidden => Self::Hidden,
            InitialLevelConfig::First => Self::First,
            InitialLevelConfig::Full => Self::Full,
        }
    }
}

/// One category: its data source and how to build its hierarchy.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
    /// Display name.
    pub name: String,
    /// Data source descriptor, passed to the feature provider as is.
    #[serde(default)]
    pub data_file_name: Option<String>,
    /// Data format hint, such as `geojson` or `topojson`.
    #[serde(default)]
    pub file_type: Option<String>,
    /// Initial reveal level.
    #[serde(default)]
    pub initial_level: InitialLevelConfig,
    /// Hierarchy type and definition.
    pub hierarchy: HierarchyConfig,
}

/// A hierarchy type tag plus its uninterpreted definition.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct HierarchyConfig {
    /// `manual` or `area`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific definition.
    #[serde(default)]
    pub definition: Value,
}

// -- Manual definitions --

#[derive(Debug, Deserialize)]
struct ManualDefinition {
    #[serde(alias = "layers")]
    levels: Vec<LevelConfig>,
}

#[derive(Debug, Deserialize)]
struct LevelConfig {
    properties: Vec<PropertyConfig>,
    #[serde(default)]
    style: StyleConfig,
}

#[derive(Debug, Deserialize)]
struct PropertyConfig {
    key: String,
    value: Value,
}

#[derive(Debug, Default, Deserialize)]
struct StyleConfig {
    #[serde(default)]
    stroke: Option<StrokeConfig>,
    #[serde(default)]
    text: Option<TextConfig>,
}

#[derive(Debug, Deserialize)]
struct StrokeConfig {
    color: String,
    #[serde(default = "default_stroke_width")]
    width: f64,
}

#[derive(Debug, Deserialize)]
struct TextConfig {
    field: String,
}

fn default_stroke_width() -> f64 {
    1.0
}

/// Label field used when a level has neither stroke nor text style.
const DEFAULT_LABEL_FIELD: &str = "name";

// -- Area definitions --

#[derive(Debug, Deserialize)]
struct AreaDefinition {
    divisions: usize,
    #[serde(default)]
    strategy: Option<String>,
}

impl CategoryConfig {
    /// Interprets the hierarchy definition.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownHierarchyType`] for a type other than
    /// `manual` or `area`, and the matching definition error if the
    /// definition is malformed.
    pub fn hierarchy(&self) -> Result<Hierarchy, ConfigError> {
        match self.hierarchy.kind.as_str() {
            "manual" => self.manual_hierarchy().map(Hierarchy::Manual),
            "area" => self.area_hierarchy().map(Hierarchy::Area),
            other => Err(ConfigError::UnknownHierarchyType {
                category: self.name.clone(),
                kind: other.to_owned(),
            }),
        }
    }

    fn definition<T: serde::de::DeserializeOwned>(&self) -> Result<T, ConfigError> {
        T::deserialize(&self.hierarchy.definition).map_err(|source| {
            ConfigError::InvalidDefinition {
                category: self.name.clone(),
                source,
            }
        })
    }

    fn manual_hierarchy(&self) -> Result<ManualHierarchy, ConfigError> {
        let definition: ManualDefinition = self.definition()?;
        let levels = definition
            .levels
            .into_iter()
            .map(|level| -> Result<ManualLevel, ConfigError> {
                let predicates = level
                    .properties
                    .into_iter()
                    .map(|p| -> Result<Predicate, ConfigError> {
                        let value = scalar(p.value).ok_or_else(|| {
                            ConfigError::InvalidPropertyValue {
                                category: self.name.clone(),
                                key: p.key.clone(),
                            }
                        })?;
                        Ok(Predicate::new(p.key, value))
                    })
                    .collect::<Result<Vec<_>, ConfigError>>()?;
                Ok(ManualLevel {
                    predicates,
                    style: level.style.into_style()?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(ManualHierarchy { levels })
    }

    fn area_hierarchy(&self) -> Result<AreaHierarchy, ConfigError> {
        let definition: AreaDefinition = self.definition()?;
        if definition.divisions == 0 {
            return Err(ConfigError::ZeroDivisions {
                category: self.name.clone(),
            });
        }
        let strategy = match definition.strategy.as_deref() {
            None => AreaStrategy::default(),
            Some("percentile") => AreaStrategy::Percentile,
            Some("fraction") => AreaStrategy::Fraction,
            Some("cluster") => AreaStrategy::Cluster,
            Some(other) => {
                return Err(ConfigError::UnknownStrategy {
                    category: self.name.clone(),
                    strategy: other.to_owned(),
                });
            }
        };
        Ok(AreaHierarchy::new(definition.divisions, strategy))
    }
}

impl StyleConfig {
    fn into_style(self) -> Result<Style, ConfigError> {
        Ok(match (self.stroke, self.text) {
            (Some(stroke), _) => Style::Fixed(Stroke {
                color: parse_color(&stroke.color)?,
                width: stroke.width,
            }),
            (None, Some(text)) => Style::TextLabel { field: text.field },
            (None, None) => Style::TextLabel {
                field: DEFAULT_LABEL_FIELD.to_owned(),
            },
        })
    }
}

/// Converts a JSON scalar to a property value; arrays and objects have no
/// counterpart.
pub(crate) fn scalar(value: Value) -> Option<PropertyValue> {
    match value {
        Value::Null => Some(PropertyValue::Null),
        Value::Bool(b) => Some(PropertyValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(PropertyValue::Number),
        Value::String(s) => Some(PropertyValue::String(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use std::error::Error;
use std::fmt;

use lamina_core::allocate::AllocError;
use lamina_core::layer::ManagerError;

/// Errors from parsing a configuration or building a manager from it.
#[derive(Debug)]
pub enum ConfigError {
    /// The document is not valid JSON or does not have the expected shape.
    Json(serde_json::Error),
    /// A category names a hierarchy type other than `manual` or `area`.
    UnknownHierarchyType {
        /// Category name.
        category: String,
        /// The unrecognized type.
        kind: String,
    },
    /// A hierarchy definition does not match its type.
    InvalidDefinition {
        /// Category name.
        category: String,
        /// What serde rejected.
        source: serde_json::Error,
    },
    /// A manual predicate value is not a scalar.
    InvalidPropertyValue {
        /// Category name.
        category: String,
        /// Predicate key.
        key: String,
    },
    /// An area definition names an unknown strategy.
    UnknownStrategy {
        /// Category name.
        category: String,
        /// The unrecognized strategy.
        strategy: String,
    },
    /// An area definition asks for zero divisions.
    ZeroDivisions {
        /// Category name.
        category: String,
    },
    /// A colour string could not be parsed.
    InvalidColor(String),
    /// The feature provider failed to load a category.
    Provider {
        /// Category name.
        category: String,
        /// The provider's error.
        source: Box<dyn Error + Send + Sync>,
    },
    /// Allocation failed.
    Alloc {
        /// Category name.
        category: String,
        /// The allocator's error.
        source: AllocError,
    },
    /// The manager could not be built.
    Manager(ManagerError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "invalid configuration: {e}"),
            Self::UnknownHierarchyType { category, kind } => {
                write!(f, "category `{category}`: unknown hierarchy type `{kind}`")
            }
            Self::InvalidDefinition { category, source } => {
                write!(f, "category `{category}`: invalid hierarchy definition: {source}")
            }
            Self::InvalidPropertyValue { category, key } => {
                write!(f, "category `{category}`: predicate `{key}` must be a scalar")
            }
            Self::UnknownStrategy { category, strategy } => {
                write!(f, "category `{category}`: unknown area strategy `{strategy}`")
            }
            Self::ZeroDivisions { category } => {
                write!(f, "category `{category}`: area hierarchy needs at least one division")
            }
            Self::InvalidColor(color) => write!(f, "invalid colour `{color}`"),
            Self::Provider { category, source } => {
                write!(f, "category `{category}`: failed to load features: {source}")
            }
            Self::Alloc { category, source } => write!(f, "category `{category}`: {source}"),
            Self::Manager(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(e) | Self::InvalidDefinition { source: e, .. } => Some(e),
            Self::Provider { source, .. } => Some(source.as_ref()),
            Self::Alloc { source, .. } => Some(source),
            Self::Manager(e) => Some(e),
            Self::UnknownHierarchyType { .. }
            | Self::InvalidPropertyValue { .. }
            | Self::UnknownStrategy { .. }
            | Self::ZeroDivisions { .. }
            | Self::InvalidColor(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<ManagerError> for ConfigError {
    fn from(e: ManagerError) -> Self {
        Self::Manager(e)
    }
}

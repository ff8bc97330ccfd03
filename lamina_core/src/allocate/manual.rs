// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule-based allocation: first matching level wins.

use alloc::string::String;
use alloc::vec::Vec;

use super::Allocation;
use crate::feature::{FeatureRecord, PropertyValue};
use crate::layer::Layer;
use crate::style::Style;

/// A `(key, value)` test against a feature property.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    /// Property name.
    pub key: String,
    /// Required value.
    pub value: PropertyValue,
}

impl Predicate {
    /// Creates a predicate.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns whether the feature carries `key` with exactly `value`.
    #[must_use]
    pub fn matches(&self, feature: &FeatureRecord) -> bool {
        feature.property(&self.key) == Some(&self.value)
    }
}

/// One configured level of a manual hierarchy.
#[derive(Clone, Debug)]
pub struct ManualLevel {
    /// A feature belongs here if any predicate matches.
    pub predicates: Vec<Predicate>,
    /// Style of the layer built for this level.
    pub style: Style,
}

/// An ordered list of predicate levels.
#[derive(Clone, Debug, Default)]
pub struct ManualHierarchy {
    /// Levels in priority order; index is the level number.
    pub levels: Vec<ManualLevel>,
}

impl ManualHierarchy {
    /// Returns the lowest-indexed level with a matching predicate.
    #[must_use]
    pub fn level_of(&self, feature: &FeatureRecord) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.predicates.iter().any(|p| p.matches(feature)))
    }
}

pub(crate) fn allocate_manual(
    category: usize,
    hierarchy: &ManualHierarchy,
    features: Vec<FeatureRecord>,
) -> Allocation {
    let mut buckets: Vec<Option<Layer>> = hierarchy.levels.iter().map(|_| None).collect();
    let mut dropped = 0;

    for feature in features {
        let Some(level) = hierarchy.level_of(&feature) else {
            dropped += 1;
            continue;
        };
        buckets[level]
            .get_or_insert_with(|| Layer::new(category, level, hierarchy.levels[level].style.clone()))
            .add_feature(feature);
    }

    Allocation {
        layers: buckets.into_iter().flatten().collect(),
        dropped,
    }
}

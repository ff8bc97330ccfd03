// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchy allocation: features in, non-empty layers out.
//!
//! A [`Hierarchy`] is a closed set of allocation schemes. [`allocate`] is
//! the single dispatch point: it runs the scheme, reports the outcome to
//! the tracer, and hands back the non-empty layers in level order.
//!
//! ```text
//!   FeatureRecord[] ──► allocate(Hierarchy) ──► Allocation ──► LayerCategory
//!                          │
//!                          ├─ Manual: first matching predicate level
//!                          └─ Area:   sort by area, then
//!                                     Percentile | Fraction | Cluster
//! ```
//!
//! Allocation is a one-shot batch step. It consumes the features; each
//! retained feature ends up in exactly one layer.

mod area;
mod manual;

use alloc::vec::Vec;
use core::fmt;

pub use area::{
    AreaHierarchy, AreaStrategy, cluster_buckets, fraction_buckets, gap_ratio, natural_breaks,
    percentile_buckets,
};
pub use manual::{ManualHierarchy, ManualLevel, Predicate};

use crate::feature::FeatureRecord;
use crate::layer::Layer;
use crate::trace::{AllocatorKind, CategoryAllocatedEvent, Tracer};

/// How a category's features are assigned to levels.
#[derive(Clone, Debug)]
pub enum Hierarchy {
    /// Rule-based: predicate levels, first match wins.
    Manual(ManualHierarchy),
    /// Metric-based: bucket by enclosed area.
    Area(AreaHierarchy),
}

impl Hierarchy {
    /// Returns which allocator this hierarchy runs.
    #[must_use]
    pub fn allocator(&self) -> AllocatorKind {
        match self {
            Self::Manual(_) => AllocatorKind::Manual,
            Self::Area(area) => match area.strategy {
                AreaStrategy::Percentile => AllocatorKind::Percentile,
                AreaStrategy::Fraction => AllocatorKind::Fraction,
                AreaStrategy::Cluster => AllocatorKind::Cluster,
            },
        }
    }
}

/// The result of allocating one category.
#[derive(Debug)]
pub struct Allocation {
    /// Non-empty layers in ascending level order. Each layer's
    /// [`source_level`](Layer::source_level) is the level it was built at.
    pub layers: Vec<Layer>,
    /// Number of features no level accepted.
    pub dropped: usize,
}

/// Errors from [`allocate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// An area hierarchy asked for zero divisions.
    ZeroDivisions,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDivisions => f.write_str("area hierarchy needs at least one division"),
        }
    }
}

impl core::error::Error for AllocError {}

/// Allocates `features` into the layers of category `category`.
///
/// # Errors
///
/// Returns [`AllocError::ZeroDivisions`] for an area hierarchy with no
/// divisions.
pub fn allocate(
    category: usize,
    hierarchy: &Hierarchy,
    features: Vec<FeatureRecord>,
    tracer: &mut Tracer<'_>,
) -> Result<Allocation, AllocError> {
    let offered = features.len();
    let allocation = match hierarchy {
        Hierarchy::Manual(manual) => manual::allocate_manual(category, manual, features),
        Hierarchy::Area(area) => area::allocate_area(category, area, features)?,
    };
    tracer.category_allocated(&CategoryAllocatedEvent {
        category,
        allocator: hierarchy.allocator(),
        features: offered,
        dropped: allocation.dropped,
        layers: allocation.layers.len(),
    });
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::{Circle, Point};

    use super::*;
    use crate::feature::{FeatureId, Geometry};
    use crate::style::Style;

    fn circle(id: u32, radius: f64) -> FeatureRecord {
        FeatureRecord::new(FeatureId(id), Geometry::Circle(Circle::new(Point::ORIGIN, radius)))
    }

    #[test]
    fn dispatches_by_variant() {
        let manual = Hierarchy::Manual(ManualHierarchy {
            levels: vec![ManualLevel {
                predicates: vec![Predicate::new("kind", "lake")],
                style: Style::TextLabel {
                    field: "name".into(),
                },
            }],
        });
        let features = vec![
            circle(1, 1.0).with_property("kind", "lake"),
            circle(2, 1.0).with_property("kind", "pond"),
        ];
        let alloc = allocate(0, &manual, features, &mut Tracer::none()).unwrap();
        assert_eq!(alloc.layers.len(), 1);
        assert_eq!(alloc.dropped, 1);
        assert_eq!(manual.allocator(), AllocatorKind::Manual);

        let area = Hierarchy::Area(AreaHierarchy::new(2, AreaStrategy::Fraction));
        let features = vec![circle(1, 3.0), circle(2, 2.0), circle(3, 1.0)];
        let alloc = allocate(1, &area, features, &mut Tracer::none()).unwrap();
        let sizes: Vec<usize> = alloc.layers.iter().map(Layer::len).collect();
        assert_eq!(sizes, vec![2, 1], "chunk of ceil(3 / 2) = 2");
        assert_eq!(area.allocator(), AllocatorKind::Fraction);
    }

    #[test]
    fn zero_divisions_propagates() {
        let area = Hierarchy::Area(AreaHierarchy::new(0, AreaStrategy::Cluster));
        let err = allocate(0, &area, vec![circle(1, 1.0)], &mut Tracer::none()).unwrap_err();
        assert_eq!(err, AllocError::ZeroDivisions);
    }

    #[test]
    fn default_strategy_is_cluster() {
        assert_eq!(AreaStrategy::default(), AreaStrategy::Cluster);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn allocation_is_traced() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Last(Option<(usize, usize, usize)>);
        impl TraceSink for Last {
            fn on_category_allocated(&mut self, e: &CategoryAllocatedEvent) {
                self.0 = Some((e.features, e.dropped, e.layers));
            }
        }

        let mut sink = Last::default();
        let area = Hierarchy::Area(AreaHierarchy::new(3, AreaStrategy::Cluster));
        let features = vec![
            circle(1, 4.0),
            circle(2, 1.0),
            FeatureRecord::new(FeatureId(3), Geometry::Point(Point::ORIGIN)),
        ];
        let _ = allocate(5, &area, features, &mut Tracer::new(&mut sink)).unwrap();
        assert_eq!(sink.0, Some((3, 1, 2)));
    }
}

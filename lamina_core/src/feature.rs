// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature records: the unit being classified.
//!
//! A [`FeatureRecord`] pairs a [`Geometry`] with a key → scalar property map.
//! Records are produced by an external feature provider, are immutable once
//! produced, and are moved into exactly one [`Layer`](crate::layer::Layer)
//! by allocation (or dropped, if no level accepts them).

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{BezPath, Circle, Point, Rect, Shape};

/// Provider-assigned identity of a feature.
///
/// Used as the key of the manager's feature → layer side-table, so that
/// allocation never has to write back into records owned upstream.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub u32);

impl fmt::Debug for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureId({})", self.0)
    }
}

/// A scalar property value.
///
/// Comparison is strict: values of different kinds are never equal, so
/// `Number(1.0)` does not match `String("1")`.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A polygon with one exterior ring and zero or more holes.
///
/// Rings are open point lists; the closing edge back to the first point is
/// implied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    /// Outer boundary.
    pub exterior: Vec<Point>,
    /// Holes cut out of the exterior.
    pub interiors: Vec<Vec<Point>>,
}

impl Polygon {
    /// Creates a polygon without holes.
    #[must_use]
    pub fn new(exterior: Vec<Point>) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }

    /// Returns the enclosed area: exterior minus holes, never negative.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|ring| ring_area(ring)).sum();
        (ring_area(&self.exterior) - holes).max(0.0)
    }
}

/// Geometry of a feature.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A single position.
    Point(Point),
    /// An open polyline.
    LineString(Vec<Point>),
    /// A polygon.
    Polygon(Polygon),
    /// A collection of polygons.
    MultiPolygon(Vec<Polygon>),
    /// A circle.
    Circle(Circle),
}

impl Geometry {
    /// Returns whether this geometry encloses an area.
    ///
    /// Only circles, polygons, and multi-polygons qualify for metric-based
    /// allocation.
    #[must_use]
    pub fn is_area_bearing(&self) -> bool {
        matches!(self, Self::Polygon(_) | Self::MultiPolygon(_) | Self::Circle(_))
    }

    /// Returns the enclosed area (zero for points and lines).
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Self::Point(_) | Self::LineString(_) => 0.0,
            Self::Polygon(p) => p.area(),
            Self::MultiPolygon(ps) => ps.iter().map(Polygon::area).sum(),
            Self::Circle(c) => c.area(),
        }
    }

    /// Returns the axis-aligned extent, or `None` for an empty geometry.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        match self {
            Self::Point(p) => Some(Rect::from_points(*p, *p)),
            Self::LineString(points) => points_extent(points),
            Self::Polygon(p) => points_extent(&p.exterior),
            Self::MultiPolygon(ps) => ps
                .iter()
                .filter_map(|p| points_extent(&p.exterior))
                .reduce(|a, b| a.union(b)),
            Self::Circle(c) => Some(c.bounding_box()),
        }
    }
}

/// A feature: geometry plus properties.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRecord {
    /// Identity assigned by the provider.
    pub id: FeatureId,
    /// The feature's shape.
    pub geometry: Geometry,
    /// Scalar properties keyed by name.
    pub properties: BTreeMap<String, PropertyValue>,
}

impl FeatureRecord {
    /// Creates a record with no properties.
    #[must_use]
    pub fn new(id: FeatureId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            properties: BTreeMap::new(),
        }
    }

    /// Adds a property, returning the record (builder style).
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns the value of a property, if the feature carries it.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Returns the allocation metric: the enclosed area for area-bearing
    /// geometry, `None` otherwise.
    #[must_use]
    pub fn metric(&self) -> Option<f64> {
        self.geometry
            .is_area_bearing()
            .then(|| self.geometry.area())
    }
}

fn ring_area(ring: &[Point]) -> f64 {
    let mut points = ring.iter();
    let Some(first) = points.next() else {
        return 0.0;
    };
    let mut path = BezPath::new();
    path.move_to(*first);
    for p in points {
        path.line_to(*p);
    }
    path.close_path();
    path.area().abs()
}

fn points_extent(points: &[Point]) -> Option<Rect> {
    points
        .iter()
        .map(|p| Rect::from_points(*p, *p))
        .reduce(|a, b| a.union(b))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn polygon_area_subtracts_holes() {
        let mut poly = Polygon::new(square(10.0));
        assert!((poly.area() - 100.0).abs() < 1e-9, "plain square");
        poly.interiors.push(square(2.0));
        assert!((poly.area() - 96.0).abs() < 1e-9, "square with hole");
    }

    #[test]
    fn ring_orientation_does_not_matter() {
        let mut ring = square(3.0);
        ring.reverse();
        assert!((Polygon::new(ring).area() - 9.0).abs() < 1e-9, "clockwise ring");
    }

    #[test]
    fn only_enclosing_geometry_bears_area() {
        let line = Geometry::LineString(vec![Point::ORIGIN, Point::new(5.0, 5.0)]);
        let circle = Geometry::Circle(Circle::new(Point::ORIGIN, 1.0));
        assert!(!line.is_area_bearing(), "lines have no area");
        assert!(circle.is_area_bearing(), "circles have area");
        assert_eq!(line.area(), 0.0);
        assert!((circle.area() - core::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn multipolygon_area_and_extent() {
        let a = Polygon::new(square(1.0));
        let b = Polygon::new(vec![
            Point::new(5.0, 5.0),
            Point::new(7.0, 5.0),
            Point::new(7.0, 7.0),
            Point::new(5.0, 7.0),
        ]);
        let geom = Geometry::MultiPolygon(vec![a, b]);
        assert!((geom.area() - 5.0).abs() < 1e-9, "1 + 4");
        assert_eq!(geom.bounding_box(), Some(Rect::new(0.0, 0.0, 7.0, 7.0)));
    }

    #[test]
    fn empty_geometry_has_no_extent() {
        assert_eq!(Geometry::LineString(Vec::new()).bounding_box(), None);
        assert_eq!(Polygon::default().area(), 0.0);
    }

    #[test]
    fn metric_only_for_area_bearing() {
        let point = FeatureRecord::new(FeatureId(1), Geometry::Point(Point::ORIGIN));
        assert_eq!(point.metric(), None);
        let poly = FeatureRecord::new(FeatureId(2), Geometry::Polygon(Polygon::new(square(2.0))));
        let metric = poly.metric().unwrap();
        assert!((metric - 4.0).abs() < 1e-9, "square of side 2");
    }

    #[test]
    fn property_values_compare_strictly() {
        let f = FeatureRecord::new(FeatureId(0), Geometry::Point(Point::ORIGIN))
            .with_property("highway", "primary")
            .with_property("lanes", 2.0);
        assert_eq!(f.property("highway"), Some(&PropertyValue::from("primary")));
        assert_ne!(f.property("lanes"), Some(&PropertyValue::from("2")));
        assert_eq!(f.property("missing"), None);
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User-placed lock regions.
//!
//! A [`Stamp`] is a circle given by its center and one point on its
//! perimeter. Once appended to a layer it pins that layer visible: later
//! decrements leave the layer on screen, clipped to its stamp circles.
//! Stamps are never mutated or removed.

use core::fmt;

use kurbo::{Circle, Point, Vec2};

/// Errors from [`Stamp`] construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StampError {
    /// A coordinate was NaN or infinite.
    NonFinite(Point),
    /// A brush radius was negative or not finite.
    InvalidRadius(f64),
}

impl fmt::Display for StampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(p) => write!(f, "stamp coordinate is not finite: ({}, {})", p.x, p.y),
            Self::InvalidRadius(r) => write!(f, "invalid stamp radius {r}"),
        }
    }
}

impl core::error::Error for StampError {}

/// A circular lock region in map coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stamp {
    center: Point,
    perimeter: Point,
}

impl Stamp {
    /// Creates a stamp from its center and a point on its perimeter.
    ///
    /// # Errors
    ///
    /// Returns [`StampError::NonFinite`] if either point has a NaN or
    /// infinite coordinate.
    pub fn new(center: Point, perimeter: Point) -> Result<Self, StampError> {
        for p in [center, perimeter] {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(StampError::NonFinite(p));
            }
        }
        Ok(Self { center, perimeter })
    }

    /// Creates a stamp the way a round brush does: the perimeter point lies
    /// `radius` to the right of `center`.
    ///
    /// # Errors
    ///
    /// Returns [`StampError::InvalidRadius`] for a negative or non-finite
    /// radius, and [`StampError::NonFinite`] for a non-finite center.
    pub fn from_brush(center: Point, radius: f64) -> Result<Self, StampError> {
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(StampError::InvalidRadius(radius));
        }
        Self::new(center, center + Vec2::new(radius, 0.0))
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Returns the perimeter point.
    #[must_use]
    pub fn perimeter(&self) -> Point {
        self.perimeter
    }

    /// Returns the radius implied by the perimeter point.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.center.distance(self.perimeter)
    }

    /// Returns the stamp as a circle.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius())
    }

    /// Returns whether `point` lies inside or on the stamp.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.radius()
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer style descriptors.
//!
//! A [`Style`] is either a static descriptor shared by every feature in the
//! layer, or a rule evaluated per feature. Renderers call
//! [`Style::resolve`] to obtain concrete drawing attributes.

use alloc::string::{String, ToString};

use crate::feature::FeatureRecord;

/// An 8-bit RGB colour with floating-point alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha, 0.0 (transparent) to 1.0 (opaque).
    pub a: f32,
}

impl Rgba {
    /// Creates a colour.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque colour.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// An outline stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke colour.
    pub color: Rgba,
    /// Stroke width in pixels.
    pub width: f64,
}

/// Maps a fraction in `0.0..=1.0` to a fill colour.
pub type GradientFn = fn(f64) -> Rgba;

/// How the features of a layer are drawn.
#[derive(Clone, Debug)]
pub enum Style {
    /// The same stroke for every feature.
    Fixed(Stroke),
    /// Draw each feature's `field` property as a text label.
    TextLabel {
        /// Property to read the label from.
        field: String,
    },
    /// Fill every feature with `gradient(fraction)`.
    FractionalFill {
        /// Position of the layer on the gradient.
        fraction: f64,
        /// Colour ramp.
        gradient: GradientFn,
    },
}

/// Concrete drawing attributes for one feature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedStyle {
    /// Outline, if any.
    pub stroke: Option<Stroke>,
    /// Fill colour, if any.
    pub fill: Option<Rgba>,
    /// Label text, if any.
    pub text: Option<String>,
}

impl Style {
    /// Resolves the style for a single feature.
    ///
    /// A text label whose field the feature does not carry resolves to no
    /// text at all.
    #[must_use]
    pub fn resolve(&self, feature: &FeatureRecord) -> ResolvedStyle {
        match self {
            Self::Fixed(stroke) => ResolvedStyle {
                stroke: Some(*stroke),
                ..ResolvedStyle::default()
            },
            Self::TextLabel { field } => ResolvedStyle {
                text: feature.property(field).map(ToString::to_string),
                ..ResolvedStyle::default()
            },
            Self::FractionalFill { fraction, gradient } => ResolvedStyle {
                fill: Some(gradient(*fraction)),
                ..ResolvedStyle::default()
            },
        }
    }
}

/// Default area gradient: pale at `0.0`, saturated green at `1.0`.
///
/// The red and blue channels are `225 - floor(225 * frac)`.
#[must_use]
pub fn green_ramp(frac: f64) -> Rgba {
    let frac = frac.clamp(0.0, 1.0);
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is clamped to 0..=225 before the cast"
    )]
    let rb = (225.0 - floor_non_negative(225.0 * frac)) as u8;
    Rgba::opaque(rb, 255, rb)
}

/// Truncation equals floor for non-negative input.
fn floor_non_negative(v: f64) -> f64 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "input is within 0.0..=225.0"
    )]
    let t = v as i64;
    t as f64
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Metric-based allocation.
//!
//! Area-bearing features with a positive area are sorted by area,
//! largest first, and split into `divisions` buckets by one of three
//! strategies. Level 0 always receives the largest features.
//!
//! The bucketing functions operate on the descending-sorted metric slice
//! and return one bucket index per rank, so they can be used and tested
//! independently of features and layers.

use alloc::vec::Vec;

use super::{AllocError, Allocation};
use crate::feature::FeatureRecord;
use crate::layer::Layer;
use crate::style::{GradientFn, Style, green_ramp};

/// How sorted metrics are split into buckets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AreaStrategy {
    /// Equal-width metric bands: `level = D - 1 - floor(v / (max / D))`.
    Percentile,
    /// Equal-count bands by rank.
    Fraction,
    /// Natural breaks at the largest ratios between neighbouring metrics.
    #[default]
    Cluster,
}

/// Numeric bucketing parameters.
#[derive(Clone, Copy, Debug)]
pub struct AreaHierarchy {
    /// Number of buckets to build before empty ones are dropped.
    pub divisions: usize,
    /// Bucketing strategy.
    pub strategy: AreaStrategy,
    /// Fill ramp; level `i` is styled with `gradient(1 - i / divisions)`.
    pub gradient: GradientFn,
}

impl AreaHierarchy {
    /// Creates an area hierarchy using [`green_ramp`] fills.
    #[must_use]
    pub fn new(divisions: usize, strategy: AreaStrategy) -> Self {
        Self {
            divisions,
            strategy,
            gradient: green_ramp,
        }
    }

    /// Replaces the fill ramp.
    #[must_use]
    pub fn with_gradient(mut self, gradient: GradientFn) -> Self {
        self.gradient = gradient;
        self
    }

    /// Returns the bucket of every rank of `sorted` under this strategy.
    ///
    /// # Panics
    ///
    /// Panics if `divisions` is zero.
    #[must_use]
    pub fn buckets(&self, sorted: &[f64]) -> Vec<usize> {
        match self.strategy {
            AreaStrategy::Percentile => percentile_buckets(sorted, self.divisions),
            AreaStrategy::Fraction => fraction_buckets(sorted.len(), self.divisions),
            AreaStrategy::Cluster => cluster_buckets(sorted, self.divisions),
        }
    }
}

/// Equal-width bands over `0..=max`.
///
/// Every value equal to the maximum goes to bucket 0; any other value `v`
/// goes to `divisions - 1 - floor(v / (max / divisions))`.
///
/// # Panics
///
/// Panics if `divisions` is zero.
#[must_use]
pub fn percentile_buckets(sorted: &[f64], divisions: usize) -> Vec<usize> {
    assert!(divisions > 0, "divisions must be positive");
    let Some(&max) = sorted.first() else {
        return Vec::new();
    };
    let chunk = max / divisions as f64;
    sorted
        .iter()
        .map(|&v| {
            if v >= max {
                return 0;
            }
            #[expect(
                clippy::cast_possible_truncation,
                reason = "v < max, so the band is below divisions"
            )]
            let band = (v / chunk) as usize;
            (divisions - 1).saturating_sub(band)
        })
        .collect()
}

/// Equal-count bands: rank `i` goes to `i / ceil(len / divisions)`.
///
/// # Panics
///
/// Panics if `divisions` is zero.
#[must_use]
pub fn fraction_buckets(len: usize, divisions: usize) -> Vec<usize> {
    assert!(divisions > 0, "divisions must be positive");
    let chunk = len.div_ceil(divisions);
    (0..len).map(|rank| rank / chunk).collect()
}

/// Ratio between neighbouring sorted metrics.
///
/// A zero denominator or a non-finite quotient yields `0.0`, so degenerate
/// gaps never outrank real ones.
#[must_use]
pub fn gap_ratio(larger: f64, smaller: f64) -> f64 {
    if smaller == 0.0 {
        return 0.0;
    }
    let ratio = larger / smaller;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Chooses up to `divisions - 1` break indices at the largest gap ratios.
///
/// Index `i` denotes the gap between ranks `i` and `i + 1`. Ties are broken
/// by ascending index. The result is sorted ascending. With fewer gaps than
/// `divisions - 1`, every gap is a break.
///
/// # Panics
///
/// Panics if `divisions` is zero.
#[must_use]
pub fn natural_breaks(sorted: &[f64], divisions: usize) -> Vec<usize> {
    assert!(divisions > 0, "divisions must be positive");
    let mut ratios: Vec<(usize, f64)> = sorted
        .windows(2)
        .enumerate()
        .map(|(i, pair)| (i, gap_ratio(pair[0], pair[1])))
        .collect();
    // Stable: equal ratios keep ascending index order.
    ratios.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut breaks: Vec<usize> = ratios
        .into_iter()
        .take(divisions - 1)
        .map(|(i, _)| i)
        .collect();
    breaks.sort_unstable();
    breaks
}

/// Contiguous rank ranges split at [`natural_breaks`].
///
/// # Panics
///
/// Panics if `divisions` is zero.
#[must_use]
pub fn cluster_buckets(sorted: &[f64], divisions: usize) -> Vec<usize> {
    let breaks = natural_breaks(sorted, divisions);
    let mut bucket = 0;
    (0..sorted.len())
        .map(|rank| {
            if breaks.get(bucket).is_some_and(|&b| rank > b) {
                bucket = (bucket + 1).min(divisions - 1);
            }
            bucket
        })
        .collect()
}

pub(crate) fn allocate_area(
    category: usize,
    hierarchy: &AreaHierarchy,
    features: Vec<FeatureRecord>,
) -> Result<Allocation, AllocError> {
    let divisions = hierarchy.divisions;
    if divisions == 0 {
        return Err(AllocError::ZeroDivisions);
    }

    let mut layers: Vec<Layer> = (0..divisions)
        .map(|level| {
            let style = Style::FractionalFill {
                fraction: 1.0 - level as f64 / divisions as f64,
                gradient: hierarchy.gradient,
            };
            Layer::new(category, level, style)
        })
        .collect();

    let total = features.len();
    let mut measured: Vec<(f64, FeatureRecord)> = features
        .into_iter()
        .filter_map(|feature| {
            let metric = feature.metric()?;
            (metric > 0.0).then_some((metric, feature))
        })
        .collect();
    let dropped = total - measured.len();

    measured.sort_by(|a, b| b.0.total_cmp(&a.0));
    let metrics: Vec<f64> = measured.iter().map(|(metric, _)| *metric).collect();

    for (bucket, (_, feature)) in hierarchy.buckets(&metrics).into_iter().zip(measured) {
        layers[bucket].add_feature(feature);
    }
    layers.retain(|layer| !layer.is_empty());

    Ok(Allocation { layers, dropped })
}

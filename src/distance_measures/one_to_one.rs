//! One-to-one distance computations between dense datapoints.

use crate::data_format::DatapointPtr;
use crate::types::DatapointValue;

/// Compute L1 (Manhattan) distance between two datapoints.
#[inline]
pub fn l1_distance<T: DatapointValue>(a: &DatapointPtr<'_, T>, b: &DatapointPtr<'_, T>) -> f32 {
    debug_assert_eq!(a.dimensionality(), b.dimensionality());
    a.values()
        .iter()
        .zip(b.values())
        .map(|(&x, &y)| (x.to_f32() - y.to_f32()).abs())
        .sum()
}

/// Compute squared L2 distance between two datapoints.
#[inline]
pub fn squared_l2_distance<T: DatapointValue>(
    a: &DatapointPtr<'_, T>,
    b: &DatapointPtr<'_, T>,
) -> f32 {
    debug_assert_eq!(a.dimensionality(), b.dimensionality());
    a.values()
        .iter()
        .zip(b.values())
        .map(|(&x, &y)| {
            let diff = x.to_f32() - y.to_f32();
            diff * diff
        })
        .sum()
}

/// Compute L2 (Euclidean) distance between two datapoints.
#[inline]
pub fn l2_distance<T: DatapointValue>(a: &DatapointPtr<'_, T>, b: &DatapointPtr<'_, T>) -> f32 {
    squared_l2_distance(a, b).sqrt()
}

/// Compute Chebyshev (L-infinity) distance between two datapoints.
#[inline]
pub fn chebyshev_distance<T: DatapointValue>(
    a: &DatapointPtr<'_, T>,
    b: &DatapointPtr<'_, T>,
) -> f32 {
    debug_assert_eq!(a.dimensionality(), b.dimensionality());
    a.values()
        .iter()
        .zip(b.values())
        .map(|(&x, &y)| (x.to_f32() - y.to_f32()).abs())
        .fold(0.0, f32::max)
}

/// Compute cosine similarity in a single pass.
///
/// Zero vectors have similarity 0.
pub fn cosine_similarity<T: DatapointValue>(
    a: &DatapointPtr<'_, T>,
    b: &DatapointPtr<'_, T>,
) -> f32 {
    let mut dot_ab = 0.0f32;
    let mut dot_aa = 0.0f32;
    let mut dot_bb = 0.0f32;

    for (&x, &y) in a.values().iter().zip(b.values()) {
        let xf = x.to_f32();
        let yf = y.to_f32();
        dot_ab += xf * yf;
        dot_aa += xf * xf;
        dot_bb += yf * yf;
    }

    let norm_a = dot_aa.sqrt();
    let norm_b = dot_bb.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_ab / (norm_a * norm_b)
    }
}

/// Compute cosine distance, clamped to [0, 2] against rounding.
#[inline]
pub fn cosine_distance<T: DatapointValue>(
    a: &DatapointPtr<'_, T>,
    b: &DatapointPtr<'_, T>,
) -> f32 {
    (1.0 - cosine_similarity(a, b)).clamp(0.0, 2.0)
}

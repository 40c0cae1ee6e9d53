//! Min–max normalization of scalar values to bytes.

use crate::image::{BinaryMask, is_masked};

/// Floor applied to a degenerate (constant) value range.
pub const RANGE_EPSILON: f64 = 1e-6;

/// Stretch `values` linearly so the smallest value becomes 0 and the
/// largest becomes 255.
///
/// Non-finite entries are written as 0 and excluded from the min/max. A
/// constant map collapses to 0 thanks to the range floor.
pub fn normalize_to_u8(values: &[f64]) -> Vec<u8> {
    normalize_masked(values, None)
}

/// [`normalize_to_u8`] that also skips masked entries and writes them as 0.
///
/// The mask must already have been checked against the value count.
pub(crate) fn normalize_masked(values: &[f64], mask: Option<&BinaryMask>) -> Vec<u8> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() && !is_masked(mask, i) {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() {
        return vec![0; values.len()];
    }

    let range = (max - min).max(RANGE_EPSILON);
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if !v.is_finite() || is_masked(mask, i) {
                0
            } else {
                ((v - min) / range * 255.0).round().clamp(0.0, 255.0) as u8
            }
        })
        .collect()
}

/// Invert a byte map (`255 − x`).
pub fn invert_u8_map(values: &[u8]) -> Vec<u8> {
    values.iter().map(|&v| 255 - v).collect()
}

//! Artifact (hair) segmentation.
//!
//! # Algorithm
//! 1. Luma `0.299R + 0.587G + 0.114B`
//! 2. Black-hat of luma, flagged where strictly above `mean + 1σ`
//! 3. L*, flagged where strictly below the 10th percentile
//! 4. Union, then a 3×3 binary closing

use crate::color_management::rgb_to_lab;
use crate::error::CoreResult;
use crate::image::{BinaryMask, RasterBuffer, ScalarMap};

use super::morphology::{black_hat, close_binary};

/// Standard deviations above the mean for the black-hat threshold.
const BLACK_HAT_SIGMAS: f64 = 1.0;
/// Fraction of darkest L* values treated as occluders.
const DARK_PERCENTILE: f64 = 0.10;

pub fn luma(rgb: [u8; 3]) -> f64 {
    0.299 * rgb[0] as f64 + 0.587 * rgb[1] as f64 + 0.114 * rgb[2] as f64
}

/// Population mean and standard deviation.
pub fn mean_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.max(0.0).sqrt())
}

/// Nearest-rank percentile (`p ∈ [0, 1]`), rounding the rank down.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    let rank = ((sorted.len() - 1) as f64 * p.clamp(0.0, 1.0)).floor() as usize;
    let (_, value, _) = sorted.select_nth_unstable_by(rank, f64::total_cmp);
    Some(*value)
}

fn threshold_mask(
    width: u32,
    height: u32,
    values: &[f64],
    pred: impl Fn(f64) -> bool,
) -> BinaryMask {
    BinaryMask {
        width,
        height,
        flags: values.iter().map(|&v| pred(v)).collect(),
    }
}

/// Flag thin dark structures via the black-hat response.
pub fn black_hat_mask(image: &RasterBuffer) -> BinaryMask {
    let luma_map = ScalarMap::from_raster(image, luma);
    let response = black_hat(&luma_map.values, image.width(), image.height());
    let (mean, stddev) = mean_stddev(&response);
    let threshold = mean + BLACK_HAT_SIGMAS * stddev;
    threshold_mask(image.width(), image.height(), &response, |v| v > threshold)
}

/// Flag the darkest decile of L*.
pub fn dark_mask(image: &RasterBuffer) -> BinaryMask {
    let lightness = ScalarMap::from_raster(image, |[r, g, b]| rgb_to_lab(r, g, b).l);
    let Some(cutoff) = percentile(&lightness.values, DARK_PERCENTILE) else {
        return BinaryMask::empty(image.width(), image.height());
    };
    threshold_mask(image.width(), image.height(), &lightness.values, |l| l < cutoff)
}

/// Final cleaned artifact mask.
pub fn detect_artifacts(image: &RasterBuffer) -> CoreResult<BinaryMask> {
    let combined = black_hat_mask(image).union(&dark_mask(image))?;
    Ok(close_binary(&combined))
}

//! Whole-image skin-tone summary.
//!
//! Averages Lab over the unmasked pixels, derives the ITA of that mean and
//! its phototype band, and reports the mean erythema index. Useful as a
//! caption next to the visualizations and for choosing a technique.

use serde::{Deserialize, Serialize};

use crate::color_management::{Lab, rgb_to_lab};
use crate::error::CoreResult;
use crate::image::{BinaryMask, RasterBuffer, check_mask, is_masked};
use crate::scoring::{ItaClass, calculate_erythema_index, classify_ita, compute_ita};

/// Summary statistics over the unmasked pixels of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinSummary {
    /// Number of pixels that contributed.
    pub sampled_pixels: usize,
    /// Fraction of pixels excluded by the artifact mask.
    pub masked_fraction: f64,
    /// Mean Lab coordinate.
    pub mean_lab: Lab,
    /// ITA of the mean L and b, if any pixel was sampled.
    pub ita: Option<f64>,
    /// Phototype band of `ita`.
    pub skin_tone: Option<ItaClass>,
    /// Mean linear-light erythema index.
    pub mean_erythema_index: f64,
}

/// Summarize `image`, skipping pixels flagged by `mask`.
pub fn summarize(image: &RasterBuffer, mask: Option<&BinaryMask>) -> CoreResult<SkinSummary> {
    check_mask(mask, image)?;
    let total = image.len();
    let mut sum = [0.0_f64; 3];
    let mut ei_sum = 0.0_f64;
    let mut n = 0usize;

    for (i, px) in image.pixels().iter().enumerate() {
        if is_masked(mask, i) {
            continue;
        }
        let lab = rgb_to_lab(px[0], px[1], px[2]);
        sum[0] += lab.l;
        sum[1] += lab.a;
        sum[2] += lab.b;
        ei_sum += calculate_erythema_index(px[0], px[1]);
        n += 1;
    }

    let masked_fraction = if total == 0 {
        0.0
    } else {
        (total - n) as f64 / total as f64
    };

    if n == 0 {
        return Ok(SkinSummary {
            sampled_pixels: 0,
            masked_fraction,
            mean_lab: Lab::default(),
            ita: None,
            skin_tone: None,
            mean_erythema_index: 0.0,
        });
    }

    let count = n as f64;
    let mean_lab = Lab::new(sum[0] / count, sum[1] / count, sum[2] / count);
    let ita = compute_ita(mean_lab.l, mean_lab.b);

    Ok(SkinSummary {
        sampled_pixels: n,
        masked_fraction,
        mean_lab,
        ita: Some(ita),
        skin_tone: Some(classify_ita(ita)),
        mean_erythema_index: ei_sum / count,
    })
}

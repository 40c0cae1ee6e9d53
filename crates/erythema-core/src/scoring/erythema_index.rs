//! Erythema Index: `log10(R / G)` on linear-light channels.
//!
//! ```text
//! EI = log10((R_lin + ε) / (G_lin + ε)),  ε = 1e-6
//! ```
//!
//! The per-image EI range is min–max normalized and shown through a
//! three-band heat palette (blue → green → red).

use crate::color_management::srgb_to_linear;
use crate::image::RasterBuffer;
use crate::scoring::normalize::RANGE_EPSILON;

/// Guard against a zero green channel.
pub const EI_EPSILON: f64 = 1e-6;

/// Erythema index of one pixel from its 8-bit red and green samples.
pub fn calculate_erythema_index(r: u8, g: u8) -> f64 {
    ((srgb_to_linear(r) + EI_EPSILON) / (srgb_to_linear(g) + EI_EPSILON)).log10()
}

/// Three-band heat palette for `t ∈ [0, 1]`.
///
/// ```text
/// [0.00, 0.33) → (0,        t·3,        1)
/// [0.33, 0.66) → ((t−.33)·3, 1,         (.66−t)·3)
/// [0.66, 1.00] → (1,        (1−t)·3,    0)
/// ```
pub fn heat_color(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let rgb = if t < 0.33 {
        [0.0, t * 3.0, 1.0]
    } else if t < 0.66 {
        [(t - 0.33) * 3.0, 1.0, (0.66 - t) * 3.0]
    } else {
        [1.0, (1.0 - t) * 3.0, 0.0]
    };
    rgb.map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Heat-mapped erythema index visualization.
pub fn erythema_index_map(image: &RasterBuffer) -> RasterBuffer {
    let values: Vec<f64> = image
        .pixels()
        .iter()
        .map(|px| calculate_erythema_index(px[0], px[1]))
        .collect();

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = (max - min).max(RANGE_EPSILON);

    RasterBuffer::from_rgb_iter(
        image.width(),
        image.height(),
        values.iter().map(|&v| heat_color((v - min) / range)),
    )
}

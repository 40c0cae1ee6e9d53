//! Spectral-ratio pseudo-color map.
//!
//! Three linear-light ratios are computed per pixel:
//!
//! ```text
//! G/R,  R/G,  (B·G)/R      (denominators clamped at 1e-6)
//! ```
//!
//! Each ratio map is min–max normalized to bytes independently. G/R and
//! (B·G)/R fall as redness rises, so they are inverted before composition:
//! the output channels are `(255 − G/R, R/G, 255 − B·G/R)`.

use crate::color_management::transfer::rgb_to_linear;
use crate::filter::bilateral_3x3;
use crate::image::RasterBuffer;
use crate::scoring::normalize::{invert_u8_map, normalize_to_u8};

const RATIO_EPSILON: f64 = 1e-6;

/// Spatial sigma of the speckle-suppression pass.
pub const SMOOTH_SPATIAL_SIGMA: f64 = 1.0;
/// Range sigma of the speckle-suppression pass.
pub const SMOOTH_RANGE_SIGMA: f64 = 12.0;

/// `[G/R, R/G, (B·G)/R]` on linear-light values.
pub fn spectral_ratios(rgb: [u8; 3]) -> [f64; 3] {
    let [r, g, b] = rgb_to_linear(rgb);
    let r_den = r.max(RATIO_EPSILON);
    let g_den = g.max(RATIO_EPSILON);
    [g / r_den, r / g_den, (b * g) / r_den]
}

/// Pseudo-color composition of the three ratio maps.
///
/// With `smooth` set, each normalized map goes through a 3×3 bilateral
/// filter before inversion and composition.
pub fn spectral_ratio_map(image: &RasterBuffer, smooth: bool) -> RasterBuffer {
    let (width, height) = (image.width(), image.height());
    let n = image.len();

    let mut g_over_r = Vec::with_capacity(n);
    let mut r_over_g = Vec::with_capacity(n);
    let mut bg_over_r = Vec::with_capacity(n);
    for px in image.pixels() {
        let [gr, rg, bgr] = spectral_ratios([px[0], px[1], px[2]]);
        g_over_r.push(gr);
        r_over_g.push(rg);
        bg_over_r.push(bgr);
    }

    let prepare = |values: &[f64]| {
        let bytes = normalize_to_u8(values);
        if smooth {
            bilateral_3x3(&bytes, width, height, SMOOTH_SPATIAL_SIGMA, SMOOTH_RANGE_SIGMA)
        } else {
            bytes
        }
    };

    let red = invert_u8_map(&prepare(&g_over_r));
    let green = prepare(&r_over_g);
    let blue = invert_u8_map(&prepare(&bg_over_r));

    RasterBuffer::from_rgb_iter(
        width,
        height,
        red.iter()
            .zip(&green)
            .zip(&blue)
            .map(|((&r, &g), &b)| [r, g, b]),
    )
}

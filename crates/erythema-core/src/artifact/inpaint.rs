//! Edge-aware diffusion inpainting.
//!
//! Each iteration reads a frozen snapshot and writes a fresh buffer. For
//! every masked pixel `p`:
//!
//! ```text
//! w_n  = exp(−‖prev[n] − original[p]‖² / (2σ²))     n ∈ 4-neighbors of p
//! next[p] = Σ w_n · prev[n] / Σ w_n
//! ```
//!
//! The weight compares against the pixel's original color, not its evolving
//! value. Unmasked pixels are never written. A pixel whose neighbors all
//! carry zero weight keeps its original color.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::image::{BinaryMask, RasterBuffer};

/// Diffusion settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InpaintParams {
    pub iterations: u32,
    /// Color-distance sigma in 8-bit units.
    pub sigma: f64,
}

impl Default for InpaintParams {
    fn default() -> Self {
        Self {
            iterations: 30,
            sigma: 25.0,
        }
    }
}

const NEIGHBORS: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

fn dist_sq(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// Fill masked pixels from their surroundings.
///
/// An empty mask returns an unchanged copy. Fails with `MaskMismatch` when
/// `mask` does not cover `image`.
pub fn inpaint(
    image: &RasterBuffer,
    mask: &BinaryMask,
    params: &InpaintParams,
) -> CoreResult<RasterBuffer> {
    mask.ensure_matches(image.width(), image.height())?;
    let masked: Vec<usize> = mask
        .flags
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i))
        .collect();
    if masked.is_empty() || params.iterations == 0 {
        return Ok(image.clone());
    }

    let (w, h) = (image.width() as i64, image.height() as i64);
    let original: Vec<[f64; 3]> = image
        .pixels()
        .iter()
        .map(|px| [px[0] as f64, px[1] as f64, px[2] as f64])
        .collect();
    let denom = 2.0 * params.sigma * params.sigma;

    let mut prev = original.clone();
    for _ in 0..params.iterations {
        let mut next = prev.clone();
        for &i in &masked {
            let (x, y) = (i as i64 % w, i as i64 / w);
            let anchor = original[i];

            let mut sum = [0.0_f64; 3];
            let mut weight_sum = 0.0;
            for (dx, dy) in NEIGHBORS {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let neighbor = prev[(ny * w + nx) as usize];
                let weight = (-dist_sq(neighbor, anchor) / denom).exp();
                if !weight.is_finite() || weight <= 0.0 {
                    continue;
                }
                for c in 0..3 {
                    sum[c] += weight * neighbor[c];
                }
                weight_sum += weight;
            }

            next[i] = if weight_sum > 0.0 {
                sum.map(|s| s / weight_sum)
            } else {
                anchor
            };
        }
        prev = next;
    }

    let mut out = image.clone();
    let pixels = out.pixels_mut();
    for &i in &masked {
        let [r, g, b] = prev[i].map(|c| c.round().clamp(0.0, 255.0) as u8);
        pixels[i] = [r, g, b, 255];
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKIN: [u8; 3] = [210, 160, 150];

    #[test]
    fn test_empty_mask_leaves_image_unchanged() {
        let pixels = [[1, 2, 3], [4, 5, 6], [7, 8, 9], SKIN, SKIN, SKIN];
        let image = RasterBuffer::from_rgb(3, 2, &pixels).unwrap();
        let mask = BinaryMask::empty(3, 2);
        assert_eq!(inpaint(&image, &mask, &InpaintParams::default()).unwrap(), image);
    }

    #[test]
    fn test_isolated_pixel_takes_surrounding_color() {
        let mut pixels = vec![SKIN; 9];
        pixels[4] = [30, 20, 20];
        let image = RasterBuffer::from_rgb(3, 3, &pixels).unwrap();
        let mut mask = BinaryMask::empty(3, 3);
        mask.flags[4] = true;

        let out = inpaint(&image, &mask, &InpaintParams::default()).unwrap();
        assert_eq!(out.rgb(1, 1), SKIN);
    }

    #[test]
    fn test_unmasked_pixels_are_never_modified() {
        let pixels: Vec<[u8; 3]> = (0..16u8).map(|i| [i * 15, 100, 255 - i * 15]).collect();
        let image = RasterBuffer::from_rgb(4, 4, &pixels).unwrap();
        let mut mask = BinaryMask::empty(4, 4);
        mask.flags[5] = true;
        mask.flags[6] = true;

        let out = inpaint(&image, &mask, &InpaintParams::default()).unwrap();
        for i in 0..16 {
            if i != 5 && i != 6 {
                assert_eq!(out.pixels()[i], image.pixels()[i], "pixel {i}");
            }
        }
    }

    #[test]
    fn test_similar_neighbors_dominate() {
        // Masked pixel at the center of a 3×1 strip: left neighbor close to its
        // original color, right neighbor far away.
        let pixels = [[120, 90, 80], [110, 80, 70], [250, 250, 250]];
        let image = RasterBuffer::from_rgb(3, 1, &pixels).unwrap();
        let mut mask = BinaryMask::empty(3, 1);
        mask.flags[1] = true;
        let out = inpaint(&image, &mask, &InpaintParams::default()).unwrap();
        let [r, _, _] = out.rgb(1, 0);
        assert!((r as i16 - 120).abs() <= 2, "r = {r}");
    }

    #[test]
    fn test_single_pixel_image_keeps_original() {
        let image = RasterBuffer::from_rgb(1, 1, &[[9, 8, 7]]).unwrap();
        let mask = BinaryMask {
            width: 1,
            height: 1,
            flags: vec![true],
        };
        assert_eq!(inpaint(&image, &mask, &InpaintParams::default()).unwrap(), image);
    }

    #[test]
    fn test_mask_smaller_than_image_is_rejected() {
        let image = RasterBuffer::from_rgb(2, 2, &[SKIN; 4]).unwrap();
        let mask = BinaryMask {
            width: 2,
            height: 2,
            flags: vec![true],
        };
        assert!(inpaint(&image, &mask, &InpaintParams::default()).is_err());
    }
}

//! Lab-based erythema map: `(Lmax − L) × a*`.
//!
//! Darker pixels with the same a* score higher, which keeps redness visible
//! on pigmented skin. Lightness is first equalized with CLAHE. `Lmax` is the
//! brightest unmasked lightness, either over the whole image or per square
//! tile when local normalization is enabled.

use crate::color_management::{Lab, rgb_to_lab};
use crate::filter::{TileGrid, equalize_lightness};
use crate::error::CoreResult;
use crate::image::{BinaryMask, RasterBuffer, ScalarMap, check_mask, is_masked};
use crate::scoring::normalize::normalize_masked;

/// `Lmax` used when no unmasked pixel exists.
pub const DEFAULT_L_MAX: f64 = 100.0;

/// Tunables for [`lab_erythema_map`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabErythemaParams {
    /// Tile grid for the CLAHE pass on lightness.
    pub clahe_grid: TileGrid,
    /// CLAHE clip limit.
    pub clip_limit: f64,
    /// Side of the square tiles used for local `Lmax`; `None` means global.
    pub local_tile_size: Option<u32>,
}

impl Default for LabErythemaParams {
    fn default() -> Self {
        Self {
            clahe_grid: TileGrid::Single,
            clip_limit: 2.0,
            local_tile_size: None,
        }
    }
}

/// Erythema score of one pixel.
pub fn lab_erythema_value(l: f64, a: f64, l_max: f64) -> f64 {
    (l_max - l) * a
}

fn global_l_max(lightness: &ScalarMap, mask: Option<&BinaryMask>) -> f64 {
    let max = lightness
        .values
        .iter()
        .enumerate()
        .filter(|&(i, v)| v.is_finite() && !is_masked(mask, i))
        .map(|(_, &v)| v)
        .fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() { max } else { DEFAULT_L_MAX }
}

/// Per-pixel `Lmax` from square tiles, falling back to `fallback` for
/// tiles with no unmasked pixel.
fn local_l_max(
    lightness: &ScalarMap,
    mask: Option<&BinaryMask>,
    tile: u32,
    fallback: f64,
) -> Vec<f64> {
    let (w, h) = (lightness.width as usize, lightness.height as usize);
    let tile = tile.max(1) as usize;
    let mut out = vec![fallback; w * h];

    for y0 in (0..h).step_by(tile) {
        for x0 in (0..w).step_by(tile) {
            let (y1, x1) = ((y0 + tile).min(h), (x0 + tile).min(w));
            let mut max = f64::NEG_INFINITY;
            for y in y0..y1 {
                for x in x0..x1 {
                    let i = y * w + x;
                    let l = lightness.values[i];
                    if l.is_finite() && !is_masked(mask, i) {
                        max = max.max(l);
                    }
                }
            }
            let tile_max = if max.is_finite() { max } else { fallback };
            for y in y0..y1 {
                out[y * w + x0..y * w + x1].fill(tile_max);
            }
        }
    }
    out
}

/// Raw `(Lmax − L) × a*` scores for every pixel.
///
/// Fails with `MaskMismatch` when `mask` does not cover `image`.
pub fn lab_erythema_scores(
    image: &RasterBuffer,
    mask: Option<&BinaryMask>,
    params: &LabErythemaParams,
) -> CoreResult<ScalarMap> {
    check_mask(mask, image)?;
    let labs: Vec<Lab> = image
        .pixels()
        .iter()
        .map(|px| rgb_to_lab(px[0], px[1], px[2]))
        .collect();

    let mut lightness = ScalarMap {
        width: image.width(),
        height: image.height(),
        values: labs.iter().map(|lab| lab.l).collect(),
    };
    equalize_lightness(&mut lightness, params.clahe_grid, params.clip_limit);

    let global = global_l_max(&lightness, mask);
    let l_max = match params.local_tile_size {
        Some(tile) => local_l_max(&lightness, mask, tile, global),
        None => vec![global; labs.len()],
    };

    let values = labs
        .iter()
        .zip(&lightness.values)
        .zip(&l_max)
        .map(|((lab, &l), &l_max)| {
            let score = lab_erythema_value(l, lab.a, l_max);
            if score.is_finite() { score } else { 0.0 }
        })
        .collect();

    Ok(ScalarMap {
        width: image.width(),
        height: image.height(),
        values,
    })
}

/// Normalized grayscale scores, one byte per pixel. Masked pixels are 0.
pub fn lab_erythema_gray(
    image: &RasterBuffer,
    mask: Option<&BinaryMask>,
    params: &LabErythemaParams,
) -> CoreResult<Vec<u8>> {
    let scores = lab_erythema_scores(image, mask, params)?;
    Ok(normalize_masked(&scores.values, mask))
}

/// Grayscale Lab-erythema visualization.
pub fn lab_erythema_map(
    image: &RasterBuffer,
    mask: Option<&BinaryMask>,
    params: &LabErythemaParams,
) -> CoreResult<RasterBuffer> {
    let gray = lab_erythema_gray(image, mask, params)?;
    Ok(RasterBuffer::from_gray(image.width(), image.height(), &gray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_darker_pixel_scores_higher_for_equal_redness() {
        assert!(lab_erythema_value(30.0, 20.0, 100.0) > lab_erythema_value(70.0, 20.0, 100.0));
    }

    #[test]
    fn test_negative_a_scores_negative() {
        assert!(lab_erythema_value(50.0, -10.0, 100.0) < 0.0);
    }

    #[test]
    fn test_map_spans_full_gray_range() {
        let image = RasterBuffer::from_rgb(
            3,
            1,
            &[[200, 80, 80], [120, 140, 120], [180, 150, 140]],
        )
        .unwrap();
        let gray = lab_erythema_gray(&image, None, &LabErythemaParams::default()).unwrap();
        assert_eq!(gray.iter().copied().min(), Some(0));
        assert_eq!(gray.iter().copied().max(), Some(255));
        // The strongly red pixel is the most erythematous, the greenish one the least.
        assert_eq!(gray[0], 255);
        assert_eq!(gray[1], 0);
    }

    #[test]
    fn test_masked_pixels_render_black() {
        let image = RasterBuffer::from_rgb(2, 1, &[[200, 80, 80], [20, 10, 10]]).unwrap();
        let mut mask = BinaryMask::empty(2, 1);
        mask.flags[0] = true;
        let out = lab_erythema_map(&image, Some(&mask), &LabErythemaParams::default()).unwrap();
        assert_eq!(out.pixels()[0], [0, 0, 0, 255]);
    }

    #[test]
    fn test_fully_masked_image_stays_finite() {
        let image = RasterBuffer::from_rgb(2, 1, &[[200, 80, 80], [90, 60, 50]]).unwrap();
        let mask = BinaryMask {
            width: 2,
            height: 1,
            flags: vec![true, true],
        };
        let scores =
            lab_erythema_scores(&image, Some(&mask), &LabErythemaParams::default()).unwrap();
        assert!(scores.values.iter().all(|v| v.is_finite()));
        let gray = lab_erythema_gray(&image, Some(&mask), &LabErythemaParams::default()).unwrap();
        assert_eq!(gray, vec![0, 0]);
    }

    #[test]
    fn test_mismatched_mask_is_an_error() {
        let image = RasterBuffer::from_rgb(2, 2, &[[200, 80, 80]; 4]).unwrap();
        let mask = BinaryMask::empty(1, 1);
        let result = lab_erythema_map(&image, Some(&mask), &LabErythemaParams::default());
        assert!(matches!(
            result,
            Err(CoreError::MaskMismatch {
                mask_width: 1,
                width: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_local_l_max_uses_tile_maximum() {
        let lightness = ScalarMap {
            width: 4,
            height: 1,
            values: vec![10.0, 30.0, 60.0, 50.0],
        };
        let local = local_l_max(&lightness, None, 2, 100.0);
        assert_eq!(local, vec![30.0, 30.0, 60.0, 60.0]);
    }

    #[test]
    fn test_local_l_max_falls_back_for_masked_tile() {
        let lightness = ScalarMap {
            width: 4,
            height: 1,
            values: vec![10.0, 30.0, 60.0, 50.0],
        };
        let mask = BinaryMask {
            width: 4,
            height: 1,
            flags: vec![true, true, false, false],
        };
        let global = global_l_max(&lightness, Some(&mask));
        assert_eq!(global, 60.0);
        let local = local_l_max(&lightness, Some(&mask), 2, global);
        assert_eq!(local[0], 60.0);
    }
}

//! Multi-map fusion and perceptual colorization.
//!
//! The Lab-erythema map is blended with a hemoglobin-index map and shown
//! through a dark-to-bright ramp so that strong redness reads as hot.

pub mod ramp;

pub use ramp::fused_ramp;

use crate::color_management::srgb_to_linear;
use crate::error::{CoreError, CoreResult};
use crate::image::{BinaryMask, RasterBuffer, check_mask};
use crate::scoring::normalize::normalize_masked;

const HEMOGLOBIN_EPSILON: f64 = 1e-6;

/// Weight of the Lab-erythema map in the fused result.
pub const LAB_WEIGHT: f64 = 0.6;
/// Weight of the hemoglobin-index map in the fused result.
pub const HEMOGLOBIN_WEIGHT: f64 = 0.4;

/// Hemoglobin index of one pixel on linear-light channels.
///
/// ```text
/// HI = log10((R + ε) / (G + 0.5·B + ε))
/// ```
pub fn hemoglobin_index(r: u8, g: u8, b: u8) -> f64 {
    let (r, g, b) = (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    ((r + HEMOGLOBIN_EPSILON) / (g + 0.5 * b + HEMOGLOBIN_EPSILON)).log10()
}

/// Normalized hemoglobin-index bytes; masked pixels are 0.
pub fn hemoglobin_index_map(
    image: &RasterBuffer,
    mask: Option<&BinaryMask>,
) -> CoreResult<Vec<u8>> {
    check_mask(mask, image)?;
    let values: Vec<f64> = image
        .pixels()
        .iter()
        .map(|px| hemoglobin_index(px[0], px[1], px[2]))
        .collect();
    Ok(normalize_masked(&values, mask))
}

/// `0.6·a + 0.4·b` per pixel, in `[0, 255]`.
pub fn fuse_maps(a: &[u8], b: &[u8]) -> Vec<f64> {
    a.iter()
        .zip(b)
        .map(|(&a, &b)| LAB_WEIGHT * a as f64 + HEMOGLOBIN_WEIGHT * b as f64)
        .collect()
}

/// Map fused values (`[0, 255]`) through the perceptual ramp.
pub fn colorize_fused(width: u32, height: u32, fused: &[f64]) -> RasterBuffer {
    RasterBuffer::from_rgb_iter(width, height, fused.iter().map(|&v| fused_ramp(v / 255.0)))
}

/// Fused heatmap from an image and its Lab-erythema gray map.
///
/// `lab_gray` must hold one byte per pixel of `image`.
pub fn fused_heatmap(
    image: &RasterBuffer,
    lab_gray: &[u8],
    mask: Option<&BinaryMask>,
) -> CoreResult<RasterBuffer> {
    if lab_gray.len() != image.len() {
        return Err(CoreError::InvalidParameter(format!(
            "Lab map has {} values for a {}x{} image",
            lab_gray.len(),
            image.width(),
            image.height()
        )));
    }
    let hemoglobin = hemoglobin_index_map(image, mask)?;
    let fused = fuse_maps(lab_gray, &hemoglobin);
    Ok(colorize_fused(image.width(), image.height(), &fused))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hemoglobin_index_sign() {
        assert!(hemoglobin_index(220, 90, 90) > 0.0);
        assert!(hemoglobin_index(90, 200, 200) < 0.0);
    }

    #[test]
    fn test_hemoglobin_map_masks_to_black() {
        let pixels = [[220, 90, 90], [90, 200, 200], [150, 120, 110]];
        let image = RasterBuffer::from_rgb(3, 1, &pixels).unwrap();
        let mut mask = BinaryMask::empty(3, 1);
        mask.flags[0] = true;
        let map = hemoglobin_index_map(&image, Some(&mask)).unwrap();
        assert_eq!(map[0], 0);
        assert_eq!(map[1], 0);
        assert_eq!(map[2], 255);
    }

    #[test]
    fn test_fusion_weights() {
        let fused = fuse_maps(&[255, 0, 100], &[0, 255, 100]);
        assert!((fused[0] - 153.0).abs() < 1e-9);
        assert!((fused[1] - 102.0).abs() < 1e-9);
        assert!((fused[2] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_heatmap_black_where_both_maps_are_zero() {
        let image = RasterBuffer::from_rgb(2, 1, &[[220, 90, 90], [90, 200, 200]]).unwrap();
        let out = fused_heatmap(&image, &[255, 0], None).unwrap();
        assert_eq!(out.pixels()[1], [0, 0, 0, 255]);
        assert_eq!(out.pixels()[0], [252, 230, 60, 255]);
    }

    #[test]
    fn test_heatmap_rejects_mismatched_inputs() {
        let image = RasterBuffer::from_rgb(2, 1, &[[220, 90, 90], [90, 200, 200]]).unwrap();
        assert!(fused_heatmap(&image, &[255], None).is_err());
        let mask = BinaryMask::empty(1, 2);
        assert!(matches!(
            fused_heatmap(&image, &[255, 0], Some(&mask)),
            Err(CoreError::MaskMismatch { .. })
        ));
    }
}

//! Bilateral filtering (edge-preserving smoothing) on 8-bit scalar maps.
//!
//! Each output pixel is a weighted mean over its 3×3 neighborhood, where
//! the weight is the product of a spatial Gaussian (distance from the
//! center) and a range Gaussian (intensity difference from the center).
//! Borders replicate the nearest edge pixel.

/// Range weights indexed by absolute intensity difference.
fn range_kernel(range_sigma: f64) -> [f64; 256] {
    let mut kernel = [0.0_f64; 256];
    let denom = 2.0 * range_sigma * range_sigma;
    for (i, val) in kernel.iter_mut().enumerate() {
        *val = (-((i * i) as f64) / denom).exp();
    }
    kernel
}

/// Spatial weights for offsets `-1..=1` in both axes, row-major.
fn spatial_kernel(spatial_sigma: f64) -> [f64; 9] {
    let mut kernel = [0.0_f64; 9];
    let denom = 2.0 * spatial_sigma * spatial_sigma;
    for (k, val) in kernel.iter_mut().enumerate() {
        let dx = (k % 3) as f64 - 1.0;
        let dy = (k / 3) as f64 - 1.0;
        *val = (-(dx * dx + dy * dy) / denom).exp();
    }
    kernel
}

/// Apply a 3×3 bilateral filter to a `width × height` byte map.
///
/// Both sigmas must be positive; non-positive values return the input
/// unchanged.
pub fn bilateral_3x3(
    values: &[u8],
    width: u32,
    height: u32,
    spatial_sigma: f64,
    range_sigma: f64,
) -> Vec<u8> {
    if spatial_sigma <= 0.0 || range_sigma <= 0.0 || values.is_empty() {
        return values.to_vec();
    }

    let (w, h) = (width as i64, height as i64);
    let spatial = spatial_kernel(spatial_sigma);
    let range = range_kernel(range_sigma);

    let mut out = vec![0u8; values.len()];
    for y in 0..h {
        for x in 0..w {
            let center = values[(y * w + x) as usize];
            let mut sum = 0.0;
            let mut weight_sum = 0.0;

            for (k, &sw) in spatial.iter().enumerate() {
                let sx = (x + (k % 3) as i64 - 1).clamp(0, w - 1);
                let sy = (y + (k / 3) as i64 - 1).clamp(0, h - 1);
                let neighbor = values[(sy * w + sx) as usize];
                let diff = center.abs_diff(neighbor) as usize;
                let weight = sw * range[diff];
                sum += neighbor as f64 * weight;
                weight_sum += weight;
            }

            out[(y * w + x) as usize] = if weight_sum > 0.0 {
                (sum / weight_sum).round().clamp(0.0, 255.0) as u8
            } else {
                center
            };
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_map_is_unchanged() {
        let values = vec![77u8; 25];
        assert_eq!(bilateral_3x3(&values, 5, 5, 1.0, 12.0), values);
    }

    #[test]
    fn test_strong_edge_is_preserved() {
        // Left columns 0, right columns 200: difference far outside the range sigma.
        let values: Vec<u8> = (0..36).map(|i| if i % 6 < 3 { 0 } else { 200 }).collect();
        let out = bilateral_3x3(&values, 6, 6, 1.0, 12.0);
        assert_eq!(out, values);
    }

    #[test]
    fn test_mild_speckle_is_smoothed() {
        let mut values = vec![100u8; 25];
        values[12] = 110;
        let out = bilateral_3x3(&values, 5, 5, 1.0, 12.0);
        assert!(out[12] < 110 && out[12] > 100, "center = {}", out[12]);
    }

    #[test]
    fn test_non_positive_sigma_is_identity() {
        let values = vec![1u8, 50, 200, 3];
        assert_eq!(bilateral_3x3(&values, 2, 2, 0.0, 12.0), values);
    }
}

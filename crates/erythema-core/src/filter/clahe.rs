//! Contrast-limited adaptive histogram equalization on a lightness map.
//!
//! # Algorithm
//! 1. Split the map into a grid of tiles (or one tile covering everything)
//! 2. Per tile, histogram `L × 255 / 100` into 256 bins
//! 3. Clip bins at `clip_limit × tile_pixels / 256` and spread the clipped
//!    mass uniformly over all bins
//! 4. The normalized CDF, rescaled to `[0, 100]`, is the tile's lookup table
//! 5. Every pixel is remapped through its own tile's table (no blending)
//!
//! # Complexity
//! O(N + tiles × 256)

use serde::{Deserialize, Serialize};

use crate::image::ScalarMap;

const BINS: usize = 256;

/// How the map is partitioned before equalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileGrid {
    /// The whole image is one tile (global equalization).
    Single,
    /// `cols × rows` tiles of (nearly) equal size.
    Grid { cols: u32, rows: u32 },
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::Grid { cols: 8, rows: 8 }
    }
}

impl TileGrid {
    fn dims(self) -> (u32, u32) {
        match self {
            Self::Single => (1, 1),
            Self::Grid { cols, rows } => (cols.max(1), rows.max(1)),
        }
    }
}

fn to_bin(l: f64) -> usize {
    let scaled = (l.clamp(0.0, 100.0) * 255.0 / 100.0).round();
    if scaled.is_nan() { 0 } else { scaled as usize }
}

/// Build the clipped-CDF lookup table for one tile's histogram.
fn tile_lut(hist: &[u32; BINS], pixel_count: usize, clip_limit: f64) -> [f64; BINS] {
    let limit = (clip_limit * pixel_count as f64 / BINS as f64).max(1.0);

    let mut clipped = [0.0_f64; BINS];
    let mut excess = 0.0;
    for (dst, &count) in clipped.iter_mut().zip(hist) {
        let count = count as f64;
        if count > limit {
            excess += count - limit;
            *dst = limit;
        } else {
            *dst = count;
        }
    }

    let share = excess / BINS as f64;
    let total = pixel_count as f64;
    let mut lut = [0.0_f64; BINS];
    let mut cdf = 0.0;
    for (slot, mass) in lut.iter_mut().zip(clipped) {
        cdf += mass + share;
        *slot = (cdf / total * 100.0).clamp(0.0, 100.0);
    }
    lut
}

/// Equalize a lightness map (`[0, 100]`) in place.
///
/// Tiles that end up empty because the image is smaller than the grid are
/// skipped. `clip_limit` must be positive; 2.0 is the usual value.
pub fn equalize_lightness(map: &mut ScalarMap, grid: TileGrid, clip_limit: f64) {
    let (width, height) = (map.width as usize, map.height as usize);
    if width == 0 || height == 0 {
        return;
    }
    let (cols, rows) = grid.dims();
    let (cols, rows) = (cols as usize, rows as usize);

    for ty in 0..rows {
        let y0 = ty * height / rows;
        let y1 = (ty + 1) * height / rows;
        for tx in 0..cols {
            let x0 = tx * width / cols;
            let x1 = (tx + 1) * width / cols;
            let pixel_count = (x1 - x0) * (y1 - y0);
            if pixel_count == 0 {
                continue;
            }

            let mut hist = [0u32; BINS];
            for y in y0..y1 {
                for &l in &map.values[y * width + x0..y * width + x1] {
                    hist[to_bin(l)] += 1;
                }
            }

            let lut = tile_lut(&hist, pixel_count, clip_limit);
            for y in y0..y1 {
                for l in &mut map.values[y * width + x0..y * width + x1] {
                    *l = lut[to_bin(*l)];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(width: u32, height: u32, values: Vec<f64>) -> ScalarMap {
        ScalarMap { width, height, values }
    }

    #[test]
    fn test_unclipped_two_level_tile_spreads_range() {
        // Half the pixels at L=40, half at L=45; no effective clipping.
        let mut m = map(4, 1, vec![40.0, 40.0, 45.0, 45.0]);
        equalize_lightness(&mut m, TileGrid::Single, 1000.0);
        assert!((m.values[0] - 50.0).abs() < 1e-9, "{:?}", m.values);
        assert!((m.values[3] - 100.0).abs() < 1e-9, "{:?}", m.values);
    }

    #[test]
    fn test_output_stays_in_range_and_preserves_order() {
        let values: Vec<f64> = (0..64).map(|i| 30.0 + i as f64 * 0.3).collect();
        let mut m = map(8, 8, values.clone());
        equalize_lightness(&mut m, TileGrid::Single, 2.0);
        for w in m.values.windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!(m.values.iter().all(|v| (0.0..=100.0).contains(v)));
        let spread = m.values[63] - m.values[0];
        assert!(spread > values[63] - values[0], "contrast should expand");
    }

    #[test]
    fn test_clipping_limits_amplification() {
        let values: Vec<f64> = (0..256).map(|i| if i % 2 == 0 { 50.0 } else { 52.0 }).collect();
        let mut strong = map(16, 16, values.clone());
        let mut clipped = map(16, 16, values);
        equalize_lightness(&mut strong, TileGrid::Single, 1000.0);
        equalize_lightness(&mut clipped, TileGrid::Single, 2.0);
        let gap_strong = (strong.values[1] - strong.values[0]).abs();
        let gap_clipped = (clipped.values[1] - clipped.values[0]).abs();
        assert!(gap_clipped < gap_strong);
    }

    #[test]
    fn test_tiles_are_independent() {
        // Left half dark, right half bright; each tile sees only one level.
        let mut values = Vec::new();
        for _ in 0..4 {
            values.extend([20.0, 20.0, 80.0, 80.0]);
        }
        let mut m = map(4, 4, values);
        equalize_lightness(&mut m, TileGrid::Grid { cols: 2, rows: 1 }, 1000.0);
        // A single-level tile maps its only level to the top of the CDF.
        assert!((m.get(0, 0) - 100.0).abs() < 1e-9);
        assert!((m.get(3, 3) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_larger_than_image_is_harmless() {
        let mut m = map(3, 2, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        equalize_lightness(&mut m, TileGrid::default(), 2.0);
        assert!(m.values.iter().all(|v| v.is_finite()));
    }
}

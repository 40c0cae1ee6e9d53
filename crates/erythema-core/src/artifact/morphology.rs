//! 3×3 morphology on float and binary maps.
//!
//! Only in-bounds neighbors take part, which is equivalent to replicating
//! the border for min/max filters.
//!
//! - **Dilation**: neighborhood maximum
//! - **Erosion**: neighborhood minimum
//! - **Closing**: dilation followed by erosion (fills thin dark features)
//! - **Black-hat**: closing minus the original

use crate::image::BinaryMask;

fn neighborhood_reduce(
    values: &[f64],
    width: u32,
    height: u32,
    init: f64,
    reduce: impl Fn(f64, f64) -> f64,
) -> Vec<f64> {
    let (w, h) = (width as usize, height as usize);
    let mut out = vec![init; values.len()];
    for y in 0..h {
        let (ylo, yhi) = (y.saturating_sub(1), (y + 1).min(h - 1));
        for x in 0..w {
            let (xlo, xhi) = (x.saturating_sub(1), (x + 1).min(w - 1));
            let mut acc = init;
            for ny in ylo..=yhi {
                for nx in xlo..=xhi {
                    acc = reduce(acc, values[ny * w + nx]);
                }
            }
            out[y * w + x] = acc;
        }
    }
    out
}

pub fn dilate_gray(values: &[f64], width: u32, height: u32) -> Vec<f64> {
    neighborhood_reduce(values, width, height, f64::NEG_INFINITY, f64::max)
}

pub fn erode_gray(values: &[f64], width: u32, height: u32) -> Vec<f64> {
    neighborhood_reduce(values, width, height, f64::INFINITY, f64::min)
}

pub fn close_gray(values: &[f64], width: u32, height: u32) -> Vec<f64> {
    erode_gray(&dilate_gray(values, width, height), width, height)
}

/// `closing − original`; non-negative, large on thin dark structures.
pub fn black_hat(values: &[f64], width: u32, height: u32) -> Vec<f64> {
    close_gray(values, width, height)
        .iter()
        .zip(values)
        .map(|(c, v)| (c - v).max(0.0))
        .collect()
}

fn binary_reduce(mask: &BinaryMask, any: bool) -> BinaryMask {
    let (w, h) = (mask.width as usize, mask.height as usize);
    let mut flags = vec![false; mask.flags.len()];
    for y in 0..h {
        let (ylo, yhi) = (y.saturating_sub(1), (y + 1).min(h - 1));
        for x in 0..w {
            let (xlo, xhi) = (x.saturating_sub(1), (x + 1).min(w - 1));
            let mut neighbors = (ylo..=yhi).flat_map(|ny| (xlo..=xhi).map(move |nx| ny * w + nx));
            flags[y * w + x] = if any {
                neighbors.any(|i| mask.flags[i])
            } else {
                neighbors.all(|i| mask.flags[i])
            };
        }
    }
    BinaryMask {
        width: mask.width,
        height: mask.height,
        flags,
    }
}

pub fn dilate_binary(mask: &BinaryMask) -> BinaryMask {
    binary_reduce(mask, true)
}

pub fn erode_binary(mask: &BinaryMask) -> BinaryMask {
    binary_reduce(mask, false)
}

/// One dilation then one erosion: removes pinholes and bridges 1-pixel gaps.
pub fn close_binary(mask: &BinaryMask) -> BinaryMask {
    erode_binary(&dilate_binary(mask))
}

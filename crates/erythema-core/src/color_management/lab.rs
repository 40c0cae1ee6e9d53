//! sRGB ↔ CIELAB conversion under a D65 white point.
//!
//! # Algorithm
//! 1. Decode sRGB to linear light
//! 2. Linear RGB → XYZ with the sRGB primary matrix, normalized by the D65 white
//! 3. XYZ → Lab with the CIE cube-root compression:
//!
//! ```text
//! f(t) = t^(1/3)               t > 0.008856
//!        7.787 × t + 16/116    otherwise
//!
//! L = 116 × f(Y) − 16
//! a = 500 × (f(X) − f(Y))
//! b = 200 × (f(Y) − f(Z))
//! ```
//!
//! The inverse uses the matching XYZ → sRGB matrix and clamps each channel
//! to `[0, 255]` after rounding.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use super::transfer::{linear_to_srgb, rgb_to_linear};

/// D65 reference white.
const WHITE_D65: DVec3 = DVec3::new(0.95047, 1.0, 1.08883);

const EPSILON: f64 = 0.008856;
const KAPPA_SLOPE: f64 = 7.787;
const OFFSET: f64 = 16.0 / 116.0;

// Column-major: each DVec3 is one column of the row-major matrix.
const SRGB_TO_XYZ: DMat3 = DMat3::from_cols(
    DVec3::new(0.4124, 0.2126, 0.0193),
    DVec3::new(0.3576, 0.7152, 0.1192),
    DVec3::new(0.1805, 0.0722, 0.9505),
);

const XYZ_TO_SRGB: DMat3 = DMat3::from_cols(
    DVec3::new(3.2406, -0.9689, 0.0557),
    DVec3::new(-1.5372, 1.8758, -0.2040),
    DVec3::new(-0.4986, 0.0415, 1.0570),
);

/// A CIELAB coordinate.
///
/// `l` is nominally in `[0, 100]`; `a` and `b` are unbounded but usually
/// fall in `[-128, 127]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}

fn compress(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA_SLOPE * t + OFFSET
    }
}

fn expand(f: f64) -> f64 {
    let cube = f * f * f;
    if cube > EPSILON {
        cube
    } else {
        (f - OFFSET) / KAPPA_SLOPE
    }
}

/// Convert an 8-bit sRGB triple to CIELAB.
pub fn rgb_to_lab(r: u8, g: u8, b: u8) -> Lab {
    let linear = DVec3::from_array(rgb_to_linear([r, g, b]));
    let xyz = (SRGB_TO_XYZ * linear) / WHITE_D65;

    let fx = compress(xyz.x);
    let fy = compress(xyz.y);
    let fz = compress(xyz.z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert CIELAB back to 8-bit sRGB, clamping out-of-gamut results.
pub fn lab_to_rgb(l: f64, a: f64, b: f64) -> [u8; 3] {
    let fy = (l + 16.0) / 116.0;
    let fx = a / 500.0 + fy;
    let fz = fy - b / 200.0;

    let xyz = DVec3::new(expand(fx), expand(fy), expand(fz)) * WHITE_D65;
    let linear = XYZ_TO_SRGB * xyz;
    let encoded = linear_to_srgb(linear.to_array());

    encoded.map(to_u8)
}

/// Scale a normalized channel to a byte, mapping NaN to 0.
fn to_u8(v: f64) -> u8 {
    let scaled = (v * 255.0).round();
    if scaled.is_nan() {
        0
    } else {
        scaled.clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_and_black() {
        let white = rgb_to_lab(255, 255, 255);
        assert!((white.l - 100.0).abs() < 0.01, "L = {}", white.l);
        assert!(white.a.abs() < 0.05 && white.b.abs() < 0.05);

        let black = rgb_to_lab(0, 0, 0);
        assert!(black.l.abs() < 1e-9);
    }

    #[test]
    fn test_red_has_positive_a() {
        let red = rgb_to_lab(255, 0, 0);
        assert!((red.l - 53.24).abs() < 0.1, "L = {}", red.l);
        assert!((red.a - 80.09).abs() < 0.2, "a = {}", red.a);
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        let mut samples: Vec<u8> = (0..=255).step_by(5).collect();
        samples.extend([1, 2, 3, 254]);
        for &r in &samples {
            for &g in &samples {
                for &b in &samples {
                    let lab = rgb_to_lab(r, g, b);
                    let back = lab_to_rgb(lab.l, lab.a, lab.b);
                    for (got, want) in back.iter().zip([r, g, b]) {
                        assert!(
                            (*got as i16 - want as i16).abs() <= 1,
                            "({r},{g},{b}) -> {back:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_gamut_is_clamped() {
        assert_eq!(lab_to_rgb(100.0, 200.0, 0.0)[0], 255);
        assert_eq!(lab_to_rgb(-20.0, 0.0, 0.0), [0, 0, 0]);
    }
}

//! sRGB transfer function (IEC 61966-2-1).
//!
//! ```text
//! to_linear:   V <= 0.04045 → V / 12.92
//!              V >  0.04045 → ((V + 0.055) / 1.055) ^ 2.4
//!
//! from_linear: L <= 0.0031308 → L × 12.92
//!              L >  0.0031308 → 1.055 × L^(1/2.4) − 0.055
//! ```
//!
//! 8-bit decoding goes through a 256-entry table built once per process.

use std::sync::OnceLock;

use palette::{LinSrgb, Srgb};

fn decode_table() -> &'static [f64; 256] {
    static TABLE: OnceLock<[f64; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0_f64; 256];
        for (sample, slot) in table.iter_mut().enumerate() {
            let v = sample as u8;
            let lin: LinSrgb<f64> = Srgb::new(v, v, v).into_format::<f64>().into_linear();
            *slot = lin.red;
        }
        table
    })
}

/// Decode one 8-bit sRGB sample to linear light in `[0, 1]`.
pub fn srgb_to_linear(sample: u8) -> f64 {
    decode_table()[sample as usize]
}

/// Decode an 8-bit RGB triple to linear light.
pub fn rgb_to_linear(rgb: [u8; 3]) -> [f64; 3] {
    [
        srgb_to_linear(rgb[0]),
        srgb_to_linear(rgb[1]),
        srgb_to_linear(rgb[2]),
    ]
}

/// Encode linear-light RGB to normalized sRGB (unclamped).
pub fn linear_to_srgb(linear: [f64; 3]) -> [f64; 3] {
    let encoded: Srgb<f64> = Srgb::from_linear(LinSrgb::new(linear[0], linear[1], linear[2]));
    [encoded.red, encoded.green, encoded.blue]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_segment_below_knee() {
        // 10 / 255 ≈ 0.0392 sits under the 0.04045 knee.
        let expected = (10.0 / 255.0) / 12.92;
        assert!((srgb_to_linear(10) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_power_segment_matches_formula() {
        let v: f64 = 200.0 / 255.0;
        let expected = ((v + 0.055) / 1.055).powf(2.4);
        assert!((srgb_to_linear(200) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_decode_is_monotonic() {
        for s in 1..=255u8 {
            assert!(srgb_to_linear(s) > srgb_to_linear(s - 1), "sample {s}");
        }
    }

    #[test]
    fn test_encode_inverts_decode() {
        for s in [0u8, 5, 64, 128, 200, 255] {
            let lin = srgb_to_linear(s);
            let back = linear_to_srgb([lin; 3])[0] * 255.0;
            assert!((back - s as f64).abs() < 1e-6, "sample {s}: {back}");
        }
    }
}

//! Linear contrast stretch around mid-gray.
//!
//! ```text
//! out = clamp(factor × (in − 128) + 128, 0, 255)
//! ```

use crate::image::RasterBuffer;

pub const DEFAULT_CONTRAST_FACTOR: f64 = 1.5;

/// Factor of the closing pass appended in derm mode.
pub const DERM_FINISH_FACTOR: f64 = 1.1;

/// Stretch one 8-bit sample.
pub fn stretch_sample(value: u8, factor: f64) -> u8 {
    let out = (factor * (value as f64 - 128.0) + 128.0).round();
    if out.is_nan() { 128 } else { out.clamp(0.0, 255.0) as u8 }
}

/// Apply the stretch to every RGB channel.
pub fn contrast_stretch(image: &RasterBuffer, factor: f64) -> RasterBuffer {
    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        *slot = stretch_sample(v as u8, factor);
    }
    image.map_rgb(|rgb| rgb.map(|c| lut[c as usize]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_gray_is_fixed() {
        assert_eq!(stretch_sample(128, 1.5), 128);
    }

    #[test]
    fn test_default_factor_values() {
        assert_eq!(stretch_sample(100, DEFAULT_CONTRAST_FACTOR), 86);
        assert_eq!(stretch_sample(200, DEFAULT_CONTRAST_FACTOR), 236);
        assert_eq!(stretch_sample(10, DEFAULT_CONTRAST_FACTOR), 0);
        assert_eq!(stretch_sample(250, DEFAULT_CONTRAST_FACTOR), 255);
    }

    #[test]
    fn test_unit_factor_is_identity() {
        let image = RasterBuffer::from_rgb(2, 1, &[[1, 2, 3], [250, 128, 0]]).unwrap();
        assert_eq!(contrast_stretch(&image, 1.0), image);
    }

    #[test]
    fn test_stretch_spreads_channels() {
        let image = RasterBuffer::from_rgb(1, 1, &[[150, 128, 100]]).unwrap();
        assert_eq!(contrast_stretch(&image, 1.5).rgb(0, 0), [161, 128, 86]);
    }
}

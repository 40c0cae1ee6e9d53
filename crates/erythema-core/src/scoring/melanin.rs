//! Melanin compensation: amplify a* in proportion to darkness.

use crate::color_management::{lab_to_rgb, rgb_to_lab};
use crate::image::RasterBuffer;

/// `1 + (100 − L) / 100`; 1.0 for white, 2.0 for black.
pub fn melanin_factor(l: f64) -> f64 {
    1.0 + (100.0 - l) / 100.0
}

pub fn melanin_compensate(image: &RasterBuffer) -> RasterBuffer {
    image.map_rgb(|[r, g, b]| {
        let lab = rgb_to_lab(r, g, b);
        lab_to_rgb(lab.l, lab.a * melanin_factor(lab.l), lab.b)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_endpoints() {
        assert_eq!(melanin_factor(100.0), 1.0);
        assert_eq!(melanin_factor(0.0), 2.0);
        assert_eq!(melanin_factor(50.0), 1.5);
    }

    #[test]
    fn test_dark_red_gains_more_than_light_red() {
        let dark = RasterBuffer::from_rgb(1, 1, &[[90, 40, 35]]).unwrap();
        let light = RasterBuffer::from_rgb(1, 1, &[[240, 190, 185]]).unwrap();

        let gain = |image: &RasterBuffer| {
            let [r, g, b] = image.rgb(0, 0);
            let before = rgb_to_lab(r, g, b);
            let [r2, g2, b2] = melanin_compensate(image).rgb(0, 0);
            rgb_to_lab(r2, g2, b2).a / before.a
        };
        assert!(gain(&dark) > gain(&light));
    }

    #[test]
    fn test_output_is_opaque() {
        let image = RasterBuffer::from_raw(1, 1, vec![10, 20, 30, 0]).unwrap();
        assert_eq!(melanin_compensate(&image).pixels()[0][3], 255);
    }
}

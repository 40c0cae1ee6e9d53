//! Individual Typology Angle (ITA) and skin-tone adaptive enhancement.
//!
//! ```text
//! ITA = atan((L − 50) / b) × 180 / π
//! ```
//!
//! Darker skin (lower ITA) gets a stronger a* boost to compensate for its
//! lower baseline redness contrast.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color_management::{lab_to_rgb, rgb_to_lab};
use crate::image::RasterBuffer;

/// Below this ITA the pixel is treated as dark skin.
pub const ITA_DARK_THRESHOLD: f64 = 10.0;
/// Below this ITA (and above the dark threshold) the pixel is treated as tan.
pub const ITA_TAN_THRESHOLD: f64 = 28.0;

const DARK_SKIN_ENHANCEMENT: f64 = 1.8;
const TAN_SKIN_ENHANCEMENT: f64 = 1.4;
const LIGHT_SKIN_ENHANCEMENT: f64 = 1.0;

/// ITA in degrees. A zero `b` returns ±90 depending on the sign of `L − 50`.
pub fn compute_ita(l: f64, b: f64) -> f64 {
    if b == 0.0 {
        return if l >= 50.0 { 90.0 } else { -90.0 };
    }
    ((l - 50.0) / b).atan().to_degrees()
}

/// Skin phototype bands derived from ITA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItaClass {
    VeryLight,
    Light,
    Intermediate,
    Tan,
    Brown,
    Dark,
}

impl ItaClass {
    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::VeryLight => "Very light",
            Self::Light => "Light",
            Self::Intermediate => "Intermediate",
            Self::Tan => "Tan",
            Self::Brown => "Brown",
            Self::Dark => "Dark",
        }
    }
}

impl fmt::Display for ItaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an ITA angle into its skin-tone band.
pub fn classify_ita(ita: f64) -> ItaClass {
    if ita > 55.0 {
        ItaClass::VeryLight
    } else if ita > 41.0 {
        ItaClass::Light
    } else if ita > 28.0 {
        ItaClass::Intermediate
    } else if ita > 10.0 {
        ItaClass::Tan
    } else if ita > -30.0 {
        ItaClass::Brown
    } else {
        ItaClass::Dark
    }
}

/// a* multiplier for a given ITA.
pub fn ita_enhancement(ita: f64) -> f64 {
    if ita < ITA_DARK_THRESHOLD {
        DARK_SKIN_ENHANCEMENT
    } else if ita < ITA_TAN_THRESHOLD {
        TAN_SKIN_ENHANCEMENT
    } else {
        LIGHT_SKIN_ENHANCEMENT
    }
}

/// Boost a* per pixel according to its skin-tone band.
pub fn ita_enhance(image: &RasterBuffer) -> RasterBuffer {
    image.map_rgb(|[r, g, b]| {
        let lab = rgb_to_lab(r, g, b);
        let factor = ita_enhancement(compute_ita(lab.l, lab.b));
        lab_to_rgb(lab.l, lab.a * factor, lab.b)
    })
}

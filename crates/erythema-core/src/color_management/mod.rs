//! Color management: sRGB transfer curve and CIELAB conversion.

pub mod lab;
pub mod transfer;

pub use lab::{Lab, lab_to_rgb, rgb_to_lab};
pub use transfer::{linear_to_srgb, srgb_to_linear};

//! Spatial filters used as intermediates by the scoring techniques.

pub mod bilateral;
pub mod clahe;

pub use bilateral::bilateral_3x3;
pub use clahe::{TileGrid, equalize_lightness};

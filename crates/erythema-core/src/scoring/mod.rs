//! Erythema-revealing transforms.
//!
//! Every technique is a pure function of its explicit inputs and returns a
//! fresh opaque [`RasterBuffer`](crate::image::RasterBuffer). Techniques that
//! understand occlusion masks take an `Option<&BinaryMask>`.
//!
//! Channel ratios (erythema index, hemoglobin index, spectral ratios) are all
//! computed on linear-light values.

pub mod contrast;
pub mod erythema_index;
pub mod ita;
pub mod lab_erythema;
pub mod melanin;
pub mod normalize;
pub mod spectral_ratio;

pub use contrast::{DEFAULT_CONTRAST_FACTOR, contrast_stretch};
pub use erythema_index::{calculate_erythema_index, erythema_index_map};
pub use ita::{ItaClass, classify_ita, compute_ita, ita_enhance};
pub use lab_erythema::{LabErythemaParams, lab_erythema_map, lab_erythema_value};
pub use melanin::melanin_compensate;
pub use normalize::{invert_u8_map, normalize_to_u8};
pub use spectral_ratio::{spectral_ratio_map, spectral_ratios};

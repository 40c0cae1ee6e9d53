//! Hair and occlusion suppression.
//!
//! Two detectors are OR-ed together and cleaned with a binary closing:
//! a black-hat response (thin dark structures) thresholded at
//! `mean + 1σ`, and the darkest decile of L*. The flagged pixels are then
//! filled by edge-aware diffusion from their neighbors.

pub mod inpaint;
pub mod morphology;
pub mod segmentation;

pub use inpaint::{InpaintParams, inpaint};
pub use segmentation::detect_artifacts;

use crate::error::CoreResult;
use crate::image::{BinaryMask, RasterBuffer};

/// Output of [`suppress_artifacts`].
#[derive(Debug, Clone)]
pub struct Suppressed {
    /// The input with flagged pixels inpainted.
    pub cleaned: RasterBuffer,
    /// Pixels that were flagged.
    pub mask: BinaryMask,
}

/// Detect artifacts and inpaint them.
pub fn suppress_artifacts(
    image: &RasterBuffer,
    params: &InpaintParams,
) -> CoreResult<Suppressed> {
    let mask = detect_artifacts(image)?;
    tracing::debug!(
        flagged = mask.count(),
        total = image.len(),
        "artifact mask computed"
    );
    let cleaned = inpaint(image, &mask, params)?;
    Ok(Suppressed { cleaned, mask })
}

//! Pipeline configuration.
//!
//! Deserializes from JSON with camelCase keys; every field is optional and
//! falls back to its default.

use serde::{Deserialize, Serialize};

use crate::artifact::InpaintParams;
use crate::error::{CoreError, CoreResult};
use crate::filter::TileGrid;
use crate::scoring::LabErythemaParams;
use crate::scoring::contrast::DEFAULT_CONTRAST_FACTOR;

/// CLAHE grid used for lightness in derm mode.
pub const DERM_CLAHE_GRID: TileGrid = TileGrid::Grid { cols: 8, rows: 8 };

/// Flags and tunables for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Enhanced ("derm") mode: local normalization, edge-aware smoothing of
    /// ratio maps, forced artifact suppression and melanin compensation, and
    /// a closing mild contrast pass.
    pub derm_mode: bool,
    /// Run artifact suppression even when not selected.
    pub hair_suppression: bool,
    /// Factor of the contrast-boost technique.
    pub contrast_factor: f64,
    /// CLAHE clip limit for the lightness pass.
    pub clahe_clip_limit: f64,
    /// Side of the square tiles for local `Lmax` in derm mode.
    pub lmax_tile_size: u32,
    /// Diffusion iterations for inpainting.
    pub inpaint_iterations: u32,
    /// Color-distance sigma for inpainting.
    pub inpaint_sigma: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let inpaint = InpaintParams::default();
        Self {
            derm_mode: false,
            hair_suppression: false,
            contrast_factor: DEFAULT_CONTRAST_FACTOR,
            clahe_clip_limit: 2.0,
            lmax_tile_size: 32,
            inpaint_iterations: inpaint.iterations,
            inpaint_sigma: inpaint.sigma,
        }
    }
}

impl PipelineConfig {
    /// Parse a (possibly partial) JSON document.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tunables that would produce non-finite output.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.contrast_factor.is_finite() {
            return Err(CoreError::InvalidParameter(format!(
                "contrast factor must be finite, got {}",
                self.contrast_factor
            )));
        }
        if !(self.clahe_clip_limit.is_finite() && self.clahe_clip_limit > 0.0) {
            return Err(CoreError::InvalidParameter(format!(
                "CLAHE clip limit must be positive, got {}",
                self.clahe_clip_limit
            )));
        }
        if self.lmax_tile_size == 0 {
            return Err(CoreError::InvalidParameter(
                "Lmax tile size must be at least 1".to_string(),
            ));
        }
        if !(self.inpaint_sigma.is_finite() && self.inpaint_sigma > 0.0) {
            return Err(CoreError::InvalidParameter(format!(
                "inpaint sigma must be positive, got {}",
                self.inpaint_sigma
            )));
        }
        Ok(())
    }

    /// Whether artifact suppression runs in the early phase.
    pub fn suppress_artifacts(&self) -> bool {
        self.derm_mode || self.hair_suppression
    }

    pub fn lab_params(&self) -> LabErythemaParams {
        if self.derm_mode {
            LabErythemaParams {
                clahe_grid: DERM_CLAHE_GRID,
                clip_limit: self.clahe_clip_limit,
                local_tile_size: Some(self.lmax_tile_size),
            }
        } else {
            LabErythemaParams {
                clahe_grid: TileGrid::Single,
                clip_limit: self.clahe_clip_limit,
                local_tile_size: None,
            }
        }
    }

    pub fn inpaint_params(&self) -> InpaintParams {
        InpaintParams {
            iterations: self.inpaint_iterations,
            sigma: self.inpaint_sigma,
        }
    }
}

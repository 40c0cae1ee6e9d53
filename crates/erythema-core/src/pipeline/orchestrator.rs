//! Sequences techniques into phases and assembles the run's outputs.
//!
//! # Phases
//! 1. **Early**: artifact suppression (produces the mask), then melanin
//!    compensation
//! 2. **Main**: scoring techniques in selection order, each consuming the
//!    previous output
//! 3. **Late**: contrast stretch, then the derm-mode closing pass
//!
//! The Lab-erythema map and fused heatmap are always part of the result.
//! When the Lab-erythema technique is not selected they are computed from
//! the buffer as it stood after the early phase.

use std::time::Instant;

use crate::analysis::{SkinSummary, summarize};
use crate::artifact::suppress_artifacts;
use crate::error::CoreResult;
use crate::fusion::fused_heatmap;
use crate::image::{BinaryMask, RasterBuffer};
use crate::scoring::contrast::DERM_FINISH_FACTOR;
use crate::scoring::lab_erythema::lab_erythema_gray;
use crate::scoring::{
    contrast_stretch, erythema_index_map, ita_enhance, melanin_compensate, spectral_ratio_map,
};

use super::config::PipelineConfig;
use super::technique::{Phase, Technique, TechniqueSelection};

/// The concrete order in which techniques will run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub early: Vec<Technique>,
    pub main: Vec<Technique>,
    pub late: Vec<Technique>,
    /// Factor of the closing contrast pass, if any.
    pub finish_contrast: Option<f64>,
}

impl ExecutionPlan {
    /// All steps in execution order (excluding the closing pass).
    pub fn steps(&self) -> impl Iterator<Item = Technique> + '_ {
        self.early
            .iter()
            .chain(&self.main)
            .chain(&self.late)
            .copied()
    }
}

/// Bucket a selection into phases.
///
/// Artifact suppression runs at most once and always first, so the mask
/// exists before anything reads it. Derm mode forces it and melanin
/// compensation into the early phase.
pub fn plan(selection: &TechniqueSelection, config: &PipelineConfig) -> ExecutionPlan {
    let mut early = Vec::new();
    if selection.contains(Technique::HairReduction) || config.suppress_artifacts() {
        early.push(Technique::HairReduction);
    }
    early.extend(
        selection
            .in_phase(Phase::Early)
            .filter(|t| *t != Technique::HairReduction),
    );
    if config.derm_mode && !early.contains(&Technique::MelaninFilter) {
        early.push(Technique::MelaninFilter);
    }

    ExecutionPlan {
        early,
        main: selection.in_phase(Phase::Main).collect(),
        late: selection.in_phase(Phase::Late).collect(),
        finish_contrast: config.derm_mode.then_some(DERM_FINISH_FACTOR),
    }
}

/// Everything produced by one run. Owned by the caller; nothing is cached.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Output of the last executed step.
    pub primary: RasterBuffer,
    /// Grayscale Lab-erythema map.
    pub lab_map: RasterBuffer,
    /// Lab-erythema fused with the hemoglobin index, colorized.
    pub fused_heatmap: RasterBuffer,
    /// Artifact mask, when suppression ran.
    pub mask: Option<BinaryMask>,
    /// Skin-tone summary of the conditioned (post-early) image.
    pub summary: SkinSummary,
}

impl PipelineResult {
    /// The mask as a black/white image for export.
    pub fn mask_raster(&self) -> Option<RasterBuffer> {
        self.mask.as_ref().map(BinaryMask::to_raster)
    }
}

/// Gray Lab-erythema bytes plus the buffer they were computed from.
struct LabCapture {
    gray: Vec<u8>,
    source: RasterBuffer,
}

fn apply(
    technique: Technique,
    image: &RasterBuffer,
    mask: Option<&BinaryMask>,
    config: &PipelineConfig,
    lab_capture: &mut Option<LabCapture>,
) -> CoreResult<RasterBuffer> {
    let mask = mask.filter(|_| technique.uses_mask());
    let out = match technique {
        Technique::AStarChannel => {
            let gray = lab_erythema_gray(image, mask, &config.lab_params())?;
            let out = RasterBuffer::from_gray(image.width(), image.height(), &gray);
            if lab_capture.is_none() {
                *lab_capture = Some(LabCapture {
                    gray,
                    source: image.clone(),
                });
            }
            out
        }
        Technique::ErythemaIndex => erythema_index_map(image),
        Technique::Ita => ita_enhance(image),
        Technique::RgbRatio => spectral_ratio_map(image, config.derm_mode),
        Technique::MelaninFilter => melanin_compensate(image),
        Technique::ContrastBoost => contrast_stretch(image, config.contrast_factor),
        // Handled by the caller because it also yields the mask.
        Technique::HairReduction => image.clone(),
    };
    Ok(out)
}

/// Run the selected techniques over `input`.
///
/// Fails only on an invalid configuration; unknown identifiers were already
/// dropped when the selection was built.
pub fn run_pipeline(
    input: &RasterBuffer,
    selection: &TechniqueSelection,
    config: &PipelineConfig,
) -> CoreResult<PipelineResult> {
    config.validate()?;
    let started = Instant::now();
    let plan = plan(selection, config);
    tracing::info!(
        width = input.width(),
        height = input.height(),
        steps = plan.early.len() + plan.main.len() + plan.late.len(),
        derm_mode = config.derm_mode,
        "running erythema pipeline"
    );

    let mut current = input.clone();
    let mut mask: Option<BinaryMask> = None;
    let mut lab_capture: Option<LabCapture> = None;

    for technique in plan.early.iter().copied() {
        tracing::debug!(%technique, phase = ?Phase::Early, "applying");
        if technique == Technique::HairReduction {
            let suppressed = suppress_artifacts(&current, &config.inpaint_params())?;
            current = suppressed.cleaned;
            mask = Some(suppressed.mask);
        } else {
            current = apply(technique, &current, mask.as_ref(), config, &mut lab_capture)?;
        }
    }

    let conditioned = current.clone();

    for technique in plan.main.iter().chain(&plan.late).copied() {
        tracing::debug!(%technique, phase = ?technique.phase(), "applying");
        current = apply(technique, &current, mask.as_ref(), config, &mut lab_capture)?;
    }

    if let Some(factor) = plan.finish_contrast {
        tracing::debug!(factor, "applying closing contrast pass");
        current = contrast_stretch(&current, factor);
    }

    let LabCapture { gray, source } = match lab_capture {
        Some(capture) => capture,
        None => LabCapture {
            gray: lab_erythema_gray(&conditioned, mask.as_ref(), &config.lab_params())?,
            source: conditioned.clone(),
        },
    };
    let lab_map = RasterBuffer::from_gray(source.width(), source.height(), &gray);
    let fused_heatmap = fused_heatmap(&source, &gray, mask.as_ref())?;
    let summary = summarize(&conditioned, mask.as_ref())?;

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        masked = mask.as_ref().map_or(0, BinaryMask::count),
        "pipeline finished"
    );

    Ok(PipelineResult {
        primary: current,
        lab_map,
        fused_heatmap,
        mask,
        summary,
    })
}

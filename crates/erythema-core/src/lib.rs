//! Erythema Core: domain layer for skin-redness analysis.
//!
//! This crate contains the color science, erythema scoring techniques,
//! artifact suppression, and pipeline orchestration. No file I/O or
//! framework dependencies; callers hand in RGBA8 buffers.

pub mod analysis;
pub mod artifact;
pub mod color_management;
pub mod error;
pub mod filter;
pub mod fusion;
pub mod image;
pub mod pipeline;
pub mod scoring;

// Re-exports for convenience.
pub use analysis::{SkinSummary, summarize};
pub use color_management::{Lab, lab_to_rgb, rgb_to_lab};
pub use error::{CoreError, CoreResult};
pub use image::{BinaryMask, RasterBuffer, ScalarMap};
pub use pipeline::{PipelineConfig, PipelineResult, Technique, TechniqueSelection, run_pipeline};
pub use scoring::{ItaClass, calculate_erythema_index, classify_ita, compute_ita, lab_erythema_value};

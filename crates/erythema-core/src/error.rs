//! Error types for the analysis pipeline.

/// Errors surfaced by the core.
///
/// Degenerate value ranges and non-finite intermediates are handled locally
/// and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("buffer of {actual} bytes does not match {width}x{height} RGBA (expected {expected})")]
    InvalidDimensions {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("mask is {mask_width}x{mask_height} ({flags} flags) but the image is {width}x{height}")]
    MaskMismatch {
        mask_width: u32,
        mask_height: u32,
        flags: usize,
        width: u32,
        height: u32,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown technique identifier: {0}")]
    UnknownTechnique(String),

    #[error("failed to parse pipeline configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;

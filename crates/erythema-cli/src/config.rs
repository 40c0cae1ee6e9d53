//! Pipeline configuration assembly for the CLI.
//!
//! Values come from three layers, later ones winning: built-in defaults (with
//! `ERYTHEMA_DERM` / `ERYTHEMA_HAIR` environment toggles), an optional JSON
//! file, then command-line flags.

use std::path::Path;

use erythema_core::PipelineConfig;

use crate::error::CliError;

/// Environment variable that enables derm mode when set.
const DERM_ENV: &str = "ERYTHEMA_DERM";
/// Environment variable that enables hair suppression when set.
const HAIR_ENV: &str = "ERYTHEMA_HAIR";

/// Overrides taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagOverrides {
    pub derm_mode: bool,
    pub hair_suppression: bool,
    pub contrast_factor: Option<f64>,
}

fn base_config(file: Option<&Path>) -> Result<PipelineConfig, CliError> {
    let mut config = match file {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            tracing::debug!("loaded pipeline config from {}", path.display());
            PipelineConfig::from_json(&json)?
        }
        None => PipelineConfig::default(),
    };
    config.derm_mode |= std::env::var_os(DERM_ENV).is_some();
    config.hair_suppression |= std::env::var_os(HAIR_ENV).is_some();
    Ok(config)
}

/// Build the effective configuration.
pub fn resolve(file: Option<&Path>, flags: FlagOverrides) -> Result<PipelineConfig, CliError> {
    let mut config = base_config(file)?;
    config.derm_mode |= flags.derm_mode;
    config.hair_suppression |= flags.hair_suppression;
    if let Some(factor) = flags.contrast_factor {
        config.contrast_factor = factor;
    }
    config.validate()?;
    Ok(config)
}

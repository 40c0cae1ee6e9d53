//! Erythema CLI: run the skin-redness pipeline over an image file.
//!
//! Decodes the input, runs the selected techniques, and writes the primary
//! output, the Lab-erythema map, the fused heatmap and (when suppression ran)
//! the artifact mask as PNG files.

mod config;
mod error;
mod image_loader;
mod logger;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use erythema_core::{TechniqueSelection, run_pipeline};

use crate::config::FlagOverrides;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "erythema")]
#[command(about = "Highlight erythema (skin redness) in a photograph")]
#[command(version)]
struct Cli {
    /// Path to the input image.
    #[arg(long)]
    input: PathBuf,

    /// Directory for the PNG outputs (created if missing).
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Technique to apply; repeat to chain. One of: a-star, erythema-index,
    /// ita, rgb-ratio, melanin-filter, contrast-boost, hair-reduction.
    #[arg(short = 't', long = "technique")]
    techniques: Vec<String>,

    /// Enable dermatology mode (artifact suppression, melanin compensation,
    /// tiled equalization, closing contrast pass).
    #[arg(long)]
    derm: bool,

    /// Suppress hair and dark artifacts before scoring.
    #[arg(long)]
    hair: bool,

    /// Contrast-boost factor (overrides the config file).
    #[arg(long)]
    contrast: Option<f64>,

    /// Pipeline configuration file (JSON, camelCase keys).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the skin-tone summary as JSON on stdout.
    #[arg(long)]
    summary: bool,
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let flags = FlagOverrides {
        derm_mode: cli.derm,
        hair_suppression: cli.hair,
        contrast_factor: cli.contrast,
    };
    let config = config::resolve(cli.config.as_deref(), flags)?;
    let selection = TechniqueSelection::from_ids(&cli.techniques);
    if selection.is_empty() {
        tracing::warn!("no techniques selected; primary output is the conditioned input");
    }

    let input = image_loader::load_image(&cli.input)?;
    let result = run_pipeline(&input, &selection, &config)?;

    std::fs::create_dir_all(&cli.out_dir)?;
    image_loader::save_png(&result.primary, &cli.out_dir.join("primary.png"))?;
    image_loader::save_png(&result.lab_map, &cli.out_dir.join("lab_map.png"))?;
    image_loader::save_png(&result.fused_heatmap, &cli.out_dir.join("fused_heatmap.png"))?;
    if let Some(mask) = result.mask_raster() {
        image_loader::save_png(&mask, &cli.out_dir.join("mask.png"))?;
    }

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&result.summary)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeated_techniques_keep_order() {
        let cli = Cli::parse_from([
            "erythema", "--input", "skin.png", "-t", "a-star", "--technique", "contrast-boost",
            "--derm",
        ]);
        assert_eq!(cli.techniques, ["a-star", "contrast-boost"]);
        assert!(cli.derm && !cli.hair);
        assert_eq!(cli.out_dir, PathBuf::from("out"));
    }
}

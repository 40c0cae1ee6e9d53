//! Image decoding and PNG export for the command-line front end.

use std::path::Path;

use erythema_core::RasterBuffer;

use crate::error::CliError;

/// Load an image from disk into an RGBA8 `RasterBuffer`.
///
/// Supports common formats via the `image` crate (PNG, JPEG, TIFF, BMP).
/// Higher bit depths are reduced to 8 bits per channel.
pub fn load_image(path: &Path) -> Result<RasterBuffer, CliError> {
    let img = image::open(path).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, color = ?img.color(), "decoded {}", path.display());
    Ok(RasterBuffer::from_raw(width, height, rgba.into_raw())?)
}

/// Write a buffer to `path` as PNG.
pub fn save_png(buffer: &RasterBuffer, path: &Path) -> Result<(), CliError> {
    image::save_buffer_with_format(
        path,
        buffer.as_bytes(),
        buffer.width(),
        buffer.height(),
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|source| CliError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

//! Image file decoding and encoding through the `image` crate.
//!
//! Decoded images take one of the two layouts plugins understand:
//! greyscale sources become 1-channel, everything else 3-channel RGB.
//! Alpha is dropped.

use std::fs;
use std::path::Path;

use image::{ColorType, ExtendedColorType, ImageFormat};
use tracing::{debug, info};

use imagedit_core::{AppError, AppResult, ImageBuffer, ImageSource};

/// Decodes the image file at `path`.
pub fn load(path: &Path) -> AppResult<ImageBuffer> {
    let decoded = image::open(path).map_err(|e| {
        AppError::codec(format!("Failed to decode '{}': {e}", path.display()))
    })?;

    let source = ImageSource::File(path.to_path_buf());
    let (width, height) = (decoded.width(), decoded.height());

    let buffer = if is_greyscale(decoded.color()) {
        ImageBuffer::packed(width, height, 1, decoded.into_luma8().into_raw(), source)?
    } else {
        ImageBuffer::packed(width, height, 3, decoded.into_rgb8().into_raw(), source)?
    };

    debug!(
        path = %path.display(),
        width,
        height,
        channels = buffer.channels(),
        "Image decoded"
    );

    Ok(buffer)
}

fn is_greyscale(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16
    )
}

/// Encodes `image` to `path`; the format follows the file extension.
pub fn save(image: &ImageBuffer, path: &Path) -> AppResult<()> {
    let format = ImageFormat::from_path(path).map_err(|_| {
        AppError::validation(format!(
            "Cannot tell the image format of '{}' from its extension",
            path.display()
        ))
    })?;

    let color = match image.channels() {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        other => {
            return Err(AppError::validation(format!(
                "Cannot encode an image with {other} channels"
            )));
        }
    };

    let pixels = image.packed_pixels();
    image::save_buffer_with_format(path, &pixels, image.width(), image.height(), color, format)
        .map_err(|e| AppError::codec(format!("Failed to encode '{}': {e}", path.display())))?;

    info!(
        path = %path.display(),
        format = ?format,
        width = image.width(),
        height = image.height(),
        "Image saved"
    );

    Ok(())
}

/// Size of the file at `path` in bytes.
pub fn file_size(path: &Path) -> AppResult<u64> {
    Ok(fs::metadata(path)?.len())
}

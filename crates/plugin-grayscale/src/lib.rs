//! # Plugin Grayscale
//!
//! An imagedit plugin that converts truecolor images to single-channel
//! greyscale. It reshapes the output buffer, so the host receives an image
//! in the indexed/greyscale layout. Greyscale input passes through.

use imagedit_plugin::prelude::*;
use tracing::debug;

/// Display name the plugin registers under.
pub const NAME: &str = "Grayscale";

/// Luma conversion (ITU-R BT.601 weights).
#[derive(Debug, Default)]
pub struct GrayscalePlugin;

impl GrayscalePlugin {
    /// Luma of one RGB pixel.
    pub fn luma(rgb: [u8; 3]) -> u8 {
        let [r, g, b] = rgb.map(u32::from);
        ((299 * r + 587 * g + 114 * b + 500) / 1000) as u8
    }
}

impl EditPlugin for GrayscalePlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn edit(&self, input: &ImageRef<'_>, output: &mut ImageMut<'_>) -> Result<(), String> {
        match input.channels() {
            1 => return Ok(()),
            3 => {}
            other => return Err(format!("cannot convert {other}-channel input")),
        }

        output.reshape(input.rows(), input.cols(), 1)?;

        for y in 0..input.rows() {
            let source = input.row(y).ok_or("input row out of range")?;
            let target = output.row_mut(y).ok_or("output row out of range")?;
            for (value, pixel) in target.iter_mut().zip(source.chunks_exact(3)) {
                *value = Self::luma([pixel[0], pixel[1], pixel[2]]);
            }
        }

        debug!(rows = input.rows(), cols = input.cols(), "Converted to greyscale");
        Ok(())
    }
}

export_plugin!(GrayscalePlugin);

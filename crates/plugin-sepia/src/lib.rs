//! # Plugin Sepia
//!
//! An imagedit plugin that gives truecolor images a sepia tone. It edits
//! the output buffer in place and keeps the input shape.

use imagedit_plugin::prelude::*;
use tracing::debug;

/// Display name the plugin registers under.
pub const NAME: &str = "Sepia";

/// Sepia tone filter for 3-channel images.
#[derive(Debug, Default)]
pub struct SepiaPlugin;

impl SepiaPlugin {
    /// Tones one RGB pixel.
    pub fn tone(rgb: [u8; 3]) -> [u8; 3] {
        let [r, g, b] = rgb.map(f32::from);
        let clamp = |v: f32| v.round().min(255.0) as u8;
        [
            clamp(0.393 * r + 0.769 * g + 0.189 * b),
            clamp(0.349 * r + 0.686 * g + 0.168 * b),
            clamp(0.272 * r + 0.534 * g + 0.131 * b),
        ]
    }
}

impl EditPlugin for SepiaPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn edit(&self, input: &ImageRef<'_>, output: &mut ImageMut<'_>) -> Result<(), String> {
        if input.channels() != 3 {
            return Err(format!(
                "sepia needs 3-channel input, got {}",
                input.channels()
            ));
        }

        for y in 0..output.rows() {
            let row = output.row_mut(y).ok_or("row out of range")?;
            for pixel in row.chunks_exact_mut(3) {
                let toned = Self::tone([pixel[0], pixel[1], pixel[2]]);
                pixel.copy_from_slice(&toned);
            }
        }

        debug!(rows = input.rows(), cols = input.cols(), "Sepia applied");
        Ok(())
    }
}

export_plugin!(SepiaPlugin);

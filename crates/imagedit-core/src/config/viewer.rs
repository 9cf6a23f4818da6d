//! Viewer configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for the image view and directory browsing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ViewerConfig {
    /// Factor applied by one zoom-in step (zoom-out divides by it).
    #[serde(default = "default_zoom_step")]
    #[validate(range(min = 1.01, max = 4.0))]
    pub zoom_step: f64,
    /// Image file extensions shown when browsing, without the dot.
    #[serde(default = "default_extensions")]
    #[validate(length(min = 1))]
    pub extensions: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: default_zoom_step(),
            extensions: default_extensions(),
        }
    }
}

fn default_zoom_step() -> f64 {
    1.2
}

/// Image extensions recognised for open, save and browse.
pub fn default_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "tif", "tiff", "bmp"]
        .into_iter()
        .map(String::from)
        .collect()
}

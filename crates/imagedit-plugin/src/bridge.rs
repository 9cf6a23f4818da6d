//! Format bridge between [`ImageBuffer`] and the plugin buffer layout.
//!
//! Plugins accept two layouts: 3-channel truecolor and 1-channel
//! indexed/greyscale. Both cross the bridge byte-for-byte, stride included,
//! so conversion is lossless in both directions.

use imagedit_core::{ImageBuffer, ImageSource};

use crate::buffer::PluginImage;
use crate::error::PluginError;

/// Channel counts plugins may receive and return.
pub const SUPPORTED_CHANNELS: [u8; 2] = [1, 3];

/// Whether plugins can process buffers with this channel count.
pub fn is_supported(channels: u8) -> bool {
    SUPPORTED_CHANNELS.contains(&channels)
}

/// Copies an image into the plugin layout.
pub fn to_plugin_image(image: &ImageBuffer) -> Result<PluginImage, PluginError> {
    if !is_supported(image.channels()) {
        return Err(PluginError::UnsupportedChannelLayout {
            channels: image.channels(),
        });
    }

    PluginImage::new(
        image.height(),
        image.width(),
        image.channels() as u32,
        image.stride(),
        image.pixels().to_vec(),
    )
}

/// Turns a plugin result back into an image marked as derived.
pub fn from_plugin_image(image: PluginImage) -> Result<ImageBuffer, PluginError> {
    let channels = u8::try_from(image.channels()).unwrap_or(u8::MAX);
    if !is_supported(channels) {
        return Err(PluginError::UnsupportedChannelLayout { channels });
    }

    let (rows, cols, stride) = (image.rows(), image.cols(), image.stride());
    ImageBuffer::from_raw(
        cols,
        rows,
        channels,
        stride,
        image.into_data(),
        ImageSource::Derived,
    )
    .map_err(|e| PluginError::InvalidImage(e.message))
}

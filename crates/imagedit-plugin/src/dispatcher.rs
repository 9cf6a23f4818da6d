//! Plugin dispatcher: runs a registered plugin on the current image.
//!
//! The dispatcher never touches the caller's image. It bridges a copy into
//! the plugin layout, runs the plugin on that copy, re-reads the output shape
//! the plugin left behind, and hands back a new derived image. Any failure
//! leaves the caller with the image it already had.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use imagedit_core::ImageBuffer;
use tracing::{debug, info, warn};

use crate::bridge::{from_plugin_image, to_plugin_image};
use crate::buffer::PluginImage;
use crate::error::PluginError;
use crate::registry::PluginRegistry;
use crate::traits::EditPlugin;

/// Dispatches edits to plugins in a shared registry.
#[derive(Debug, Clone)]
pub struct PluginDispatcher {
    /// Plugin registry.
    registry: Arc<PluginRegistry>,
}

impl PluginDispatcher {
    /// Creates a new dispatcher.
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Applies the plugin called `name` to `image`.
    ///
    /// Checks run in order: an image must be loaded, the plugin must exist,
    /// and the image must have a supported channel layout.
    pub fn apply(&self, name: &str, image: Option<&ImageBuffer>) -> Result<ImageBuffer, PluginError> {
        let image = image.ok_or(PluginError::NoImageLoaded)?;

        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| PluginError::PluginNotFound {
                name: name.to_string(),
            })?;

        let input = to_plugin_image(image)?;

        debug!(
            plugin = %name,
            width = image.width(),
            height = image.height(),
            channels = image.channels(),
            "Dispatching plugin"
        );

        let output = invoke(descriptor.plugin.as_ref(), &input)?;
        let edited = from_plugin_image(output).map_err(|e| PluginError::fault(name, e.to_string()))?;

        info!(
            plugin = %name,
            width = edited.width(),
            height = edited.height(),
            channels = edited.channels(),
            "Plugin edit applied"
        );

        Ok(edited)
    }

    /// Returns the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }
}

/// Runs `plugin` on a copy of `input` and returns the plugin's output.
///
/// Plugin errors, panics, and inconsistent output descriptors are all
/// reported as [`PluginError::Fault`].
pub fn invoke(plugin: &dyn EditPlugin, input: &PluginImage) -> Result<PluginImage, PluginError> {
    let name = plugin.name();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        input.edit_with(|input, output| plugin.edit(input, output))
    }));

    match outcome {
        Ok(Ok((output, Ok(())))) => Ok(output),
        Ok(Ok((_, Err(reason)))) => {
            warn!(plugin = %name, reason = %reason, "Plugin edit failed");
            Err(PluginError::fault(name, reason))
        }
        Ok(Err(reason)) => {
            warn!(plugin = %name, reason = %reason, "Plugin left an invalid output buffer");
            Err(PluginError::fault(name, format!("invalid output buffer: {reason}")))
        }
        Err(_) => {
            warn!(plugin = %name, "Plugin panicked");
            Err(PluginError::fault(name, "plugin panicked"))
        }
    }
}

//! Error type for plugin loading and dispatch.

use std::path::PathBuf;

use imagedit_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Errors raised while loading or running plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// An edit was requested with no current image.
    #[error("No image loaded")]
    NoImageLoaded,

    /// No registered plugin has the requested display name.
    #[error("Plugin '{name}' not found")]
    PluginNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The shared library could not be opened.
    #[error("Failed to load plugin library '{path}': {reason}")]
    LoadFailed {
        /// Library path.
        path: PathBuf,
        /// Loader diagnostic.
        reason: String,
    },

    /// The library does not export the descriptor entry point.
    #[error("Plugin '{path}' missing 'imagedit_plugin_descriptor' symbol")]
    MissingEntryPoint {
        /// Library path.
        path: PathBuf,
    },

    /// The entry point returned a null descriptor.
    #[error("Plugin '{path}' returned a null descriptor")]
    NullDescriptor {
        /// Library path.
        path: PathBuf,
    },

    /// The plugin was built against another ABI version.
    #[error("Plugin '{path}' ABI version mismatch: expected {expected}, got {actual}")]
    AbiMismatch {
        /// Library path.
        path: PathBuf,
        /// Host ABI version.
        expected: u32,
        /// Version reported by the plugin.
        actual: u32,
    },

    /// The image has a channel layout plugins cannot receive.
    #[error("Unsupported channel layout: {channels} channel(s), expected 1 or 3")]
    UnsupportedChannelLayout {
        /// Channel count of the rejected image.
        channels: u8,
    },

    /// The plugin failed while editing, or left the output in an invalid state.
    #[error("Plugin '{plugin}' failed: {reason}")]
    Fault {
        /// Display name of the plugin.
        plugin: String,
        /// What went wrong.
        reason: String,
    },

    /// A buffer handed to or returned from the plugin layer is malformed.
    #[error("Invalid image layout: {0}")]
    InvalidImage(String),
}

impl PluginError {
    /// Builds a fault for the named plugin.
    pub fn fault(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fault {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error belongs to the load phase.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::LoadFailed { .. }
                | Self::MissingEntryPoint { .. }
                | Self::NullDescriptor { .. }
                | Self::AbiMismatch { .. }
        )
    }
}

impl From<PluginError> for AppError {
    fn from(err: PluginError) -> Self {
        let kind = match &err {
            PluginError::NoImageLoaded => ErrorKind::NoImage,
            PluginError::PluginNotFound { .. } => ErrorKind::NotFound,
            PluginError::UnsupportedChannelLayout { .. } | PluginError::InvalidImage(_) => {
                ErrorKind::Validation
            }
            _ => ErrorKind::Plugin,
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err)
    }
}

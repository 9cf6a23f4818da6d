//! Plugin loading: the [`PluginLoader`] seam, the `libloading`-backed
//! [`DynamicLoader`] (feature `dynamic`), and [`ForeignPlugin`], the host-side
//! wrapper around a plugin descriptor.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::buffer::{ImageMut, ImageRef};
use crate::error::PluginError;
use crate::ffi::abi::{FfiEditStatus, FfiPluginDescriptor, IMAGEDIT_ABI_VERSION};
use crate::ffi::safety::c_str_to_string;
use crate::traits::EditPlugin;

/// Turns a candidate file into a plugin instance.
pub trait PluginLoader {
    /// Loads the plugin at `path`.
    fn load(&mut self, path: &Path) -> Result<Arc<dyn EditPlugin>, PluginError>;
}

/// A plugin implemented behind the C ABI.
pub struct ForeignPlugin {
    name: String,
    origin: PathBuf,
    descriptor: *const FfiPluginDescriptor,
    /// Keeps the code behind `descriptor` mapped.
    #[cfg(feature = "dynamic")]
    _library: Option<libloading::Library>,
}

// SAFETY: the descriptor points at static data and function pointers inside
// a library that stays loaded while this value exists. Plugins are required
// to be callable from any thread by the `EditPlugin` contract.
unsafe impl Send for ForeignPlugin {}
unsafe impl Sync for ForeignPlugin {}

impl ForeignPlugin {
    /// Wraps a descriptor returned by a plugin entry point.
    ///
    /// Validates the ABI version and reads the display name.
    ///
    /// # Safety
    /// `descriptor` must be null or point to a valid descriptor whose
    /// function pointers stay callable for the lifetime of the result.
    pub unsafe fn from_descriptor(
        descriptor: *const FfiPluginDescriptor,
        origin: &Path,
    ) -> Result<Self, PluginError> {
        if descriptor.is_null() {
            return Err(PluginError::NullDescriptor {
                path: origin.to_path_buf(),
            });
        }

        // SAFETY: checked non-null; caller guarantees validity.
        let desc = unsafe { &*descriptor };
        if desc.abi_version != IMAGEDIT_ABI_VERSION {
            return Err(PluginError::AbiMismatch {
                path: origin.to_path_buf(),
                expected: IMAGEDIT_ABI_VERSION,
                actual: desc.abi_version,
            });
        }

        // SAFETY: the name accessor returns a static null-terminated string.
        let name = unsafe { c_str_to_string((desc.name)()) }
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| PluginError::LoadFailed {
                path: origin.to_path_buf(),
                reason: "plugin reported an empty or invalid name".to_string(),
            })?;

        Ok(Self {
            name,
            origin: origin.to_path_buf(),
            descriptor,
            #[cfg(feature = "dynamic")]
            _library: None,
        })
    }

    /// Path the plugin was loaded from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }
}

impl EditPlugin for ForeignPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn edit(&self, input: &ImageRef<'_>, output: &mut ImageMut<'_>) -> Result<(), String> {
        // SAFETY: descriptor validated at construction and kept alive by self.
        let status = unsafe {
            let desc = &*self.descriptor;
            (desc.edit)(input.as_raw(), output.as_raw_mut())
        };

        match FfiEditStatus::from_code(status) {
            FfiEditStatus::Ok => Ok(()),
            FfiEditStatus::Failed => Err(self
                .last_error()
                .unwrap_or_else(|| "plugin reported an error".to_string())),
            FfiEditStatus::Panicked => Err("plugin panicked".to_string()),
            FfiEditStatus::InvalidArgument => Err(match self.last_error() {
                Some(message) => format!("plugin rejected its buffers: {message}"),
                None => "plugin rejected its buffers".to_string(),
            }),
        }
    }
}

impl ForeignPlugin {
    /// Copies the plugin's message for the failed call that just returned.
    fn last_error(&self) -> Option<String> {
        // SAFETY: descriptor validated at construction; the returned string is
        // copied before any further call into the plugin.
        unsafe {
            let desc = &*self.descriptor;
            c_str_to_string((desc.last_error)())
        }
        .filter(|message| !message.is_empty())
    }
}

impl fmt::Debug for ForeignPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignPlugin")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish()
    }
}

#[cfg(feature = "dynamic")]
pub mod dynamic_loader {
    use std::path::Path;
    use std::sync::Arc;

    use tracing::{debug, info};

    use super::{ForeignPlugin, PluginLoader};
    use crate::error::PluginError;
    use crate::ffi::abi::{DESCRIPTOR_SYMBOL, FfiPluginDescriptorFn};
    use crate::traits::EditPlugin;

    /// Loads plugins from shared libraries (.so / .dll / .dylib).
    #[derive(Debug, Default)]
    pub struct DynamicLoader;

    impl DynamicLoader {
        /// Creates a new dynamic loader.
        pub fn new() -> Self {
            Self
        }

        /// Loads a plugin from the given shared library path.
        ///
        /// # Safety
        /// This function loads arbitrary code from a shared library and runs
        /// its initialisers and entry point. Only load trusted plugins.
        pub unsafe fn load_from_path(&mut self, path: &Path) -> Result<ForeignPlugin, PluginError> {
            let lib = unsafe { libloading::Library::new(path) }.map_err(|e| {
                PluginError::LoadFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;

            let entry: FfiPluginDescriptorFn = {
                let symbol: libloading::Symbol<'_, FfiPluginDescriptorFn> =
                    unsafe { lib.get(DESCRIPTOR_SYMBOL) }.map_err(|e| {
                        debug!(path = %path.display(), error = %e, "Descriptor symbol lookup failed");
                        PluginError::MissingEntryPoint {
                            path: path.to_path_buf(),
                        }
                    })?;
                *symbol
            };

            let descriptor = unsafe { entry() };
            let mut plugin = unsafe { ForeignPlugin::from_descriptor(descriptor, path) }?;
            plugin._library = Some(lib);

            info!(
                path = %path.display(),
                plugin = %plugin.name,
                "Dynamic plugin loaded"
            );

            Ok(plugin)
        }
    }

    impl PluginLoader for DynamicLoader {
        fn load(&mut self, path: &Path) -> Result<Arc<dyn EditPlugin>, PluginError> {
            // SAFETY: plugin directories come from configuration and are
            // trusted by whoever runs the editor.
            let plugin = unsafe { self.load_from_path(path) }?;
            Ok(Arc::new(plugin))
        }
    }
}

/// Stub loader when the `dynamic` feature is not enabled.
#[cfg(not(feature = "dynamic"))]
pub mod dynamic_loader {
    use std::path::Path;
    use std::sync::Arc;

    use super::PluginLoader;
    use crate::error::PluginError;
    use crate::traits::EditPlugin;

    /// Stub dynamic loader; every load fails.
    #[derive(Debug, Default)]
    pub struct DynamicLoader;

    impl DynamicLoader {
        /// Creates a stub loader.
        pub fn new() -> Self {
            Self
        }
    }

    impl PluginLoader for DynamicLoader {
        fn load(&mut self, path: &Path) -> Result<Arc<dyn EditPlugin>, PluginError> {
            Err(PluginError::LoadFailed {
                path: path.to_path_buf(),
                reason: "dynamic plugin loading is disabled".to_string(),
            })
        }
    }
}

pub use dynamic_loader::DynamicLoader;

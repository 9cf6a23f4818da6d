//! # imagedit-plugin
//!
//! Plugin framework for imagedit. Provides:
//!
//! - The `EditPlugin` transform contract and its C ABI mirror
//! - Buffer views handed to plugins, and the host-owned interchange buffer
//! - Dynamic loading via `libloading` (feature `dynamic`, on by default)
//! - Directory discovery into a name-keyed registry
//! - Dispatch of a plugin onto the current image, with a lossless format bridge
//! - `export_plugin!` for building plugin libraries

pub mod bridge;
pub mod buffer;
pub mod discovery;
pub mod dispatcher;
pub mod error;
pub mod exports;
pub mod ffi;
pub mod loader;
pub mod macros;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod traits;

pub use buffer::{ImageMut, ImageRef, PluginImage};
pub use discovery::{DiscoveryReport, LoadedPlugin, SkippedPlugin, discover, discover_into};
pub use dispatcher::PluginDispatcher;
pub use error::PluginError;
pub use loader::{DynamicLoader, PluginLoader};
pub use manager::PluginManager;
pub use registry::{PluginDescriptor, PluginRegistry};
pub use traits::EditPlugin;

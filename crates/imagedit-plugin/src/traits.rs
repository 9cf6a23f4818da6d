//! The image transform contract every plugin implements.

use crate::buffer::{ImageMut, ImageRef};

/// An image-processing plugin.
///
/// Implemented directly by compiled-in plugins and by plugin libraries
/// (exported through [`export_plugin!`](crate::export_plugin)). Dynamically
/// loaded libraries are wrapped by the host in a type that implements it
/// again, so the registry only ever deals with `dyn EditPlugin`.
pub trait EditPlugin: Send + Sync + std::fmt::Debug {
    /// Display name; used as the registry key and menu label.
    fn name(&self) -> &str;

    /// Transforms `input` into `output`.
    ///
    /// `output` starts as an exact copy of `input`, so in-place edits need
    /// no extra work. Call [`ImageMut::reshape`] first to produce a
    /// different size or channel count.
    fn edit(&self, input: &ImageRef<'_>, output: &mut ImageMut<'_>) -> Result<(), String>;
}

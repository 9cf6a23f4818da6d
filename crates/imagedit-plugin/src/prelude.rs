//! Prelude for plugin crates.

pub use crate::buffer::{ImageMut, ImageRef};
pub use crate::traits::EditPlugin;

pub use crate::export_plugin;

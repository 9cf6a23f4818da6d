//! Shared test helpers for integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use imagedit_core::config::viewer::ViewerConfig;
use imagedit_plugin::{EditPlugin, ImageMut, ImageRef, PluginRegistry};
use imagedit_service::EditorSession;
use plugin_sepia::SepiaPlugin;

/// Scratch directory holding test images
pub struct TestDir {
    /// Backing temp directory, removed on drop
    pub dir: TempDir,
}

impl TestDir {
    /// Create an empty scratch directory
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Absolute path of `name` inside the directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a solid-colour RGB image; the format follows the extension
    pub fn rgb(&self, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
        let path = self.path(name);
        image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
            .save(&path)
            .expect("Failed to write RGB fixture");
        path
    }

    /// Write a greyscale image with a horizontal gradient
    pub fn gray(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.path(name);
        image::GrayImage::from_fn(width, height, |x, _| image::Luma([(x % 256) as u8]))
            .save(&path)
            .expect("Failed to write greyscale fixture");
        path
    }

    /// Write a file that is not an image
    pub fn junk(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, b"not an image").expect("Failed to write junk file");
        path
    }
}

/// Returns the input unchanged
#[derive(Debug)]
pub struct Identity;

impl EditPlugin for Identity {
    fn name(&self) -> &str {
        "Identity"
    }

    fn edit(&self, _input: &ImageRef<'_>, _output: &mut ImageMut<'_>) -> Result<(), String> {
        Ok(())
    }
}

/// Reshapes the output to one channel holding the first input channel
#[derive(Debug)]
pub struct FirstChannel;

impl EditPlugin for FirstChannel {
    fn name(&self) -> &str {
        "First Channel"
    }

    fn edit(&self, input: &ImageRef<'_>, output: &mut ImageMut<'_>) -> Result<(), String> {
        output.reshape(input.rows(), input.cols(), 1)?;
        for y in 0..input.rows() {
            for x in 0..input.cols() {
                let value = input.pixel(x, y).ok_or("pixel out of range")?[0];
                output.pixel_mut(x, y).ok_or("pixel out of range")?[0] = value;
            }
        }
        Ok(())
    }
}

/// Always panics
#[derive(Debug)]
pub struct Broken;

impl EditPlugin for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    fn edit(&self, _input: &ImageRef<'_>, _output: &mut ImageMut<'_>) -> Result<(), String> {
        panic!("broken plugin");
    }
}

/// Registry with Sepia and the test plugins
pub fn registry() -> Arc<PluginRegistry> {
    let mut registry = PluginRegistry::new();
    registry.register_builtin(Arc::new(SepiaPlugin), "basic");
    registry.register_builtin(Arc::new(Identity), "basic");
    registry.register_builtin(Arc::new(FirstChannel), "advanced");
    registry.register_builtin(Arc::new(Broken), "advanced");
    Arc::new(registry)
}

/// Fresh session over [`registry`] with default viewer settings
pub fn session() -> EditorSession {
    EditorSession::new(registry(), ViewerConfig::default())
}

/// File name of a path, for readable assertions
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

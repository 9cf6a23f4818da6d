//! Editor session: the current image and everything done to it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use imagedit_core::config::viewer::ViewerConfig;
use imagedit_core::{AppError, AppResult, ImageBuffer, ImageSource};
use imagedit_plugin::{PluginDispatcher, PluginRegistry};

use crate::browser::{self, NavigationState};
use crate::codec;
use crate::view::ViewTransform;

/// One editing session.
///
/// The session is the single owner of the current image. Every successful
/// open, navigation or plugin edit swaps in a whole new buffer; failed
/// operations leave the session exactly as it was.
#[derive(Debug)]
pub struct EditorSession {
    /// Image on display.
    current: Option<ImageBuffer>,
    /// File the image was opened from. Kept across plugin edits so
    /// navigation still works on a derived image.
    path: Option<PathBuf>,
    /// Display transform.
    view: ViewTransform,
    /// Plugin dispatcher.
    dispatcher: PluginDispatcher,
    /// Viewer settings.
    viewer: ViewerConfig,
}

impl EditorSession {
    /// Creates an empty session.
    pub fn new(registry: Arc<PluginRegistry>, viewer: ViewerConfig) -> Self {
        Self {
            current: None,
            path: None,
            view: ViewTransform::default(),
            dispatcher: PluginDispatcher::new(registry),
            viewer,
        }
    }

    /// Opens the image at `path`.
    pub fn open(&mut self, path: &Path) -> AppResult<()> {
        let image = codec::load(path)?;

        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Image opened"
        );

        self.current = Some(image);
        self.path = Some(path.to_path_buf());
        self.view.reset();
        Ok(())
    }

    /// Opens the next image in the directory. `Ok(false)` when there is none.
    pub fn next(&mut self) -> AppResult<bool> {
        self.step(1)
    }

    /// Opens the previous image in the directory. `Ok(false)` when there is none.
    pub fn previous(&mut self) -> AppResult<bool> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> AppResult<bool> {
        let Some(current) = self.path.as_deref() else {
            debug!("No file context, navigation ignored");
            return Ok(false);
        };

        match browser::neighbor(current, delta, &self.viewer.extensions) {
            Some(target) => {
                self.open(&target)?;
                Ok(true)
            }
            None => {
                debug!(path = %current.display(), delta, "No neighbour in that direction");
                Ok(false)
            }
        }
    }

    /// Previous/next availability for the current file.
    pub fn navigation(&self) -> NavigationState {
        self.path
            .as_deref()
            .map(|path| browser::navigation_state(path, &self.viewer.extensions))
            .unwrap_or_default()
    }

    /// Runs the named plugin on the current image and displays the result.
    pub fn apply_plugin(&mut self, name: &str) -> AppResult<()> {
        let edited = self.dispatcher.apply(name, self.current.as_ref())?;
        self.current = Some(edited);
        Ok(())
    }

    /// Writes the current image to `path`. The session keeps its image.
    pub fn save_as(&self, path: &Path) -> AppResult<()> {
        let image = self
            .current
            .as_ref()
            .ok_or_else(|| AppError::no_image("No image loaded"))?;
        codec::save(image, path)
    }

    /// Zooms in one step.
    pub fn zoom_in(&mut self) {
        if self.current.is_some() {
            self.view.zoom_in(self.viewer.zoom_step);
        }
    }

    /// Zooms out one step.
    pub fn zoom_out(&mut self) {
        if self.current.is_some() {
            self.view.zoom_out(self.viewer.zoom_step);
        }
    }

    /// Rotates the view 90° counter-clockwise.
    pub fn rotate_left(&mut self) {
        if self.current.is_some() {
            self.view.rotate_left();
        }
    }

    /// Rotates the view 90° clockwise.
    pub fn rotate_right(&mut self) {
        if self.current.is_some() {
            self.view.rotate_right();
        }
    }

    /// One-line description of the current image.
    pub fn status_line(&self) -> String {
        let Some(image) = &self.current else {
            return "No image loaded".to_string();
        };

        match image.source() {
            ImageSource::File(path) => match codec::file_size(path) {
                Ok(bytes) => format!(
                    "{}, {}x{}, {} Bytes",
                    path.display(),
                    image.width(),
                    image.height(),
                    bytes
                ),
                Err(_) => format!("{}, {}x{}", path.display(), image.width(), image.height()),
            },
            ImageSource::Derived => {
                format!("(edited image), {}x{}", image.width(), image.height())
            }
        }
    }

    /// Current image, if any.
    pub fn current(&self) -> Option<&ImageBuffer> {
        self.current.as_ref()
    }

    /// File the current image came from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current display transform.
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    /// Plugin registry used by this session.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        self.dispatcher.registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use imagedit_core::error::ErrorKind;
    use imagedit_plugin::{EditPlugin, ImageMut, ImageRef};

    #[derive(Debug)]
    struct Invert;

    impl EditPlugin for Invert {
        fn name(&self) -> &str {
            "Invert"
        }

        fn edit(&self, _input: &ImageRef<'_>, output: &mut ImageMut<'_>) -> Result<(), String> {
            output.as_bytes_mut().iter_mut().for_each(|b| *b = 255 - *b);
            Ok(())
        }
    }

    fn session() -> EditorSession {
        let mut registry = PluginRegistry::new();
        registry.register_builtin(Arc::new(Invert), "basic");
        EditorSession::new(Arc::new(registry), ViewerConfig::default())
    }

    fn write_png(path: &Path, width: u32, height: u32, value: u8) {
        image::RgbImage::from_pixel(width, height, image::Rgb([value, value, value]))
            .save(path)
            .expect("save fixture");
    }

    #[test]
    fn test_empty_session() {
        let mut session = session();
        assert_eq!(session.status_line(), "No image loaded");
        assert_eq!(session.navigation(), NavigationState::default());
        assert!(!session.next().expect("next"));

        session.zoom_in();
        session.rotate_right();
        assert_eq!(session.view(), ViewTransform::default());

        let err = session.apply_plugin("Invert").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoImage);

        let err = session.save_as(Path::new("/tmp/never.png")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoImage);
    }

    #[test]
    fn test_open_and_status_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a.png");
        write_png(&path, 8, 6, 10);

        let mut session = session();
        session.open(&path).expect("open");

        let size = fs::metadata(&path).expect("metadata").len();
        assert_eq!(
            session.status_line(),
            format!("{}, 8x6, {} Bytes", path.display(), size)
        );
    }

    #[test]
    fn test_failed_open_keeps_previous_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("a.png");
        write_png(&good, 2, 2, 0);
        let bad = dir.path().join("b.png");
        fs::write(&bad, b"junk").expect("write");

        let mut session = session();
        session.open(&good).expect("open");
        session.zoom_in();

        assert!(session.open(&bad).is_err());
        assert_eq!(session.path(), Some(good.as_path()));
        assert!(session.view().scale > 1.0);
    }

    #[test]
    fn test_plugin_edit_keeps_file_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_png(&a, 3, 2, 200);
        write_png(&b, 3, 2, 0);

        let mut session = session();
        session.open(&a).expect("open");
        session.rotate_right();
        session.apply_plugin("Invert").expect("apply");

        let current = session.current().expect("image");
        assert!(current.is_derived());
        assert_eq!(current.pixel(0, 0), Some(&[55u8, 55, 55][..]));
        assert_eq!(session.status_line(), "(edited image), 3x2");
        assert_eq!(session.view().rotation, 90);

        assert!(session.navigation().has_next);
        assert!(session.next().expect("next"));
        assert_eq!(session.path(), Some(b.as_path()));
        assert_eq!(session.view(), ViewTransform::default());
    }

    #[test]
    fn test_unknown_plugin_leaves_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.png");
        write_png(&a, 2, 2, 9);

        let mut session = session();
        session.open(&a).expect("open");
        let before = session.current().cloned();

        let err = session.apply_plugin("Sepia").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(session.current().cloned(), before);
    }

    #[test]
    fn test_save_as_keeps_current() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.png");
        write_png(&a, 4, 4, 100);

        let mut session = session();
        session.open(&a).expect("open");
        session.apply_plugin("Invert").expect("apply");

        let out = dir.path().join("edited.bmp");
        session.save_as(&out).expect("save");
        assert!(session.current().expect("image").is_derived());

        let reloaded = codec::load(&out).expect("reload");
        assert_eq!(reloaded.pixel(3, 3), Some(&[155u8, 155, 155][..]));
    }
}

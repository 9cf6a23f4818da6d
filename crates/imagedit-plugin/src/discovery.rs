//! Plugin discovery: scan a directory for shared libraries and register
//! every one that loads.
//!
//! Discovery never fails. Candidates that do not load are logged, recorded
//! in the [`DiscoveryReport`] and skipped; earlier registrations stay.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::loader::{DynamicLoader, PluginLoader};
use crate::registry::{PluginDescriptor, PluginRegistry};

/// Shared-library suffixes; all are checked on every platform.
pub const LIBRARY_EXTENSIONS: [&str; 3] = ["so", "dylib", "dll"];

/// A candidate that was not registered.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPlugin {
    /// Library path.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// A candidate that was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedPlugin {
    /// Display name the plugin registered under.
    pub name: String,
    /// Library path.
    pub path: PathBuf,
}

/// Outcome of scanning one directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    /// Directory that was scanned.
    pub directory: PathBuf,
    /// Group the plugins were registered under.
    pub group: String,
    /// Plugins registered, in load order.
    pub loaded: Vec<LoadedPlugin>,
    /// Candidates that failed to load.
    pub skipped: Vec<SkippedPlugin>,
}

impl DiscoveryReport {
    /// Registered display names, in load order.
    pub fn loaded_names(&self) -> Vec<&str> {
        self.loaded.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Lists the shared libraries in `directory`, sorted by file name.
pub fn candidates(directory: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| is_library(path))
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_library(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            LIBRARY_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Loads every candidate in `directory` with `loader` and registers the
/// successes under `group`.
pub fn discover_into(
    directory: &Path,
    group: &str,
    loader: &mut dyn PluginLoader,
    registry: &mut PluginRegistry,
) -> DiscoveryReport {
    let mut report = DiscoveryReport {
        directory: directory.to_path_buf(),
        group: group.to_string(),
        ..Default::default()
    };

    let files = match candidates(directory) {
        Ok(files) => files,
        Err(e) => {
            warn!(
                directory = %directory.display(),
                error = %e,
                "Plugin directory unreadable, skipping"
            );
            return report;
        }
    };

    debug!(
        directory = %directory.display(),
        candidates = files.len(),
        "Scanning plugin directory"
    );

    for path in files {
        match loader.load(&path) {
            Ok(plugin) => {
                let descriptor = PluginDescriptor::new(plugin, group, Some(path.clone()));
                report.loaded.push(LoadedPlugin {
                    name: descriptor.name.clone(),
                    path,
                });
                registry.register(descriptor);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "bad plugin");
                report.skipped.push(SkippedPlugin {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        directory = %directory.display(),
        group = %group,
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        "Plugin discovery finished"
    );

    report
}

/// Builds a registry from one directory using the dynamic loader.
///
/// The group is named after the directory.
pub fn discover(directory: &Path) -> PluginRegistry {
    let group = directory
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("default")
        .to_string();

    let mut registry = PluginRegistry::new();
    let mut loader = DynamicLoader::new();
    discover_into(directory, &group, &mut loader, &mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::buffer::{ImageMut, ImageRef};
    use crate::error::PluginError;
    use crate::traits::EditPlugin;

    #[derive(Debug)]
    struct Named(String);

    impl EditPlugin for Named {
        fn name(&self) -> &str {
            &self.0
        }

        fn edit(&self, _input: &ImageRef<'_>, _output: &mut ImageMut<'_>) -> Result<(), String> {
            Ok(())
        }
    }

    /// Treats files containing `plugin:<name>` as valid plugins.
    #[derive(Default)]
    struct ManifestLoader {
        attempts: Vec<PathBuf>,
    }

    impl PluginLoader for ManifestLoader {
        fn load(&mut self, path: &Path) -> Result<Arc<dyn EditPlugin>, PluginError> {
            self.attempts.push(path.to_path_buf());
            let contents = fs::read_to_string(path).unwrap_or_default();
            match contents.strip_prefix("plugin:") {
                Some(name) => Ok(Arc::new(Named(name.trim().to_string()))),
                None => Err(PluginError::MissingEntryPoint {
                    path: path.to_path_buf(),
                }),
            }
        }
    }

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).expect("write");
    }

    #[test]
    fn test_candidates_filter_and_sort() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "b.so", "");
        write(dir.path(), "a.DLL", "");
        write(dir.path(), "c.dylib", "");
        write(dir.path(), "notes.txt", "");
        write(dir.path(), "so", "");
        fs::create_dir(dir.path().join("d.so")).expect("mkdir");

        let names: Vec<String> = candidates(dir.path())
            .expect("list")
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.DLL", "b.so", "c.dylib"]);
    }

    #[test]
    fn test_valid_and_invalid_candidates() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "01_sepia.so", "plugin:Sepia");
        write(dir.path(), "02_broken.so", "garbage");
        write(dir.path(), "03_gray.dll", "plugin:Grayscale");
        write(dir.path(), "04_empty.dylib", "");
        write(dir.path(), "05_blur.so", "plugin:Blur");

        let mut loader = ManifestLoader::default();
        let mut registry = PluginRegistry::new();
        let report = discover_into(dir.path(), "basic", &mut loader, &mut registry);

        assert_eq!(loader.attempts.len(), 5);
        assert_eq!(registry.len(), 3);
        assert_eq!(report.loaded_names(), vec!["Sepia", "Grayscale", "Blur"]);
        assert!(report.loaded[1].path.ends_with("03_gray.dll"));
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped[0].path.ends_with("02_broken.so"));
        assert_eq!(registry.get("Blur").unwrap().group, "basic");
    }

    #[test]
    fn test_duplicate_names_keep_the_later_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "a.so", "plugin:Sepia");
        write(dir.path(), "b.so", "plugin:Sepia");

        let mut registry = PluginRegistry::new();
        discover_into(dir.path(), "basic", &mut ManifestLoader::default(), &mut registry);

        assert_eq!(registry.len(), 1);
        let origin = registry.get("Sepia").unwrap().origin.clone().unwrap();
        assert!(origin.ends_with("b.so"));
    }

    #[test]
    fn test_missing_directory_yields_empty_report() {
        let mut registry = PluginRegistry::new();
        let report = discover_into(
            Path::new("/nonexistent/imagedit/plugins"),
            "basic",
            &mut ManifestLoader::default(),
            &mut registry,
        );
        assert!(report.loaded.is_empty());
        assert!(report.skipped.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_discover_skips_non_libraries_with_dynamic_loader() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "fake.so", "not an elf");
        write(dir.path(), "fake.dll", "not a pe");

        let registry = discover(dir.path());
        assert!(registry.is_empty());
    }
}

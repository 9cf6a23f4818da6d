//! Discovery and dispatch through real plugin libraries.
//!
//! The sample plugins are built as shared libraries into a separate target
//! directory, or taken from `$IMAGEDIT_TEST_PLUGIN_LIBS` when set.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use imagedit_core::ImageSource;
use imagedit_core::config::plugin::{PluginConfig, PluginGroupConfig};
use imagedit_plugin::{PluginError, PluginManager};
use imagedit_service::codec;

use crate::helpers::{TestDir, file_name};

/// Directory holding the built `plugin-sepia` and `plugin-grayscale` libraries.
fn library_dir() -> &'static Path {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        if let Ok(dir) = std::env::var("IMAGEDIT_TEST_PLUGIN_LIBS") {
            return PathBuf::from(dir);
        }

        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let target = std::env::var_os("CARGO_TARGET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| root.join("target"))
            .join("plugin-libs");
        let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());

        let status = Command::new(cargo)
            .current_dir(root)
            .args(["build", "-p", "plugin-sepia", "-p", "plugin-grayscale", "--target-dir"])
            .arg(&target)
            .status()
            .expect("Failed to run cargo");
        assert!(status.success(), "building plugin libraries failed");

        target.join("debug")
    })
}

fn library(crate_name: &str) -> PathBuf {
    library_dir().join(format!(
        "{}{crate_name}{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    ))
}

fn install(library: &Path, directory: &Path) {
    std::fs::create_dir_all(directory).expect("Failed to create plugin dir");
    let name = library.file_name().expect("library file name");
    std::fs::copy(library, directory.join(name)).expect("Failed to copy plugin library");
}

#[test]
fn test_groups_load_real_libraries() {
    let dir = TestDir::new();
    let basic = dir.path("basic");
    let advanced = dir.path("advanced");
    install(&library("plugin_sepia"), &basic);
    install(&library("plugin_grayscale"), &advanced);
    std::fs::write(basic.join("junk.so"), b"not a shared library").expect("junk");

    let config = PluginConfig {
        groups: vec![
            PluginGroupConfig::new("basic", &basic),
            PluginGroupConfig::new("advanced", &advanced),
        ],
        auto_load: true,
    };

    let mut manager = PluginManager::new();
    let reports = manager.discover_all(&config);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].loaded_names(), vec!["Sepia"]);
    assert_eq!(reports[0].skipped.len(), 1);
    assert_eq!(file_name(&reports[0].skipped[0].path), "junk.so");
    assert_eq!(reports[1].loaded_names(), vec!["Grayscale"]);
    assert!(reports[1].skipped.is_empty());

    let registry = manager.registry();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names_in_group("basic"), vec!["Sepia"]);
    assert_eq!(registry.names_in_group("advanced"), vec!["Grayscale"]);

    let image = codec::load(&dir.rgb("photo.png", 800, 600, [100, 50, 20])).expect("load");
    let dispatcher = manager.dispatcher();

    let toned = dispatcher.apply("Sepia", Some(&image)).expect("sepia");
    assert_eq!((toned.width(), toned.height(), toned.channels()), (800, 600, 3));
    assert_eq!(toned.source(), &ImageSource::Derived);
    assert_eq!(toned.pixel(799, 599), Some(&[82u8, 73, 57][..]));

    let gray = dispatcher.apply("Grayscale", Some(&toned)).expect("grayscale");
    assert_eq!((gray.width(), gray.height(), gray.channels()), (800, 600, 1));
    assert_eq!(gray.stride(), 800);

    let err = dispatcher.apply("Sepia", Some(&gray)).unwrap_err();
    assert!(matches!(
        err,
        PluginError::Fault { ref reason, .. } if reason == "sepia needs 3-channel input, got 1"
    ));
}

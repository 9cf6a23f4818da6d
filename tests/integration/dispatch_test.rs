//! Integration tests for plugin dispatch over decoded images.

use imagedit_core::ImageSource;
use imagedit_plugin::{PluginDispatcher, PluginError};
use imagedit_service::codec;

use crate::helpers::{self, TestDir};

fn dispatcher() -> PluginDispatcher {
    PluginDispatcher::new(helpers::registry())
}

#[test]
fn test_sepia_on_800x600() {
    let dir = TestDir::new();
    let path = dir.rgb("photo.png", 800, 600, [100, 50, 20]);
    let image = codec::load(&path).expect("load");

    let edited = dispatcher().apply("Sepia", Some(&image)).expect("sepia");

    assert_eq!((edited.width(), edited.height()), (800, 600));
    assert_eq!(edited.channels(), 3);
    assert_eq!(edited.source(), &ImageSource::Derived);
    assert_eq!(edited.pixel(799, 599), Some(&[82u8, 73, 57][..]));
    assert_eq!(image.pixel(0, 0), Some(&[100u8, 50, 20][..]));
}

#[test]
fn test_identity_round_trip_rgb_and_greyscale() {
    let dir = TestDir::new();
    let rgb = codec::load(&dir.rgb("rgb.png", 13, 7, [10, 20, 30])).expect("load rgb");
    let gray = codec::load(&dir.gray("gray.png", 13, 7)).expect("load gray");
    assert_eq!(gray.channels(), 1);

    for image in [rgb, gray] {
        let edited = dispatcher().apply("Identity", Some(&image)).expect("identity");
        assert_eq!(edited.pixels(), image.pixels());
        assert_eq!(edited.stride(), image.stride());
        assert_eq!(edited.channels(), image.channels());
    }
}

#[test]
fn test_reshaping_plugin_returns_single_channel() {
    let dir = TestDir::new();
    let image = codec::load(&dir.rgb("photo.png", 5, 4, [200, 1, 2])).expect("load");

    let edited = dispatcher().apply("First Channel", Some(&image)).expect("reshape");
    assert_eq!(edited.channels(), 1);
    assert_eq!((edited.width(), edited.height()), (5, 4));
    assert!(edited.pixels().iter().all(|&b| b == 200));

    let out = dir.path("first.png");
    codec::save(&edited, &out).expect("save");
    assert_eq!(codec::load(&out).expect("reload").channels(), 1);
}

#[test]
fn test_failures_leave_image_untouched() {
    let dir = TestDir::new();
    let image = codec::load(&dir.rgb("photo.png", 3, 3, [5, 6, 7])).expect("load");
    let before = image.clone();

    let err = dispatcher().apply("Missing", Some(&image)).unwrap_err();
    assert!(matches!(err, PluginError::PluginNotFound { .. }));

    let err = dispatcher().apply("Broken", Some(&image)).unwrap_err();
    assert!(matches!(err, PluginError::Fault { .. }));

    let err = dispatcher().apply("Sepia", None).unwrap_err();
    assert!(matches!(err, PluginError::NoImageLoaded));

    assert_eq!(image, before);
}

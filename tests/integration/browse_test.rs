//! Integration tests for directory browsing.

use imagedit_core::config::viewer::default_extensions;
use imagedit_service::{NavigationState, listing, navigation_state, neighbor};

use crate::helpers::{self, TestDir};

#[test]
fn test_three_image_directory() {
    let dir = TestDir::new();
    dir.rgb("a.png", 2, 2, [1, 2, 3]);
    dir.rgb("b.jpg", 2, 2, [1, 2, 3]);
    dir.rgb("c.bmp", 2, 2, [1, 2, 3]);
    let ext = default_extensions();

    let next = neighbor(&dir.path("b.jpg"), 1, &ext).expect("next of b");
    assert_eq!(helpers::file_name(&next), "c.bmp");

    let prev = neighbor(&dir.path("b.jpg"), -1, &ext).expect("previous of b");
    assert_eq!(helpers::file_name(&prev), "a.png");

    assert_eq!(neighbor(&dir.path("c.bmp"), 1, &ext), None);
    assert_eq!(neighbor(&dir.path("a.png"), -1, &ext), None);
}

#[test]
fn test_listing_ignores_other_files() {
    let dir = TestDir::new();
    dir.rgb("photo.png", 1, 1, [0, 0, 0]);
    dir.junk("notes.txt");
    dir.junk("plugin.so");
    dir.rgb("scan.tif", 1, 1, [0, 0, 0]);

    let names: Vec<String> = listing(dir.dir.path(), &default_extensions())
        .iter()
        .map(|p| helpers::file_name(p))
        .collect();
    assert_eq!(names, vec!["photo.png", "scan.tif"]);
}

#[test]
fn test_single_image_has_no_neighbours() {
    let dir = TestDir::new();
    let only = dir.rgb("only.png", 1, 1, [9, 9, 9]);
    let ext = default_extensions();

    assert_eq!(neighbor(&only, 1, &ext), None);
    assert_eq!(neighbor(&only, -1, &ext), None);
    assert_eq!(navigation_state(&only, &ext), NavigationState::default());
}

#[test]
fn test_custom_allow_list() {
    let dir = TestDir::new();
    dir.rgb("a.png", 1, 1, [0, 0, 0]);
    dir.rgb("b.bmp", 1, 1, [0, 0, 0]);
    dir.rgb("c.png", 1, 1, [0, 0, 0]);
    let png_only = vec!["png".to_string()];

    let next = neighbor(&dir.path("a.png"), 1, &png_only).expect("next png");
    assert_eq!(helpers::file_name(&next), "c.png");
}

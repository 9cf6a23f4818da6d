//! Integration tests for editor sessions.

use imagedit_core::error::ErrorKind;
use imagedit_service::ViewTransform;

use crate::helpers::{self, TestDir};

#[test]
fn test_browse_edit_save_cycle() {
    let dir = TestDir::new();
    let a = dir.rgb("a.png", 8, 8, [100, 50, 20]);
    dir.rgb("b.jpg", 6, 4, [0, 0, 0]);
    dir.rgb("c.bmp", 4, 2, [255, 255, 255]);

    let mut session = helpers::session();
    session.open(&a).expect("open a");
    assert!(!session.navigation().has_previous);
    assert!(!session.previous().expect("previous"));

    assert!(session.next().expect("to b"));
    assert_eq!(session.current().map(|i| i.width()), Some(6));
    assert!(session.next().expect("to c"));
    assert!(!session.next().expect("past c"));
    assert_eq!(helpers::file_name(session.path().expect("path")), "c.bmp");

    session.apply_plugin("Sepia").expect("sepia");
    assert_eq!(session.status_line(), "(edited image), 4x2");

    let saved = dir.path("c_sepia.png");
    session.save_as(&saved).expect("save");
    let reloaded = imagedit_service::codec::load(&saved).expect("reload");
    assert_eq!(reloaded.pixel(0, 0), Some(&[255u8, 255, 239][..]));
}

#[test]
fn test_view_resets_on_navigation_only() {
    let dir = TestDir::new();
    let a = dir.rgb("a.png", 4, 4, [1, 1, 1]);
    dir.rgb("b.png", 4, 4, [1, 1, 1]);

    let mut session = helpers::session();
    session.open(&a).expect("open");
    session.zoom_in();
    session.rotate_left();

    session.apply_plugin("Identity").expect("identity");
    assert_eq!(session.view().rotation, 270);

    session.next().expect("next");
    assert_eq!(session.view(), ViewTransform::default());
}

#[test]
fn test_error_paths() {
    let dir = TestDir::new();
    let junk = dir.junk("broken.png");
    let good = dir.rgb("good.png", 2, 2, [3, 3, 3]);

    let mut session = helpers::session();
    let err = session.open(&junk).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Codec);
    assert!(session.current().is_none());

    session.open(&good).expect("open");
    let err = session.apply_plugin("Nope").unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = session.apply_plugin("Broken").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Plugin);
    assert!(!session.current().expect("image").is_derived());

    let err = session.save_as(&dir.path("out.unknown")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

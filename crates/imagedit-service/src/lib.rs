//! # imagedit-service
//!
//! Editor services for imagedit. Each service is a small synchronous unit;
//! [`EditorSession`] ties them together around the current image.
//!
//! The session is constructed with everything it needs (shared plugin
//! registry, viewer settings) and owns the current image outright.

pub mod browser;
pub mod codec;
pub mod session;
pub mod view;

pub use browser::{NavigationState, listing, navigation_state, neighbor};
pub use session::EditorSession;
pub use view::ViewTransform;

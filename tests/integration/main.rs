//! Workspace integration tests: directory browsing, plugin dispatch
//! through the real codec, real plugin libraries, and full editor
//! sessions.

mod helpers;

mod browse_test;
mod dispatch_test;
mod library_test;
mod session_test;

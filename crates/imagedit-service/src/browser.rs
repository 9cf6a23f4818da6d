//! Directory browsing: sibling images of the current file.
//!
//! Listings are recomputed from disk on every request and never cached.
//! Every failure (no parent, unreadable directory, file not listed) reads
//! as "no neighbour"; browsing never reports errors.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

/// Whether previous/next navigation is possible from the current file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// A file sorts before the current one.
    pub has_previous: bool,
    /// A file sorts after the current one.
    pub has_next: bool,
}

/// Checks a path's extension against the allow-list, ignoring case.
pub fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

/// Lists the allow-listed regular files in `directory`, sorted by file name.
///
/// Sorting compares raw names, so it is case-sensitive.
pub fn listing(directory: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(directory = %directory.display(), error = %e, "Directory unreadable");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| has_allowed_extension(path, extensions))
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

/// Position of `current` in its directory listing, with the listing.
fn locate(current: &Path, extensions: &[String]) -> Option<(Vec<PathBuf>, usize)> {
    let directory = current.parent()?;
    let name = current.file_name()?;
    let files = listing(directory, extensions);
    let index = files.iter().position(|f| f.file_name() == Some(name))?;
    Some((files, index))
}

/// Returns the file `delta` places away from `current` in its directory.
///
/// No wraparound: stepping past either end yields `None`.
pub fn neighbor(current: &Path, delta: isize, extensions: &[String]) -> Option<PathBuf> {
    let Some((files, index)) = locate(current, extensions) else {
        debug!(path = %current.display(), "Current file not found in directory listing");
        return None;
    };

    let target = index.checked_add_signed(delta)?;
    files.into_iter().nth(target)
}

/// Previous/next availability for `current`.
pub fn navigation_state(current: &Path, extensions: &[String]) -> NavigationState {
    match locate(current, extensions) {
        Some((files, index)) => NavigationState {
            has_previous: index > 0,
            has_next: index + 1 < files.len(),
        },
        None => NavigationState::default(),
    }
}

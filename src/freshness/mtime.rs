//! Mtime-based staleness check for cached artifacts.
//!
//! Decided from filesystem metadata alone; the artifact is never decoded.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check whether the artifact at `dest` must be (re)built from `source`.
///
/// Stale when `dest` is missing, when either mtime is unreadable, or when
/// `dest` is not strictly newer than `source`. Equal timestamps count as
/// stale: coarse filesystem resolution can make a just-edited source and an
/// old artifact compare equal.
pub fn needs_rebuild(source: &Path, dest: &Path) -> bool {
    let Some(dest_time) = get_mtime(dest) else {
        return true;
    };
    let Some(source_time) = get_mtime(source) else {
        return true;
    };
    dest_time <= source_time
}

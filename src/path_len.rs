//! Path length measurement.
//!
//! Lengths are counted in characters of the forward-slash rendering of the
//! canonical path. A path that cannot be resolved (typically because it does not
//! exist yet) is measured in the literal form it was given in.

use std::path::{Path, PathBuf};

/// Canonical form of `path`, or the literal path when resolution fails.
pub fn resolve_or_literal(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Forward-slash string rendering used for every length measurement.
pub fn posix_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Length of `path` after resolution. Never fails; a missing path is measured literally.
pub fn path_len(path: &Path) -> usize {
    posix_string(&resolve_or_literal(path)).chars().count()
}

/// Length of `path` exactly as given, without touching the filesystem.
pub fn literal_len(path: &Path) -> usize {
    posix_string(path).chars().count()
}

/// `path_len(path) < budget`.
#[inline]
pub fn fits_budget(path: &Path, budget: usize) -> bool {
    path_len(path) < budget
}

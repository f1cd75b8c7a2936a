//! Non-Unix implementations of platform helpers (best-effort).
//!
//! Notes:
//! - There is no portable device id via std, so every pair of paths is treated
//!   as cross-device and trees are copied rather than hardlinked.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Open log file for appending (no symlink defense available via std here).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Existing directory without the readonly attribute.
pub fn is_writable_dir(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(m) => m.is_dir() && !m.permissions().readonly(),
        Err(_) => false,
    }
}

pub fn device_id(_path: &Path) -> Option<u64> {
    None
}

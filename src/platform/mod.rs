//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{device_id, is_writable_dir, open_log_file_secure_append};

#[cfg(not(unix))]
pub use windows::{device_id, is_writable_dir, open_log_file_secure_append};

use std::path::Path;

/// True when both paths are known to live on the same device.
/// Unknown (either stat fails or the platform has no device ids) counts as different.
pub fn same_device(a: &Path, b: &Path) -> bool {
    match (device_id(a), device_id(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

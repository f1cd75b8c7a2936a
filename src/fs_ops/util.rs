//! Classification of hardlink failures.

use std::io;

/// EXDEV / ERROR_NOT_SAME_DEVICE. std has no stable ErrorKind for it.
pub(super) fn is_cross_device(e: &io::Error) -> bool {
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}

/// Failures where copying the file instead is a sound substitute for linking it:
/// crossing devices, lacking permission to link (e.g. protected_hardlinks),
/// the link count limit, or a filesystem without hardlink support.
pub(super) fn link_failure_allows_copy(e: &io::Error) -> bool {
    if is_cross_device(e) || e.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        return matches!(
            code,
            libc::EPERM | libc::EACCES | libc::EMLINK | libc::ENOTSUP | libc::ENOSYS
        );
    }
    e.kind() == io::ErrorKind::Unsupported
}

//! Symlink remapping.
//!
//! A link whose target lies inside the source tree is re-pointed at the mirrored
//! location inside the destination tree, written relative to the new link's parent
//! so the destination tree stays valid if it is moved as a whole. Any other link
//! keeps its literal target text.

use anyhow::Result;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

use crate::errors::ShortLinkError;

use super::helpers::{io_error_with_help, io_error_with_help_io};

/// Lexically resolve `.` and `..` without touching the filesystem.
/// `..` at the root stays at the root.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.is_absolute() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `path` the way the kernel would, following every symlink along it,
/// but without requiring the final components to exist. Once a component is
/// missing the rest is applied lexically.
pub fn resolve_loose(path: &Path) -> PathBuf {
    let mut cur = PathBuf::new();
    let mut missing = false;
    for comp in path.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => cur.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir if missing => cur.push(".."),
            Component::ParentDir => {
                cur.pop();
            }
            Component::Normal(name) => {
                let next = cur.join(name);
                if missing {
                    cur = next;
                    continue;
                }
                match dunce::canonicalize(&next) {
                    Ok(real) => cur = real,
                    Err(_) => {
                        missing = true;
                        cur = next;
                    }
                }
            }
        }
    }
    normalize_lexical(&cur)
}

/// Path from directory `base` to `target`; both absolute and normalized.
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let t: Vec<Component<'_>> = target.components().collect();
    let b: Vec<Component<'_>> = base.components().collect();
    let common = t.iter().zip(&b).take_while(|(x, y)| x == y).count();

    let mut rel = PathBuf::new();
    for _ in common..b.len() {
        rel.push("..");
    }
    for c in &t[common..] {
        rel.push(c.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

/// Target text for the mirror of `src_link` placed at `dst_link`.
///
/// `src_root` and `dst_root` must be absolute and canonical.
pub fn mapped_symlink_target(
    src_link: &Path,
    src_root: &Path,
    dst_root: &Path,
    dst_link: &Path,
) -> io::Result<OsString> {
    let raw = fs::read_link(src_link).map_err(io_error_with_help_io("read symlink", src_link))?;
    let absolute = if raw.is_absolute() {
        resolve_loose(&raw)
    } else {
        let parent = src_link.parent().unwrap_or(src_root);
        let parent = dunce::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
        resolve_loose(&parent.join(&raw))
    };

    match (absolute.strip_prefix(src_root), dst_link.parent()) {
        (Ok(inside), Some(link_parent)) => {
            let mapped = dst_root.join(inside);
            let rel = relative_path(&mapped, link_parent);
            trace!(link = %src_link.display(), raw = %raw.display(), mapped = %rel.display(), "remapped symlink");
            Ok(rel.into_os_string())
        }
        _ => Ok(raw.into_os_string()),
    }
}

/// Clear a file, symlink or empty directory occupying `slot`. A non-empty
/// directory there is a corruption signal and is never removed.
pub(super) fn clear_slot(slot: &Path) -> Result<()> {
    match fs::symlink_metadata(slot) {
        Ok(meta) if meta.file_type().is_dir() => {
            if let Err(e) = fs::remove_dir(slot) {
                if e.kind() == io::ErrorKind::DirectoryNotEmpty {
                    return Err(ShortLinkError::CorruptDestination(slot.to_path_buf()).into());
                }
                return Err(io_error_with_help("remove empty directory", slot)(e));
            }
            Ok(())
        }
        Ok(_) => fs::remove_file(slot).map_err(io_error_with_help("remove stale entry", slot)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error_with_help("stat", slot)(e)),
    }
}

/// Create `link_path -> target`, replacing whatever [`clear_slot`] may remove.
pub fn replace_with_symlink(target: &OsString, link_path: &Path, target_is_dir: bool) -> Result<()> {
    clear_slot(link_path)?;
    create_symlink(Path::new(target), link_path, target_is_dir)
        .map_err(io_error_with_help("create symlink", link_path))
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path, _target_is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path, target_is_dir: bool) -> io::Result<()> {
    if target_is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

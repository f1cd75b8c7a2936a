//! Tree materialization.
//!
//! Mirrors a source directory into a destination directory:
//! - directories are recreated,
//! - regular files are hardlinked, or copied when linking fails for a
//!   recoverable reason and copy fallback is enabled,
//! - symlinks are recreated with targets remapped into the destination tree.
//!
//! The walk never follows symlinks, so a symlinked directory is mirrored as a link.
//! When source and destination sit on different devices no link is attempted at all.
//! Nothing is rolled back on failure; a partial destination is left for inspection.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::errors::ShortLinkError;
use crate::platform;
use crate::policy::Mode;

use super::helpers::io_error_with_help;
use super::io_copy::copy_streaming;
use super::metadata::{preserve_metadata, preserve_xattrs};
use super::symlink::{clear_slot, mapped_symlink_target, replace_with_symlink};
use super::util::{is_cross_device, link_failure_allows_copy};

/// Hardlink primitive: `(existing, new_link)`.
pub type LinkFn = fn(&Path, &Path) -> io::Result<()>;

/// Device comparison: `(source_root, destination_root)`.
pub type SameDeviceFn = fn(&Path, &Path) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Hardlink each file, copying individual files on recoverable failures.
    Link,
    /// Destination is on another device: copy every file.
    CopyAll,
}

/// Counters reported once the walk finishes.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    dirs: u64,
    linked: u64,
    copied: u64,
    symlinks: u64,
    skipped: u64,
}

/// Replicates a directory tree; see the module docs.
#[derive(Clone)]
pub struct TreeMaterializer {
    allow_copy_fallback: bool,
    preserve_metadata: bool,
    hard_link: LinkFn,
    same_device: SameDeviceFn,
}

impl std::fmt::Debug for TreeMaterializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeMaterializer")
            .field("allow_copy_fallback", &self.allow_copy_fallback)
            .field("preserve_metadata", &self.preserve_metadata)
            .finish_non_exhaustive()
    }
}

impl Default for TreeMaterializer {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl TreeMaterializer {
    pub fn new(allow_copy_fallback: bool, preserve_metadata: bool) -> Self {
        Self {
            allow_copy_fallback,
            preserve_metadata,
            hard_link: std_hard_link,
            same_device: platform::same_device,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.allow_copy_fallback, cfg.preserve_metadata)
    }

    /// Replace the hardlink primitive (used to simulate link failures).
    pub fn with_link_fn(mut self, f: LinkFn) -> Self {
        self.hard_link = f;
        self
    }

    /// Replace the device comparison (used to simulate a cross-device destination).
    pub fn with_same_device_fn(mut self, f: SameDeviceFn) -> Self {
        self.same_device = f;
        self
    }

    /// Mirror `src` into `dst` and report whether every file ended up hardlinked.
    ///
    /// `dst` is created if missing and must otherwise be empty.
    pub fn materialize(&self, src: &Path, dst: &Path) -> Result<Mode> {
        let src = match dunce::canonicalize(src) {
            Ok(p) if p.is_dir() => p,
            _ => return Err(ShortLinkError::NotADirectory(src.to_path_buf()).into()),
        };

        prepare_destination(dst)?;
        let dst = dunce::canonicalize(dst)
            .with_context(|| format!("resolve destination '{}'", dst.display()))?;

        let strategy = if (self.same_device)(&src, &dst) {
            Strategy::Link
        } else if self.allow_copy_fallback {
            info!(src = %src.display(), dest = %dst.display(), "destination on another filesystem; copying whole tree");
            Strategy::CopyAll
        } else {
            return Err(ShortLinkError::CrossFilesystemHardlinkRefused { src, dest: dst }.into());
        };

        let mut all_linked = strategy == Strategy::Link;
        let mut tally = Tally::default();

        // A destination nested inside the source must not be walked into.
        let walker = WalkDir::new(&src)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() != dst.as_path());

        for entry in walker {
            let entry = entry.map_err(|e| {
                let at = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                anyhow!("walk source tree at '{}': {}", at, e)
            })?;
            let rel = entry.path().strip_prefix(&src)?;
            let out = dst.join(rel);
            let ft = entry.file_type();

            if ft.is_symlink() {
                let target = mapped_symlink_target(entry.path(), &src, &dst, &out)?;
                let target_is_dir = fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false);
                replace_with_symlink(&target, &out, target_is_dir)?;
                tally.symlinks += 1;
            } else if ft.is_dir() {
                ensure_dir(&out)?;
                tally.dirs += 1;
            } else if ft.is_file() {
                let linked = self.place_file(entry.path(), &out, strategy, all_linked)?;
                if linked {
                    tally.linked += 1;
                } else {
                    all_linked = false;
                    tally.copied += 1;
                }
            } else {
                warn!(path = %entry.path().display(), "skipping special file");
                tally.skipped += 1;
            }
        }

        let mode = if all_linked { Mode::Hardlink } else { Mode::Copy };
        info!(
            src = %src.display(),
            dest = %dst.display(),
            mode = %mode,
            dirs = tally.dirs,
            linked = tally.linked,
            copied = tally.copied,
            symlinks = tally.symlinks,
            skipped = tally.skipped,
            "materialized tree"
        );
        Ok(mode)
    }

    /// Put one regular file at `out`. Returns true if it was hardlinked.
    fn place_file(&self, src: &Path, out: &Path, strategy: Strategy, still_linked: bool) -> Result<bool> {
        clear_slot(out)?;

        if strategy == Strategy::CopyAll {
            self.copy_file(src, out)?;
            return Ok(false);
        }

        match (self.hard_link)(src, out) {
            Ok(()) => {
                debug!(path = %out.display(), "hardlinked");
                Ok(true)
            }
            Err(e) if link_failure_allows_copy(&e) => {
                if !self.allow_copy_fallback {
                    if is_cross_device(&e) {
                        return Err(ShortLinkError::CrossFilesystemHardlinkRefused {
                            src: src.to_path_buf(),
                            dest: out.to_path_buf(),
                        }
                        .into());
                    }
                    return Err(io_error_with_help("hardlink", out)(e));
                }
                if still_linked {
                    warn!(path = %src.display(), error = %e, "hardlink failed; copying instead (result is now a copy)");
                } else {
                    debug!(path = %src.display(), error = %e, "hardlink failed; copying");
                }
                self.copy_file(src, out)?;
                Ok(false)
            }
            Err(e) => Err(io_error_with_help("hardlink", out)(e)),
        }
    }

    fn copy_file(&self, src: &Path, out: &Path) -> Result<()> {
        let bytes = copy_streaming(src, out).map_err(io_error_with_help("copy file", out))?;
        if self.preserve_metadata {
            let meta = fs::metadata(src).map_err(io_error_with_help("stat", src))?;
            preserve_metadata(out, &meta);
            preserve_xattrs(src, out);
        }
        debug!(path = %out.display(), bytes, "copied");
        Ok(())
    }
}

fn std_hard_link(src: &Path, dst: &Path) -> io::Result<()> {
    fs::hard_link(src, dst)
}

/// Create `dst` if needed; refuse one that already has content.
fn prepare_destination(dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(io_error_with_help("create destination", dst))?;
    let mut entries = fs::read_dir(dst).map_err(io_error_with_help("read destination", dst))?;
    if entries.next().is_some() {
        return Err(ShortLinkError::DestinationNotEmpty(dst.to_path_buf()).into());
    }
    Ok(())
}

/// Create a mirrored directory, tolerating one that is already there.
fn ensure_dir(out: &Path) -> Result<()> {
    match fs::create_dir(out) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && out.is_dir() => Ok(()),
        Err(e) => Err(io_error_with_help("create directory", out)(e)),
    }
}

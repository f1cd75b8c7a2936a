//! Filesystem operations for mirroring a tree under a new root.

mod helpers;
mod io_copy;
mod materialize;
mod metadata;
mod symlink;
mod util;

pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use materialize::{LinkFn, SameDeviceFn, TreeMaterializer};
pub use symlink::{mapped_symlink_target, normalize_lexical, relative_path, replace_with_symlink, resolve_loose};

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::policy::Mode;

/// Mirror `src` into `dst` with the settings from `cfg`.
pub fn materialize(cfg: &Config, src: &Path, dst: &Path) -> Result<Mode> {
    TreeMaterializer::from_config(cfg).materialize(src, dst)
}

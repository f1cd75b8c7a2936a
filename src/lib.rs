//! Core library for `short_link`.
//!
//! Makes a deep directory tree reachable under a path shorter than a fixed budget.
//! A source that already fits is returned as is; otherwise a short writable
//! directory is claimed and the tree is mirrored into it (hardlinks where possible,
//! copies otherwise, symlinks remapped).

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod path_len;
pub mod platform;
pub mod policy;
pub mod roots;
pub mod short_name;

pub use config::{
    default_config_path, default_log_path, load_config_from_xml, path_has_symlink_ancestor,
    Config, LogLevel,
};
pub use errors::ShortLinkError;
pub use fs_ops::{materialize, TreeMaterializer};
pub use path_len::{fits_budget, path_len};
pub use policy::{ensure_short_path, ensure_short_path_with, Mode, TargetSpec, REMEDIATION_HINT};
pub use roots::candidate_roots;
pub use short_name::ShortNameGenerator;

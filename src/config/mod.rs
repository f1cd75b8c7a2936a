//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config_from_xml, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SHORT_LINK_CONFIG";

/// Exclusive maximum length of accepted or generated paths.
pub const DEFAULT_BUDGET: usize = 51;

/// Upper bound on the random part of a generated name.
pub const DEFAULT_MAX_SUFFIX_LEN: usize = 5;

/// Name prefixes, tried in order.
pub const DEFAULT_PREFIXES: &[&str] = &["i.", "x.", ".i.", ".x."];

/// Well-known scratch roots tried after the source's ancestors.
pub const DEFAULT_FALLBACK_ROOTS: &[&str] = &["/tmp", "/var/tmp", "/dev/shm"];

/// Environment variables that may name additional scratch roots.
pub const DEFAULT_ENV_VARS: &[&str] = &["TMPDIR", "TMP", "TEMP"];

//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{
    DEFAULT_BUDGET, DEFAULT_ENV_VARS, DEFAULT_FALLBACK_ROOTS, DEFAULT_MAX_SUFFIX_LEN,
    DEFAULT_PREFIXES,
};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default; stdout stays machine-readable)
    #[default]
    Normal,
    /// Target selection and final mode
    Info,
    /// Per-entry decisions
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Settings injected into the shortening engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Exclusive maximum length for accepted and generated paths
    pub budget: usize,
    /// Short literal name prefixes, tried in order
    pub prefixes: Vec<String>,
    /// Upper bound on the random suffix length
    pub max_suffix_len: usize,
    /// Scratch roots tried after the source's ancestors
    pub fallback_roots: Vec<PathBuf>,
    /// Environment variables that may name additional roots
    pub env_vars: Vec<String>,
    /// Whether the current working directory is a last-resort root
    pub include_cwd: bool,
    /// Copy a file when hardlinking it fails (otherwise the failure is fatal)
    pub allow_copy_fallback: bool,
    /// Keep permissions and timestamps on copied files
    pub preserve_metadata: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            prefixes: DEFAULT_PREFIXES.iter().map(|s| s.to_string()).collect(),
            max_suffix_len: DEFAULT_MAX_SUFFIX_LEN,
            fallback_roots: DEFAULT_FALLBACK_ROOTS.iter().map(PathBuf::from).collect(),
            env_vars: DEFAULT_ENV_VARS.iter().map(|s| s.to_string()).collect(),
            include_cwd: true,
            allow_copy_fallback: true,
            preserve_metadata: true,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Construct a Config with an explicit budget; other fields use defaults.
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget,
            ..Default::default()
        }
    }

    /// A config that only considers the given roots (no env lookups, no cwd).
    /// Ancestors of the source are still tried first.
    pub fn isolated(budget: usize, fallback_roots: Vec<PathBuf>) -> Self {
        Self {
            budget,
            fallback_roots,
            env_vars: Vec::new(),
            include_cwd: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parse_aliases() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Normal));
        assert_eq!(LogLevel::parse("none"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn defaults_are_usable() {
        let cfg = Config::default();
        assert_eq!(cfg.budget, 51);
        assert_eq!(cfg.prefixes.first().map(String::as_str), Some("i."));
        assert!(cfg.allow_copy_fallback);
        assert!(cfg.validate().is_ok());
    }
}

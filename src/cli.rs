//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --src takes precedence over the positional SOURCE.
//! - --debug is a shorthand for --log-level debug.
//! - Repeated --fallback-root / --env-var / --prefix replace the configured lists.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// CLI wrapper for the short_link library.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Make a directory tree reachable under a short path (hardlink, else copy)"
)]
pub struct Args {
    /// Source directory (positional form).
    #[arg(value_name = "SOURCE", value_hint = ValueHint::DirPath)]
    pub source_pos: Option<PathBuf>,

    /// Source directory; overrides the positional form.
    #[arg(long = "src", short = 's', value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub src: Option<PathBuf>,

    /// Exclusive maximum path length.
    #[arg(long, value_name = "N", help = "Exclusive maximum length of the reported path")]
    pub budget: Option<usize>,

    /// Fail instead of copying when a hardlink cannot be made.
    #[arg(long, help = "Fail instead of copying files that cannot be hardlinked")]
    pub no_copy_fallback: bool,

    /// Do not carry permissions and timestamps onto copied files.
    #[arg(long, help = "Do not preserve permissions/timestamps on copied files")]
    pub no_preserve_metadata: bool,

    /// Scratch root to try after the source's ancestors (repeatable).
    #[arg(long = "fallback-root", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub fallback_roots: Vec<PathBuf>,

    /// Environment variable naming an extra root (repeatable).
    #[arg(long = "env-var", value_name = "NAME")]
    pub env_vars: Vec<String>,

    /// Short name prefix (repeatable, tried in order).
    #[arg(long = "prefix", value_name = "PREFIX")]
    pub prefixes: Vec<String>,

    /// Do not consider the current working directory.
    #[arg(long, help = "Do not use the current directory as a last-resort root")]
    pub no_cwd: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where short_link looks for its config file, then exit.
    #[arg(
        long,
        help = "Print the config file location used by short_link and exit"
    )]
    pub print_config: bool,
}

impl Args {
    /// Effective source: `--src` if provided, else the positional SOURCE.
    pub fn resolved_source(&self) -> Option<PathBuf> {
        self.src.clone().or_else(|| self.source_pos.clone())
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(b) = self.budget {
            cfg.budget = b;
        }
        if self.no_copy_fallback {
            cfg.allow_copy_fallback = false;
        }
        if self.no_preserve_metadata {
            cfg.preserve_metadata = false;
        }
        if !self.fallback_roots.is_empty() {
            cfg.fallback_roots = self.fallback_roots.clone();
        }
        if !self.env_vars.is_empty() {
            cfg.env_vars = self.env_vars.clone();
        }
        if !self.prefixes.is_empty() {
            cfg.prefixes = self.prefixes.clone();
        }
        if self.no_cwd {
            cfg.include_cwd = false;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

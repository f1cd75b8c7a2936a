//! Decide whether a source tree needs a short alias, pick one, and build it.
//!
//! Flow: evaluate the source length; if it already fits the budget the source is
//! returned unchanged. Otherwise walk the candidate roots in priority order, mint a
//! name under each and claim it with a single `create_dir`; the first claimed
//! directory receives the mirrored tree.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::ShortLinkError;
use crate::fs_ops::TreeMaterializer;
use crate::path_len::{fits_budget, path_len, posix_string};
use crate::roots::candidate_roots;
use crate::short_name::ShortNameGenerator;

/// Appended to materialization failures shown to operators.
pub const REMEDIATION_HINT: &str = "Provide a writable short path or bind-mount a short path.";

/// Claim attempts per root before moving to the next one.
const CLAIMS_PER_ROOT: usize = 3;

/// How the reported target relates to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The source itself; nothing was created.
    Original,
    /// New tree whose regular files all share inodes with the source.
    Hardlink,
    /// New tree where at least one regular file is a copy.
    Copy,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Original => "original",
            Mode::Hardlink => "hardlink",
            Mode::Copy => "copy",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final answer handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub target: PathBuf,
    pub mode: Mode,
}

impl TargetSpec {
    /// Target rendered the way it is measured and printed.
    pub fn target_string(&self) -> String {
        posix_string(&self.target)
    }
}

/// Canonical source directory, or NotADirectory.
pub fn canonical_source(src: &Path) -> Result<PathBuf> {
    match dunce::canonicalize(src) {
        Ok(p) if p.is_dir() => Ok(p),
        _ => Err(ShortLinkError::NotADirectory(src.to_path_buf()).into()),
    }
}

/// Make `src` reachable under a path shorter than `cfg.budget`.
pub fn ensure_short_path(cfg: &Config, src: &Path) -> Result<TargetSpec> {
    cfg.validate()?;
    let src = canonical_source(src)?;
    if let Some(spec) = evaluate(cfg, &src) {
        return Ok(spec);
    }
    let roots = candidate_roots(&src, cfg);
    materialize_into_first_fit(cfg, &src, &roots, &TreeMaterializer::from_config(cfg))
}

/// Like [`ensure_short_path`] with explicit roots and materializer.
pub fn ensure_short_path_with(
    cfg: &Config,
    src: &Path,
    roots: &[PathBuf],
    materializer: &TreeMaterializer,
) -> Result<TargetSpec> {
    cfg.validate()?;
    let src = canonical_source(src)?;
    if let Some(spec) = evaluate(cfg, &src) {
        return Ok(spec);
    }
    materialize_into_first_fit(cfg, &src, roots, materializer)
}

/// Some((src, Original)) when the canonical source already fits.
fn evaluate(cfg: &Config, src: &Path) -> Option<TargetSpec> {
    let len = path_len(src);
    if fits_budget(src, cfg.budget) {
        debug!(src = %src.display(), len, budget = cfg.budget, "source already short enough");
        return Some(TargetSpec {
            target: src.to_path_buf(),
            mode: Mode::Original,
        });
    }
    info!(src = %src.display(), len, budget = cfg.budget, "source path too long; materializing");
    None
}

fn materialize_into_first_fit(
    cfg: &Config,
    src: &Path,
    roots: &[PathBuf],
    materializer: &TreeMaterializer,
) -> Result<TargetSpec> {
    let dst = select_destination(cfg, roots)?;
    info!(src = %src.display(), dest = %dst.display(), "selected short destination");

    let mode = materializer.materialize(src, &dst).with_context(|| {
        format!(
            "materialization of '{}' into '{}' failed. {}",
            src.display(),
            dst.display(),
            REMEDIATION_HINT
        )
    })?;
    Ok(TargetSpec { target: dst, mode })
}

/// First root yielding a minted name that can actually be created.
pub fn select_destination(cfg: &Config, roots: &[PathBuf]) -> Result<PathBuf> {
    let mut names = ShortNameGenerator::new(cfg.budget, cfg.prefixes.clone());

    for root in roots {
        for _ in 0..CLAIMS_PER_ROOT {
            let Some(cand) = names.mint(root, cfg.max_suffix_len) else {
                debug!(root = %root.display(), "no short name fits under this root");
                break;
            };
            match fs::create_dir(&cand) {
                Ok(()) => return Ok(cand),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(candidate = %cand.display(), "lost creation race; minting again");
                }
                Err(e) => {
                    warn!(candidate = %cand.display(), error = %e, "cannot create under root; trying next");
                    break;
                }
            }
        }
    }

    Err(ShortLinkError::NoCandidateFits { budget: cfg.budget }.into())
}

//! Candidate roots for a new short directory.
//!
//! Order: ancestors of the source (closest first), then the configured scratch
//! roots, then directories named by the configured environment variables, then
//! the current working directory. Each root appears once (by canonical form) and
//! only if it currently exists and is writable.

use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::Config;
use crate::path_len::resolve_or_literal;
use crate::platform::is_writable_dir;

/// Accumulates roots in priority order, skipping duplicates and unusable directories.
#[derive(Debug, Default)]
struct RootList {
    seen: HashSet<PathBuf>,
    roots: Vec<PathBuf>,
}

impl RootList {
    fn offer(&mut self, candidate: &Path, origin: &'static str) {
        let canon = resolve_or_literal(candidate);
        if self.seen.contains(&canon) {
            return;
        }
        if !is_writable_dir(&canon) {
            trace!(root = %canon.display(), origin, "skipping root: missing or not writable");
            return;
        }
        debug!(root = %canon.display(), origin, "root candidate");
        self.seen.insert(canon.clone());
        self.roots.push(canon);
    }
}

/// Ancestors of `src`, starting at its parent and ending at the filesystem root.
pub fn ancestor_chain(src: &Path) -> Vec<PathBuf> {
    let start = resolve_or_literal(src);
    start.ancestors().skip(1).map(Path::to_path_buf).collect()
}

/// All usable roots for `src`, reading environment variables from the process.
pub fn candidate_roots(src: &Path, cfg: &Config) -> Vec<PathBuf> {
    candidate_roots_with(src, cfg, |name| env::var_os(name), env::current_dir().ok())
}

/// Like [`candidate_roots`], with the environment lookup and working directory injected.
pub fn candidate_roots_with<F>(
    src: &Path,
    cfg: &Config,
    lookup: F,
    cwd: Option<PathBuf>,
) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut list = RootList::default();

    for anc in ancestor_chain(src) {
        list.offer(&anc, "ancestor");
    }
    for root in &cfg.fallback_roots {
        list.offer(root, "fallback");
    }
    for name in &cfg.env_vars {
        if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
            list.offer(Path::new(&value), "env");
        }
    }
    if cfg.include_cwd {
        if let Some(cwd) = cwd {
            list.offer(&cwd, "cwd");
        }
    }

    list.roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn canon(p: &Path) -> PathBuf {
        dunce::canonicalize(p).unwrap()
    }

    #[test]
    fn ancestors_come_first_closest_first() {
        let td = tempdir().unwrap();
        let base = canon(td.path());
        let src = base.join("a").join("b").join("src");
        fs::create_dir_all(&src).unwrap();

        let cfg = Config::isolated(51, Vec::new());
        let roots = candidate_roots_with(&src, &cfg, |_| None, None);
        assert_eq!(roots[0], base.join("a").join("b"));
        assert_eq!(roots[1], base.join("a"));
        assert_eq!(roots[2], base);
    }

    #[test]
    fn fallbacks_env_and_cwd_follow_in_order_without_duplicates() {
        let td = tempdir().unwrap();
        let base = canon(td.path());
        let src_parent = base.join("tree");
        let src = src_parent.join("src");
        fs::create_dir_all(&src).unwrap();

        let other = tempdir().unwrap();
        let scratch = canon(other.path()).join("scratch");
        let from_env = canon(other.path()).join("env");
        let cwd = canon(other.path()).join("cwd");
        for d in [&scratch, &from_env, &cwd] {
            fs::create_dir_all(d).unwrap();
        }

        let cfg = Config {
            env_vars: vec!["SCRATCH_A".into(), "SCRATCH_B".into(), "UNSET".into()],
            include_cwd: true,
            ..Config::isolated(51, vec![scratch.clone(), base.join("missing"), src_parent.clone()])
        };
        let env: HashMap<&str, OsString> = [
            ("SCRATCH_A", from_env.clone().into_os_string()),
            ("SCRATCH_B", scratch.clone().into_os_string()),
        ]
        .into_iter()
        .collect();

        let roots = candidate_roots_with(&src, &cfg, |k| env.get(k).cloned(), Some(cwd.clone()));

        let pos = |p: &Path| roots.iter().position(|r| r == p).unwrap();
        assert_eq!(pos(&src_parent), 0, "parent of source is first");
        assert!(pos(&scratch) < pos(&from_env));
        assert!(pos(&from_env) < pos(&cwd));
        assert_eq!(roots.last(), Some(&cwd));
        assert_eq!(roots.iter().filter(|r| **r == scratch).count(), 1);
        assert_eq!(roots.iter().filter(|r| **r == src_parent).count(), 1);
        assert!(!roots.contains(&base.join("missing")));
    }

    #[test]
    fn cwd_is_skipped_when_disabled() {
        let td = tempdir().unwrap();
        let src = canon(td.path()).join("src");
        fs::create_dir_all(&src).unwrap();
        let other = tempdir().unwrap();
        let cwd = canon(other.path());

        let cfg = Config::isolated(51, Vec::new());
        let roots = candidate_roots_with(&src, &cfg, |_| None, Some(cwd.clone()));
        assert!(!roots.contains(&cwd));
    }

    #[cfg(unix)]
    #[test]
    fn chain_ends_at_filesystem_root() {
        let chain = ancestor_chain(Path::new("/definitely/not/here"));
        assert_eq!(chain.first(), Some(&PathBuf::from("/definitely/not")));
        assert_eq!(chain.last().map(|p| p.parent()), Some(None));
    }
}

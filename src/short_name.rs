//! Short, collision-free directory names under a candidate root.
//!
//! A name is `<prefix><suffix>` where the suffix is random lowercase hex. Its
//! length is capped by both `max_suffix_len` and whatever the budget leaves after
//! the root and prefix.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use rand::{thread_rng, Rng};
use tracing::{debug, trace};

use crate::path_len::{literal_len, posix_string, resolve_or_literal};

/// Fresh suffixes drawn per prefix before moving on to the next prefix.
const ATTEMPTS_PER_PREFIX: usize = 4;

/// Mints names that do not exist at check time and are never handed out twice.
#[derive(Debug)]
pub struct ShortNameGenerator {
    budget: usize,
    prefixes: Vec<String>,
    issued: HashSet<PathBuf>,
}

impl ShortNameGenerator {
    pub fn new(budget: usize, prefixes: Vec<String>) -> Self {
        Self {
            budget,
            prefixes,
            issued: HashSet::new(),
        }
    }

    /// Try to mint `root/<prefix><suffix>` with total length below the budget.
    /// Returns None ("no fit") when no prefix leaves room or every draw collided.
    pub fn mint(&mut self, root: &Path, max_suffix_len: usize) -> Option<PathBuf> {
        let root_abs = resolve_or_literal(root);
        let root_str = posix_string(&root_abs);
        let sep = if root_str.ends_with('/') { 0 } else { 1 };
        let base_len = root_str.chars().count() + sep;

        for idx in 0..self.prefixes.len() {
            let prefix_len = self.prefixes[idx].chars().count();
            // longest suffix keeping the total strictly under budget
            let room = self.budget.saturating_sub(base_len + prefix_len + 1);
            if room < 1 {
                trace!(root = %root_abs.display(), prefix = %self.prefixes[idx], "prefix leaves no room");
                continue;
            }
            let n = room.min(max_suffix_len);

            for _ in 0..ATTEMPTS_PER_PREFIX {
                let suffix = random_hex(n);
                let name = format!("{}{}", self.prefixes[idx], suffix);
                let cand = root_abs.join(name);
                if literal_len(&cand) >= self.budget || self.issued.contains(&cand) {
                    continue;
                }
                match exists(&cand) {
                    Ok(false) => {
                        debug!(candidate = %cand.display(), "minted short name");
                        self.issued.insert(cand.clone());
                        return Some(cand);
                    }
                    Ok(true) => trace!(candidate = %cand.display(), "name collision"),
                    Err(e) => {
                        trace!(candidate = %cand.display(), error = %e, "cannot check candidate");
                        break;
                    }
                }
            }
        }
        None
    }
}

/// `len` random lowercase hex digits.
fn random_hex(len: usize) -> String {
    let mut rng = thread_rng();
    let mut out = String::with_capacity(len);
    while out.len() < len {
        let take = (len - out.len()).min(15);
        let n: u64 = rng.gen_range(0..1u64 << (4 * take));
        out.push_str(&format!("{n:0take$x}"));
    }
    out
}

// Dangling symlinks count as existing.
fn exists(p: &Path) -> io::Result<bool> {
    match std::fs::symlink_metadata(p) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn prefixes() -> Vec<String> {
        vec!["i.".into(), "x.".into(), ".i.".into(), ".x.".into()]
    }

    #[test]
    fn minted_name_is_under_budget_and_absent() {
        let td = tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        let budget = literal_len(&root) + 10;
        let mut g = ShortNameGenerator::new(budget, prefixes());
        let p = g.mint(&root, 5).expect("should fit");
        assert!(literal_len(&p) < budget);
        assert!(!p.exists());
        assert_eq!(p.parent(), Some(root.as_path()));
        let name = p.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("i."));
        assert_eq!(name.len(), "i.".len() + 5);
    }

    #[test]
    fn suffix_shrinks_to_remaining_room() {
        let td = tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        // "/" + "i." + 2 chars leaves total == root+5, so budget root+6 allows exactly 2
        let budget = literal_len(&root) + 6;
        let mut g = ShortNameGenerator::new(budget, prefixes());
        let p = g.mint(&root, 5).expect("should fit");
        assert_eq!(literal_len(&p), budget - 1);
    }

    #[test]
    fn no_fit_when_root_too_long() {
        let td = tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        let budget = literal_len(&root) + 3;
        let mut g = ShortNameGenerator::new(budget, prefixes());
        assert!(g.mint(&root, 5).is_none());
    }

    #[test]
    fn longer_prefixes_skipped_but_shorter_used() {
        let td = tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        let budget = literal_len(&root) + 5;
        let mut g = ShortNameGenerator::new(budget, vec![".long.".into(), "i.".into()]);
        let p = g.mint(&root, 5).expect("short prefix fits");
        let name = p.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("i."));
    }

    #[test]
    fn repeated_mints_never_repeat() {
        let td = tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        let budget = literal_len(&root) + 12;
        let mut g = ShortNameGenerator::new(budget, prefixes());
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let p = g.mint(&root, 5).expect("plenty of room");
            assert!(seen.insert(p));
        }
    }

    #[test]
    fn skips_existing_names() {
        let td = tempdir().unwrap();
        let root = dunce::canonicalize(td.path()).unwrap();
        // one-char suffix: 16 possible names for "i.", create them all
        for c in "0123456789abcdef".chars() {
            fs::create_dir(root.join(format!("i.{c}"))).unwrap();
        }
        let budget = literal_len(&root) + 5;
        let mut g = ShortNameGenerator::new(budget, prefixes());
        let p = g.mint(&root, 1).expect("x. prefix still free");
        let name = p.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("x."), "got {name}");
        assert!(!p.exists());
    }

    #[test]
    fn suffix_is_lowercase_hex_of_requested_length() {
        for len in [0, 1, 7, 15, 16, 40] {
            let s = random_hex(len);
            assert_eq!(s.len(), len);
            assert!(s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')), "{s}");
        }
        assert_ne!(random_hex(32), random_hex(32));
    }

    #[cfg(unix)]
    #[test]
    fn filesystem_root_has_no_double_separator() {
        let mut g = ShortNameGenerator::new(9, prefixes());
        if let Some(p) = g.mint(Path::new("/"), 5) {
            let s = posix_string(&p);
            assert!(s.starts_with('/') && !s.starts_with("//"));
            assert!(s.chars().count() < 9);
        }
    }
}

#![cfg(unix)]

//! Symlinks pointing inside the source are re-aimed at the mirror; others keep
//! their literal target text.

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use short_link::{ensure_short_path, path_len, Config, Mode};

const DEEP: &str = "a_rather_long_directory_name_used_to_exceed_budget";

fn link_text(p: &Path) -> PathBuf {
    fs::read_link(p).unwrap_or_else(|e| panic!("read_link {}: {e}", p.display()))
}

#[test]
fn inside_and_outside_links_are_handled() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let src = base.join(DEEP).join("project");
    fs::create_dir_all(src.join("data")).unwrap();
    fs::create_dir_all(src.join("shared")).unwrap();
    fs::write(src.join("shared/file"), b"payload").unwrap();

    symlink("../shared/file", src.join("data/link")).unwrap();
    symlink(src.join("shared/file"), src.join("abs_inside")).unwrap();
    symlink("shared", src.join("dir_alias")).unwrap();
    symlink("/nonexistent/elsewhere", src.join("abs_outside")).unwrap();
    symlink("../../sibling.txt", src.join("rel_outside")).unwrap();

    let cfg = Config::isolated(path_len(&base) + 9, Vec::new());
    let spec = ensure_short_path(&cfg, &src).expect("materialize");
    let dst = &spec.target;
    assert_eq!(spec.mode, Mode::Hardlink, "symlinks do not affect the mode");

    assert_eq!(link_text(&dst.join("data/link")), PathBuf::from("../shared/file"));
    assert_eq!(fs::read_to_string(dst.join("data/link")).unwrap(), "payload");

    assert_eq!(link_text(&dst.join("abs_inside")), PathBuf::from("shared/file"));
    assert_eq!(fs::read_to_string(dst.join("abs_inside")).unwrap(), "payload");

    assert!(fs::symlink_metadata(dst.join("dir_alias")).unwrap().file_type().is_symlink());
    assert_eq!(link_text(&dst.join("dir_alias")), PathBuf::from("shared"));

    assert_eq!(link_text(&dst.join("abs_outside")), PathBuf::from("/nonexistent/elsewhere"));
    assert_eq!(link_text(&dst.join("rel_outside")), PathBuf::from("../../sibling.txt"));
}

#[test]
fn link_to_source_root_points_at_destination_root() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let src = base.join(DEEP).join("project");
    fs::create_dir_all(src.join("a/b")).unwrap();
    fs::write(src.join("top.txt"), b"top").unwrap();
    symlink("../..", src.join("a/b/root")).unwrap();

    let cfg = Config::isolated(path_len(&base) + 9, Vec::new());
    let spec = ensure_short_path(&cfg, &src).unwrap();

    assert_eq!(link_text(&spec.target.join("a/b/root")), PathBuf::from("../.."));
    assert_eq!(fs::read_to_string(spec.target.join("a/b/root/top.txt")).unwrap(), "top");
}

#[test]
fn dotdot_through_symlinked_dir_keeps_pointing_at_the_same_file() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let src = base.join(DEEP).join("project");
    fs::create_dir_all(src.join("sub/deep")).unwrap();
    fs::write(src.join("sub/x"), b"right").unwrap();
    fs::write(src.join("x"), b"wrong").unwrap();
    symlink("sub/deep", src.join("ext")).unwrap();
    symlink("ext/../x", src.join("link")).unwrap();
    assert_eq!(fs::read_to_string(src.join("link")).unwrap(), "right");

    let cfg = Config::isolated(path_len(&base) + 9, Vec::new());
    let spec = ensure_short_path(&cfg, &src).unwrap();

    assert_eq!(link_text(&spec.target.join("link")), PathBuf::from("sub/x"));
    assert_eq!(fs::read_to_string(spec.target.join("link")).unwrap(), "right");
}

#[test]
fn link_escaping_through_outside_symlink_is_not_rewritten() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let src = base.join(DEEP).join("project");
    fs::create_dir_all(base.join("outside/real")).unwrap();
    fs::write(base.join("outside/x"), b"outer").unwrap();
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("x"), b"inner").unwrap();
    symlink(base.join("outside/real"), src.join("out")).unwrap();
    symlink("out/../x", src.join("via")).unwrap();
    assert_eq!(fs::read_to_string(src.join("via")).unwrap(), "outer");

    let cfg = Config::isolated(path_len(&base) + 9, Vec::new());
    let spec = ensure_short_path(&cfg, &src).unwrap();

    assert_eq!(link_text(&spec.target.join("via")), PathBuf::from("out/../x"));
    assert_eq!(fs::read_to_string(spec.target.join("via")).unwrap(), "outer");
}

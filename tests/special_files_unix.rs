#![cfg(unix)]

//! Special files are skipped; the rest of the tree is still mirrored.

use std::ffi::CString;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use tempfile::tempdir;

use short_link::{materialize, path_len, Config, Mode};

#[test]
fn fifo_is_skipped() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let src = base.join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("regular.txt"), b"r").unwrap();

    let fifo = src.join("pipe");
    let c = CString::new(fifo.as_os_str().as_bytes()).unwrap();
    let rc = unsafe { libc::mkfifo(c.as_ptr(), 0o600) };
    if rc != 0 {
        eprintln!("mkfifo unsupported here; skipping");
        return;
    }

    let dst = base.join("dst");
    let cfg = Config::isolated(path_len(&base) + 40, Vec::new());
    let mode = materialize(&cfg, &src, &dst).unwrap();

    assert_eq!(mode, Mode::Hardlink);
    assert_eq!(fs::read_to_string(dst.join("regular.txt")).unwrap(), "r");
    assert!(fs::symlink_metadata(dst.join("pipe")).is_err(), "fifo must not be mirrored");
}

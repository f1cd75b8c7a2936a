//! User-facing printing.
//!
//! stdout is reserved for the result (target path, then mode tag) so callers can
//! script against it; everything else goes to stderr. Colors only on a TTY.

use owo_colors::OwoColorize;

use crate::policy::TargetSpec;

fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_info(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "info:".cyan().bold(), msg);
    } else {
        eprintln!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

/// Print a plain line on stdout (no prefix, no color).
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// The two result lines: target path, then mode tag.
pub fn result_lines(spec: &TargetSpec) -> [String; 2] {
    [spec.target_string(), spec.mode.to_string()]
}

pub fn print_result(spec: &TargetSpec) {
    for line in result_lines(spec) {
        print_user(&line);
    }
}

//! Application orchestrator.
//! Loads/merges config, initializes logging, runs the shortening engine and maps
//! the outcome to stdout lines and an exit status.

use anyhow::{Error, Result};
use std::path::Path;
use tracing::{debug, error, info};

use short_link::cli::Args;
use short_link::config::CONFIG_ENV_VAR;
use short_link::output as out;
use short_link::{
    default_config_path, ensure_short_path, load_config_from_xml, Config, ShortLinkError,
    REMEDIATION_HINT,
};

use crate::logging::init_tracing;

/// Run the CLI application and return the process exit status.
pub fn run(args: Args) -> i32 {
    if args.print_config {
        return print_config_location();
    }

    let cfg = match build_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            return 1;
        }
    };

    // Held until return so the file appender flushes.
    let _guard = match init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json) {
        Ok(g) => g,
        Err(e) => {
            out::print_warn(&format!("failed to initialize logging: {e}"));
            None
        }
    };

    debug!(?args, "starting short_link");

    let Some(src) = args.resolved_source() else {
        out::print_error("no source directory given (use --src DIR)");
        return 1;
    };

    match ensure_short_path(&cfg, &src) {
        Ok(spec) => {
            info!(src = %src.display(), target = %spec.target.display(), mode = %spec.mode, "done");
            out::print_result(&spec);
            0
        }
        Err(e) => report_failure(&src, &e),
    }
}

/// Defaults, then XML, then CLI flags.
fn build_config(args: &Args) -> Result<Config> {
    let mut cfg = match load_config_from_xml() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => Config::default(),
        Err(e) => return Err(ShortLinkError::InvalidConfig(format!("{e:#}")).into()),
    };
    args.apply_overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

fn print_config_location() -> i32 {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV_VAR) {
        out::print_user(&cfg_env);
        out::print_info(&format!("using {CONFIG_ENV_VAR} (explicit)"));
        return 0;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_user(&p.display().to_string());
            if !p.exists() {
                out::print_info("no config file exists there yet; built-in defaults apply");
            }
            0
        }
        Err(e) => {
            out::print_error(&format!("could not determine a config path: {e}"));
            2
        }
    }
}

/// Log a structured error, print a diagnostic and pick the exit status.
fn report_failure(src: &Path, e: &Error) -> i32 {
    let Some(sl) = e.downcast_ref::<ShortLinkError>() else {
        error!(src = %src.display(), error = %format!("{e:#}"), "failed");
        out::print_error(&format!("{e:#}"));
        out::print_info(REMEDIATION_HINT);
        return 2;
    };

    let code = sl.code();
    match sl {
        ShortLinkError::NotADirectory(p) => {
            error!(code, kind = "not_a_directory", path = %p.display(), "source is not a directory")
        }
        ShortLinkError::NoCandidateFits { budget } => {
            error!(code, kind = "no_candidate_fits", budget = *budget, src = %src.display(), "no short root available")
        }
        ShortLinkError::CrossFilesystemHardlinkRefused { src, dest } => {
            error!(code, kind = "cross_filesystem", src = %src.display(), dest = %dest.display(), "hardlink refused")
        }
        ShortLinkError::CorruptDestination(p) => {
            error!(code, kind = "corrupt_destination", path = %p.display(), "materialization aborted")
        }
        ShortLinkError::DestinationNotEmpty(p) => {
            error!(code, kind = "destination_not_empty", path = %p.display(), "materialization aborted")
        }
        ShortLinkError::InvalidConfig(msg) => {
            error!(code, kind = "invalid_config", %msg, "configuration rejected")
        }
    }

    out::print_error(&format!("{e:#}"));
    let status = sl.exit_code();
    if status != 1 && !e.to_string().contains(REMEDIATION_HINT) {
        out::print_info(REMEDIATION_HINT);
    }
    status
}

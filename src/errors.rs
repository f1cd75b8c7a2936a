//! Typed error definitions for short_link.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShortLinkError {
    #[error("source is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("no short writable directory (< {budget} chars) could be created")]
    NoCandidateFits { budget: usize },

    #[error(
        "cannot hardlink '{src}' -> '{dest}': destination is on a different filesystem and copy fallback is disabled"
    )]
    CrossFilesystemHardlinkRefused { src: PathBuf, dest: PathBuf },

    #[error("refusing to replace non-empty directory: {0}")]
    CorruptDestination(PathBuf),

    #[error("destination already has content: {0}")]
    DestinationNotEmpty(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ShortLinkError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            ShortLinkError::NotADirectory(_) => 10,
            ShortLinkError::NoCandidateFits { .. } => 20,
            ShortLinkError::CrossFilesystemHardlinkRefused { .. } => 30,
            ShortLinkError::CorruptDestination(_) => 40,
            ShortLinkError::DestinationNotEmpty(_) => 41,
            ShortLinkError::InvalidConfig(_) => 50,
        }
    }

    /// Process exit status the CLI reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShortLinkError::NotADirectory(_) | ShortLinkError::InvalidConfig(_) => 1,
            _ => 2,
        }
    }
}

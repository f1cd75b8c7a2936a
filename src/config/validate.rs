//! Config validation logic.
//! Rejects settings under which no short name could ever be minted.

use anyhow::Result;
use std::path::MAIN_SEPARATOR;
use tracing::debug;

use crate::errors::ShortLinkError;

use super::types::Config;

impl Config {
    /// Validate budget, prefixes and suffix length.
    pub fn validate(&self) -> Result<()> {
        if self.budget < 2 {
            return Err(invalid(format!(
                "budget must be at least 2, got {}",
                self.budget
            )));
        }
        if self.max_suffix_len == 0 {
            return Err(invalid("max_suffix_len must be at least 1".into()));
        }
        if self.prefixes.is_empty() {
            return Err(invalid("at least one name prefix is required".into()));
        }
        for p in &self.prefixes {
            if p.is_empty() {
                return Err(invalid("name prefixes must not be empty".into()));
            }
            if p.contains('/') || p.contains(MAIN_SEPARATOR) {
                return Err(invalid(format!(
                    "name prefix '{p}' must not contain a path separator"
                )));
            }
        }
        debug!(
            budget = self.budget,
            prefixes = ?self.prefixes,
            roots = self.fallback_roots.len(),
            "config validated"
        );
        Ok(())
    }
}

fn invalid(msg: String) -> anyhow::Error {
    ShortLinkError::InvalidConfig(msg).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_tiny_budget() {
        let cfg = Config::with_budget(1);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ShortLinkError>(),
            Some(ShortLinkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_separator_in_prefix() {
        let cfg = Config {
            prefixes: vec!["a/".into()],
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_suffix() {
        let cfg = Config {
            max_suffix_len: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }
}

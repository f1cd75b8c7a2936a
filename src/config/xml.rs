//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Repeated `<fallback_root>` / `<env_var>` elements replace the default lists.
//!
//! Notes:
//! - This module only reads the config file; semantic checks happen in `validate`.
//! - Unknown XML fields are an error so misconfigurations surface early.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use crate::config::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    budget: Option<usize>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    max_suffix_len: Option<usize>,
    #[serde(rename = "prefix", default)]
    prefixes: Vec<String>,
    #[serde(rename = "fallback_root", default)]
    fallback_roots: Vec<String>,
    #[serde(rename = "env_var", default)]
    env_vars: Vec<String>,
    include_cwd: Option<bool>,
    allow_copy_fallback: Option<bool>,
    preserve_metadata: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

// Trims surrounding whitespace; unparsable values count as unset.
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<usize>().ok()))
}

fn non_empty_trimmed(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Map XmlConfig -> Config on top of the defaults.
fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();

    if let Some(b) = parsed.budget {
        cfg.budget = b;
    }
    if let Some(n) = parsed.max_suffix_len {
        cfg.max_suffix_len = n;
    }

    let prefixes = non_empty_trimmed(parsed.prefixes);
    if !prefixes.is_empty() {
        cfg.prefixes = prefixes;
    }
    let roots = non_empty_trimmed(parsed.fallback_roots);
    if !roots.is_empty() {
        cfg.fallback_roots = roots.into_iter().map(PathBuf::from).collect();
    }
    let vars = non_empty_trimmed(parsed.env_vars);
    if !vars.is_empty() {
        cfg.env_vars = vars;
    }

    if let Some(v) = parsed.include_cwd {
        cfg.include_cwd = v;
    }
    if let Some(v) = parsed.allow_copy_fallback {
        cfg.allow_copy_fallback = v;
    }
    if let Some(v) = parsed.preserve_metadata {
        cfg.preserve_metadata = v;
    }

    if let Some(level) = parsed
        .log_level
        .as_deref()
        .and_then(|s| s.trim().parse::<LogLevel>().ok())
    {
        cfg.log_level = level;
    }
    cfg.log_file = parsed.log_file.as_deref().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    });

    cfg
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(xml_to_config(parsed))
}

/// Load the config from `$SHORT_LINK_CONFIG` or the default location.
/// Returns Ok(None) when no file exists there.
pub fn load_config_from_xml() -> Result<Option<Config>> {
    let path = default_config_path()?;
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    debug!(path = %path.display(), "loading config file");
    load_config_from_xml_path(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn repeated_elements_replace_defaults() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(
            &p,
            r#"<config>
  <budget> 64 </budget>
  <fallback_root>/scratch</fallback_root>
  <fallback_root>/run/user/1000</fallback_root>
  <env_var>SCRATCH</env_var>
  <allow_copy_fallback>false</allow_copy_fallback>
  <log_level>debug</log_level>
</config>"#,
        )
        .unwrap();

        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.budget, 64);
        assert_eq!(
            cfg.fallback_roots,
            vec![PathBuf::from("/scratch"), PathBuf::from("/run/user/1000")]
        );
        assert_eq!(cfg.env_vars, vec!["SCRATCH".to_string()]);
        assert!(!cfg.allow_copy_fallback);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        // untouched fields keep defaults
        assert_eq!(cfg.prefixes, Config::default().prefixes);
        assert!(cfg.include_cwd);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><colour>blue</colour></config>").unwrap();
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("parse config xml"));
    }

    #[test]
    fn empty_log_file_means_none() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><log_file>   </log_file></config>").unwrap();
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert!(cfg.log_file.is_none());
    }
}

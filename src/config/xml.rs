//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Renders and writes the factory-default template.
//!
//! Notes:
//! - Unknown XML fields are a hard error so typos surface instead of silently defaulting.
//! - Storage root validation happens in `validate`, not here.

use anyhow::{bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{config_path_from_env, default_config_path, default_storage_root, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use crate::fs_ops::ChecksumAlgorithm;
use crate::platform::{set_dir_mode_0700, write_file_secure_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    storage_root: Option<String>,
    clobber: Option<bool>,
    checksum: Option<String>,
    include_root: Option<bool>,
    preserve_metadata: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

// Map XmlConfig -> Config; absent fields keep their defaults.
fn xml_to_config(parsed: XmlConfig, origin: &Path) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.storage_root.as_deref()) {
        cfg.storage_root = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.checksum.as_deref()) {
        cfg.checksum = s
            .parse::<ChecksumAlgorithm>()
            .with_context(|| format!("checksum in '{}'", origin.display()))?;
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = match LogLevel::parse(s) {
            Some(level) => level,
            None => bail!("invalid log_level '{s}' in '{}'", origin.display()),
        };
    }

    cfg.clobber = parsed.clobber.unwrap_or(cfg.clobber);
    cfg.include_root = parsed.include_root.unwrap_or(cfg.include_root);
    cfg.preserve_metadata = parsed.preserve_metadata.unwrap_or(cfg.preserve_metadata);

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig =
        from_xml_str(&contents).with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed, path)
}

/// Resolve and load the effective config file.
///
/// Order: `explicit` (from `-c/--config`), then `HOLOGRAPHER_CONFIG`, then the
/// platform default. An explicitly named file must exist; a missing default file
/// just means factory defaults. Returns the config and the file it came from.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let named = explicit.map(Path::to_path_buf).or_else(config_path_from_env);
    if let Some(path) = named {
        debug!("Loading config from {}", path.display());
        let cfg = load_config_from_xml_path(&path)?;
        return Ok((cfg, Some(path)));
    }

    match default_config_path() {
        Ok(path) if path.exists() => {
            debug!("Loading config from default path {}", path.display());
            let cfg = load_config_from_xml_path(&path)?;
            Ok((cfg, Some(path)))
        }
        Ok(path) => {
            debug!("No config at {}; using factory defaults", path.display());
            Ok((Config::default(), None))
        }
        Err(e) => {
            debug!("No default config path ({e}); using factory defaults");
            Ok((Config::default(), None))
        }
    }
}

/// Factory-default config file contents.
pub fn render_template() -> String {
    format!(
        "<!--\n  holographer configuration (XML)\n\n  Fields:\n    storage_root       -> directory that receives relocated trees (source paths are rebased under it)\n    clobber            -> true/false; overwrite existing files in storage\n    checksum           -> md5 | sha256 | blake3\n    include_root       -> true/false; list the source directory itself as a row\n    preserve_metadata  -> true/false; copy permissions + timestamps\n    log_level          -> quiet | normal | info | debug\n    log_file           -> path to a log file (optional; console output is kept)\n\n  Notes:\n    - CLI flags override XML values.\n    - Unknown elements are rejected.\n-->\n<config>\n  <storage_root>{}</storage_root>\n  <clobber>false</clobber>\n  <checksum>{}</checksum>\n  <include_root>false</include_root>\n  <preserve_metadata>true</preserve_metadata>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n</config>\n",
        default_storage_root().display(),
        ChecksumAlgorithm::default(),
    )
}

/// Write the factory-default config to `path` (0600 on Unix), creating the parent with 0700.
/// Refuses to write through a symlinked ancestor. Overwrites an existing file.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir '{}'", parent.display()))?;
            let _ = set_dir_mode_0700(parent);
        }
    }

    write_file_secure_0600(path, render_template().as_bytes())
        .with_context(|| format!("write config '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn template_parses_back_to_defaults() {
        let td = tempdir().unwrap();
        let path = td.path().join("cfg/config.xml");
        create_template_config(&path).unwrap();

        let cfg = load_config_from_xml_path(&path).unwrap();
        let def = Config::default();
        assert_eq!(cfg.storage_root, def.storage_root);
        assert_eq!(cfg.checksum, ChecksumAlgorithm::Md5);
        assert!(!cfg.clobber);
        assert!(cfg.preserve_metadata);
        assert_eq!(cfg.log_file, None);
    }

    #[test]
    fn reads_fields() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(
            &path,
            "<config>\n  <storage_root> /srv/store </storage_root>\n  <clobber>true</clobber>\n  <checksum>SHA256</checksum>\n  <log_level>debug</log_level>\n</config>\n",
        )
        .unwrap();

        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.storage_root, PathBuf::from("/srv/store"));
        assert!(cfg.clobber);
        assert_eq!(cfg.checksum, ChecksumAlgorithm::Sha256);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert!(!cfg.include_root);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><source_root>/x</source_root></config>").unwrap();
        let err = load_config_from_xml_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"), "{err:#}");
    }

    #[test]
    fn unsupported_checksum_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><checksum>crc32</checksum></config>").unwrap();
        let err = load_config_from_xml_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported checksum kind"), "{err:#}");
    }

    #[test]
    fn explicit_path_must_exist() {
        let td = tempdir().unwrap();
        assert!(load_config(Some(&td.path().join("nope.xml"))).is_err());
    }
}

//! Config file management for `holo configs`.

use anyhow::{Context, Result};
use chrono::Local;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::types::Config;
use super::xml::create_template_config;

/// Backup name for an existing config: `<path>.bkdup_on_<local timestamp>`.
/// The timestamp avoids ':' so the name is valid on every platform.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y-%m-%dT%H-%M-%S%.6f");
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".bkdup_on_{stamp}"));
    PathBuf::from(name)
}

/// Replace the config at `path` with the factory default.
/// An existing file is renamed to a timestamped backup first; its path is returned.
pub fn generate_config(path: &Path) -> Result<Option<PathBuf>> {
    let backup = if fs::symlink_metadata(path).is_ok() {
        let bk = backup_path_for(path);
        fs::rename(path, &bk)
            .with_context(|| format!("back up '{}' to '{}'", path.display(), bk.display()))?;
        info!("Backed up {} to {}", path.display(), bk.display());
        Some(bk)
    } else {
        None
    };

    create_template_config(path)?;
    Ok(backup)
}

/// Human-readable listing of the effective configuration.
pub fn describe_config(cfg: &Config, source: Option<&Path>) -> String {
    let mut out = String::new();
    let origin = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<factory defaults>".into());
    let _ = writeln!(out, "config file:       {origin}");
    let _ = writeln!(out, "storage_root:      {}", cfg.storage_root.display());
    let _ = writeln!(out, "clobber:           {}", cfg.clobber);
    let _ = writeln!(out, "checksum:          {}", cfg.checksum);
    let _ = writeln!(out, "include_root:      {}", cfg.include_root);
    let _ = writeln!(out, "preserve_metadata: {}", cfg.preserve_metadata);
    let _ = writeln!(out, "log_level:         {}", cfg.log_level);
    let _ = writeln!(
        out,
        "log_file:          {}",
        cfg.log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".into())
    );
    out
}

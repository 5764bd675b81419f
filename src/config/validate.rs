//! Config validation logic.
//! Verifies the storage root is (or can become) a writable directory and that the
//! log file location is safe to open.

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::{debug, info};

use super::paths::path_has_symlink_ancestor;
use super::types::Config;
use crate::fs_ops::util::unique_sibling;

impl Config {
    /// Validate settings that must hold before anything is written.
    /// Creates the storage root when missing.
    pub fn validate(&self) -> Result<()> {
        ensure_dir_is_or_create(&self.storage_root, "storage_root")?;
        ensure_writable(&self.storage_root, "storage_root")?;

        if let Some(log) = &self.log_file {
            if path_has_symlink_ancestor(log).unwrap_or(false) {
                bail!("log_file '{}' has a symlinked ancestor; refusing to use it", log.display());
            }
        }

        info!(
            "Config validated: storage='{}' checksum={} clobber={} log_file='{}'",
            self.storage_root.display(),
            self.checksum,
            self.clobber,
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into())
        );
        Ok(())
    }
}

/// Ensure directory exists (create if missing). If it exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("{name} exists but isn't a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create {name} directory '{}'", path.display()))?;
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is writable using a non-destructive probe file.
fn ensure_writable(path: &Path, name: &str) -> Result<()> {
    let probe = unique_sibling(&path.join("probe"), "probe");
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
        .with_context(|| format!("Cannot write to {name} '{}'; check permissions", path.display()))?;
    let _ = fs::remove_file(&probe);
    debug!("{name} writable: {}", path.display());
    Ok(())
}

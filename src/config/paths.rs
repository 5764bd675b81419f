//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log/storage paths and detects symlinked ancestors for safety.

use anyhow::{anyhow, Context, Result};
use dirs::{config_dir, data_dir, home_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{APP_DIR_NAME, CONFIG_ENV, CONFIG_FILE_NAME};

/// Config path named by `HOLOGRAPHER_CONFIG`, if set and non-empty.
/// A relative value is taken relative to the current directory; a directory gets `config.xml` appended.
pub fn config_path_from_env() -> Option<PathBuf> {
    let raw = env::var_os(CONFIG_ENV)?;
    if raw.is_empty() {
        return None;
    }
    let mut p = PathBuf::from(raw);
    if p.is_relative() {
        if let Ok(cwd) = env::current_dir() {
            p = cwd.join(p);
        }
    }
    if p.is_dir() {
        p.push(CONFIG_FILE_NAME);
    }
    Some(p)
}

/// OS-appropriate default config path; `HOLOGRAPHER_CONFIG` wins when set.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = config_path_from_env() {
        return Ok(p);
    }
    config_dir()
        .or_else(|| home_dir().map(|h| h.join(".config")))
        .map(|base| base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| anyhow!("cannot determine a config directory for this user"))
}

/// OS-appropriate default log file path (data dir). The directory is not created here.
pub fn default_log_path() -> Result<PathBuf> {
    data_dir()
        .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
        .map(|base| base.join(APP_DIR_NAME).join("holographer.log"))
        .context("cannot determine a data directory for this user")
}

/// Factory-default storage root: `<data dir>/holographer/storage`.
pub fn default_storage_root() -> PathBuf {
    data_dir()
        .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
        .map(|base| base.join(APP_DIR_NAME).join("storage"))
        .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME).join("storage"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.as_os_str().is_empty() {
            break;
        }
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn env_dir_gets_file_name_appended() {
        let td = tempdir().unwrap();
        unsafe { env::set_var(CONFIG_ENV, td.path()) };
        let p = config_path_from_env();
        unsafe { env::remove_var(CONFIG_ENV) };
        assert_eq!(p.unwrap(), td.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    #[serial]
    fn empty_env_is_ignored() {
        unsafe { env::set_var(CONFIG_ENV, "") };
        let p = config_path_from_env();
        unsafe { env::remove_var(CONFIG_ENV) };
        assert!(p.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn detects_symlinked_ancestor() {
        let td = tempdir().unwrap();
        let base = dunce::canonicalize(td.path()).unwrap();
        let real = base.join("real");
        fs::create_dir(&real).unwrap();
        let link = base.join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert!(path_has_symlink_ancestor(&link.join("config.xml")).unwrap());
        assert!(!path_has_symlink_ancestor(&real.join("config.xml")).unwrap());
        assert!(!path_has_symlink_ancestor(&real.join("missing/config.xml")).unwrap());
    }
}

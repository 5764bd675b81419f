//! Decoy planting: replace the original with a symlink into storage.
//!
//! Runs only after a copy table in which every row verified. The original is
//! renamed to a hidden sibling first, the link is created in its place, and
//! only then is the set-aside original deleted. If the link can't be created
//! the original is renamed back.
//!
//! Inventory keys a symlink by what it points at, so a link and its target share
//! one row and an outside target is stored outside the tree's stored copy.
//! Before anything is moved, every entry under the original must have a
//! counterpart at the same relative path in storage.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::errors::{io_err, HoloError, Result};
use crate::fs_ops::{resolve, util::unique_sibling};
use crate::pipeline::{desti_path_for, mismatches, CopyTable};

/// Replace `original` with a symlink to its stored copy under `storage_root`.
/// Returns the link target.
pub fn plant_decoy(original: &Path, storage_root: &Path, copies: &CopyTable) -> Result<PathBuf> {
    if copies.is_empty() {
        return Err(HoloError::validation("refusing to plant a decoy: copy table is empty"));
    }
    let failed = mismatches(copies);
    if !failed.is_empty() {
        return Err(HoloError::validation(format!(
            "refusing to plant a decoy: {} of {} rows did not verify (first: {})",
            failed.len(),
            copies.len(),
            failed[0].display()
        )));
    }

    let lmeta = fs::symlink_metadata(original).map_err(io_err("stat original", original))?;
    if lmeta.file_type().is_symlink() {
        return Err(HoloError::validation(format!(
            "refusing to replace a symlink with a decoy: {}",
            original.display()
        )));
    }

    let stored = desti_path_for(&resolve(storage_root), &resolve(original));
    ensure_tree_stored(original, &stored)?;
    if !copies.values().any(|r| stored.starts_with(&r.desti_path) || r.desti_path.starts_with(&stored)) {
        return Err(HoloError::validation(format!(
            "copy table does not cover {}",
            original.display()
        )));
    }
    if fs::symlink_metadata(&stored).is_err() {
        return Err(HoloError::validation(format!(
            "stored copy is missing: {}",
            stored.display()
        )));
    }

    let aside = unique_sibling(original, "orig");
    fs::rename(original, &aside).map_err(io_err("set original aside", original))?;

    if let Err(e) = symlink(&stored, original, lmeta.is_dir()) {
        error!(original = %original.display(), error = %e, "decoy link failed; restoring original");
        fs::rename(&aside, original).map_err(io_err("restore original", &aside))?;
        return Err(io_err("create decoy link", original)(e));
    }

    let removed = if lmeta.is_dir() {
        fs::remove_dir_all(&aside)
    } else {
        fs::remove_file(&aside)
    };
    removed.map_err(io_err("remove set-aside original", &aside))?;

    info!(original = %original.display(), target = %stored.display(), "decoy planted");
    Ok(stored)
}

/// Every entry below `original` must exist (as anything, links included) at the
/// same relative path under `stored`. Links are not followed.
fn ensure_tree_stored(original: &Path, stored: &Path) -> Result<()> {
    for entry in WalkDir::new(original).min_depth(1).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(original).to_path_buf();
            match e.into_io_error() {
                Some(ioe) => io_err("walk original", path)(ioe),
                None => HoloError::validation(format!("filesystem loop while walking {}", path.display())),
            }
        })?;
        let rel = entry.path().strip_prefix(original).unwrap_or(entry.path());
        let counterpart = stored.join(rel);
        if fs::symlink_metadata(&counterpart).is_err() {
            let what = if entry.path_is_symlink() {
                "symlink, stored under its target instead"
            } else {
                "entry"
            };
            return Err(HoloError::validation(format!(
                "refusing to plant a decoy: {} ({what}) has no stored counterpart at {}",
                entry.path().display(),
                counterpart.display()
            )));
        }
        debug!(entry = %entry.path().display(), "stored counterpart present");
    }
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path, _is_dir: bool) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path, is_dir: bool) -> std::io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::pipeline::{run, PipelineOptions};
    use tempfile::tempdir;

    #[test]
    fn directory_becomes_link_into_storage() {
        let td = tempdir().unwrap();
        let store = tempdir().unwrap();
        let data = td.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("a.txt"), "hi").unwrap();

        let report = run(&data, store.path(), &PipelineOptions::default()).unwrap();
        assert!(report.is_success());

        let target = plant_decoy(&data, store.path(), &report.copies).unwrap();
        assert!(fs::symlink_metadata(&data).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&data).unwrap(), target);
        assert_eq!(fs::read_to_string(data.join("a.txt")).unwrap(), "hi");
    }

    #[test]
    fn refuses_when_a_row_did_not_verify() {
        let td = tempdir().unwrap();
        let store = tempdir().unwrap();
        let f = td.path().join("a.txt");
        fs::write(&f, "hi").unwrap();

        let mut report = run(&f, store.path(), &PipelineOptions::default()).unwrap();
        report.copies.values_mut().for_each(|r| r.copy_success = false);

        let err = plant_decoy(&f, store.path(), &report.copies).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(fs::read_to_string(&f).unwrap(), "hi");
        assert!(!fs::symlink_metadata(&f).unwrap().file_type().is_symlink());
    }

    #[test]
    fn refuses_when_an_in_tree_link_has_no_stored_name() {
        let td = tempdir().unwrap();
        let store = tempdir().unwrap();
        let data = td.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("a.txt"), "hi").unwrap();
        std::os::unix::fs::symlink(data.join("a.txt"), data.join("alias.txt")).unwrap();

        let report = run(&data, store.path(), &PipelineOptions::default()).unwrap();
        assert!(report.is_success());
        assert_eq!(report.copies.len(), 1);

        let err = plant_decoy(&data, store.path(), &report.copies).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("alias.txt"), "{err}");
        assert!(err.to_string().contains("symlink"), "{err}");

        assert!(!fs::symlink_metadata(&data).unwrap().file_type().is_symlink());
        assert!(fs::symlink_metadata(data.join("alias.txt")).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(data.join("alias.txt")).unwrap(), "hi");
    }

    #[test]
    fn refuses_when_a_link_points_outside_the_tree() {
        let td = tempdir().unwrap();
        let store = tempdir().unwrap();
        let data = td.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("a.txt"), "hi").unwrap();
        let outside = td.path().join("outside.txt");
        fs::write(&outside, "far").unwrap();
        std::os::unix::fs::symlink(&outside, data.join("ext.txt")).unwrap();

        let report = run(&data, store.path(), &PipelineOptions::default()).unwrap();
        assert!(report.is_success());

        let err = plant_decoy(&data, store.path(), &report.copies).unwrap_err();
        assert!(err.is_validation());
        let msg = err.to_string();
        assert!(msg.contains("ext.txt"), "{msg}");
        assert!(!msg.contains("does not cover"), "{msg}");
        assert_eq!(fs::read_to_string(data.join("ext.txt")).unwrap(), "far");
        assert!(!fs::symlink_metadata(&data).unwrap().file_type().is_symlink());
    }
}

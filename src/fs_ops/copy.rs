//! Single-file copy honoring the clobber policy.
//!
//! - `clobber = false`: the destination is created exclusively, so a file that
//!   exists (or appears mid-run) is never written to.
//! - `clobber = true`: content lands in a temp sibling which is then renamed
//!   over the destination; readers never observe a half-written file.

use std::fs;
use std::path::Path;
use tracing::debug;

use super::atomic::try_atomic_move;
use super::io_copy::{copy_streaming, DurabilityMode};
use super::metadata::preserve_metadata;
use super::resolve::resolve;
use super::util::unique_sibling;
use crate::errors::{io_err, HoloError, Result};

/// Options for [`copy_file_with`].
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions {
    pub clobber: bool,
    /// Copy timestamps and permission bits after the content.
    pub preserve_metadata: bool,
    pub durability: DurabilityMode,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            clobber: false,
            preserve_metadata: true,
            durability: DurabilityMode::Full,
        }
    }
}

/// Copy a single regular file from `src` to `dst`, preserving metadata.
pub fn copy_file(src: &Path, dst: &Path, clobber: bool) -> Result<u64> {
    copy_file_with(src, dst, CopyOptions { clobber, ..CopyOptions::default() })
}

/// Copy `src` to `dst`.
///
/// Fails with a validation error, before touching `dst`, when `src` is not an
/// existing regular file or when `dst` exists and `clobber` is off. Missing
/// parent directories of `dst` are created.
pub fn copy_file_with(src: &Path, dst: &Path, opts: CopyOptions) -> Result<u64> {
    if !src.is_file() {
        return Err(HoloError::validation(format!(
            "src must be a file that exists: {}",
            src.display()
        )));
    }
    if !opts.clobber && (dst.exists() || dst.is_symlink()) {
        return Err(HoloError::validation(format!(
            "dst exists and clobber is set to false: {}",
            dst.display()
        )));
    }

    let src = resolve(src);
    let dst = resolve(dst);

    let src_meta = fs::metadata(&src).map_err(io_err("stat source", &src))?;
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(io_err("create destination directory", parent))?;
    }

    let bytes = if opts.clobber {
        let tmp = unique_sibling(&dst, "tmp");
        copy_streaming(&src, &tmp, opts.durability).map_err(io_err("copy to temporary file", &tmp))?;
        if opts.preserve_metadata {
            preserve_metadata(&tmp, &src_meta);
        }
        if let Err(e) = try_atomic_move(&tmp, &dst) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::metadata(&dst).map(|m| m.len()).unwrap_or_default()
    } else {
        let bytes = copy_streaming(&src, &dst, opts.durability).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                HoloError::validation(format!("dst exists and clobber is set to false: {}", dst.display()))
            } else {
                io_err("copy file to destination", &dst)(e)
            }
        })?;
        if opts.preserve_metadata {
            preserve_metadata(&dst, &src_meta);
        }
        bytes
    };

    debug!(src = %src.display(), dst = %dst.display(), bytes, clobber = opts.clobber, "copied file");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_into_missing_parent() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, "hi").unwrap();
        let dst = td.path().join("store").join("deep").join("a.txt");

        assert_eq!(copy_file(&src, &dst, false).unwrap(), 2);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "hi");
    }

    #[test]
    fn refuses_existing_destination_without_clobber() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dst = td.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();

        let err = copy_file(&src, &dst, false).unwrap_err();
        assert!(err.is_validation(), "got {err:?}");
        assert_eq!(fs::read_to_string(&dst).unwrap(), "old");
    }

    #[test]
    fn clobber_replaces_and_leaves_no_temp() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dst = td.path().join("b.txt");
        fs::write(&src, "new content").unwrap();
        fs::write(&dst, "old").unwrap();

        copy_file(&src, &dst, true).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new content");
        let leftovers: Vec<_> = fs::read_dir(td.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".holo.tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn directory_source_is_rejected_before_writing() {
        let td = tempdir().unwrap();
        let dst = td.path().join("out");
        let err = copy_file(td.path(), &dst, true).unwrap_err();
        assert!(err.is_validation());
        assert!(!dst.exists());
    }

    #[test]
    fn missing_source_is_rejected() {
        let td = tempdir().unwrap();
        let err = copy_file(&td.path().join("ghost"), &td.path().join("out"), false).unwrap_err();
        assert!(err.to_string().contains("src must be a file that exists"));
    }

    #[cfg(unix)]
    #[test]
    fn preserves_mode_bits() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let src = td.path().join("a.sh");
        fs::write(&src, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();
        let dst = td.path().join("copy.sh");

        copy_file(&src, &dst, false).unwrap();
        assert_eq!(fs::metadata(&dst).unwrap().permissions().mode() & 0o777, 0o750);
    }
}

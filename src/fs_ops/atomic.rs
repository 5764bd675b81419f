//! Atomic rename helper.
//! - On Windows, removes an existing destination first (rename doesn’t overwrite there).
//! - On Unix, best-effort fsync of the destination directory after rename.

use std::fs;
use std::path::Path;

use crate::errors::{io_err, Result};

pub(crate) fn try_atomic_move(src: &Path, dst: &Path) -> Result<()> {
    #[cfg(windows)]
    {
        if dst.is_file() {
            if let Err(e) = fs::remove_file(dst) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(io_err("remove existing destination before rename", dst)(e));
                }
            }
        }
    }

    fs::rename(src, dst).map_err(io_err("rename into place", dst))?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // A failed fsync doesn't undo a successful rename.
        let _ = super::util::fsync_dir(parent);
    }

    Ok(())
}

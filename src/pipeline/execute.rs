//! Copy execution: one best-effort attempt per row, in sorted key order.
//!
//! Sorted order puts every directory before its children, so directories are
//! created before files are copied into them. A failed row is logged and
//! recorded; the loop carries on with the next one.

use std::fs;
use tracing::{debug, info, warn};

use super::table::{DestinationRecord, DestinationTable, ExecutionLog, InventoryTable, PathRecord};
use crate::errors::{io_err, HoloError, Result};
use crate::fs_ops::{copy_file_with, CopyOptions, PathKind};
use crate::shutdown;

/// Run the copy for every row; returns the rows that failed.
/// Cancellation is taken from the process-wide shutdown flag.
pub fn execute(source: &InventoryTable, desti: &DestinationTable, clobber: bool) -> ExecutionLog {
    let opts = CopyOptions {
        clobber,
        ..CopyOptions::default()
    };
    execute_with(source, desti, opts, shutdown::is_requested)
}

/// Like [`execute`], with explicit copy options and cancellation check.
///
/// `cancelled` is polled before each row. Once it returns true, that row and
/// every row after it is recorded as `Interrupted` without being attempted.
pub fn execute_with<F>(source: &InventoryTable, desti: &DestinationTable, opts: CopyOptions, cancelled: F) -> ExecutionLog
where
    F: Fn() -> bool,
{
    let mut failures = ExecutionLog::new();
    let mut interrupted = false;

    for (key, row) in source {
        if !interrupted && cancelled() {
            warn!("cancellation requested; skipping remaining rows");
            interrupted = true;
        }
        if interrupted {
            failures.insert(key.clone(), HoloError::Interrupted);
            continue;
        }

        let outcome = match desti.get(key) {
            Some(target) => copy_row(row, target, opts),
            None => Err(HoloError::validation(format!(
                "no destination planned for {}",
                key.display()
            ))),
        };

        if let Err(e) = outcome {
            warn!(code = e.code(), path = %key.display(), error = %e, "copy failed");
            failures.insert(key.clone(), e);
        }
    }

    info!(
        rows = source.len(),
        failed = failures.len(),
        clobber = opts.clobber,
        "copy pass complete"
    );
    failures
}

/// Dispatch one row on its source kind.
fn copy_row(row: &PathRecord, target: &DestinationRecord, opts: CopyOptions) -> Result<()> {
    let dst = &target.desti_path;
    match row.kind {
        PathKind::Dir => {
            fs::create_dir_all(dst).map_err(io_err("create directory", dst))?;
            debug!(dest = %dst.display(), "directory ready");
        }
        PathKind::File => {
            copy_file_with(&row.source_path, dst, opts)?;
        }
        // Links and special files go through the file path: a link's referent
        // is stored, not the link; fifos and devices are refused there.
        PathKind::Symlink | PathKind::Other => {
            copy_file_with(&row.source_path, dst, opts)?;
        }
        PathKind::Nonexistent => return Err(HoloError::UnimplementedKind(row.kind)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::ChecksumAlgorithm;
    use crate::pipeline::{inventory, plan};
    use std::cell::Cell;
    use tempfile::tempdir;

    fn scenario() -> (tempfile::TempDir, tempfile::TempDir) {
        let src = tempdir().unwrap();
        fs::write(src.path().join("a.txt"), "hi").unwrap();
        fs::create_dir(src.path().join("b")).unwrap();
        fs::write(src.path().join("b").join("c.txt"), "yo").unwrap();
        (src, tempdir().unwrap())
    }

    #[test]
    fn copies_tree_without_failures() {
        let (src, store) = scenario();
        let inv = inventory(src.path()).unwrap();
        let dest = plan(&inv, store.path(), ChecksumAlgorithm::Md5).unwrap();

        let failures = execute_with(&inv, &dest, CopyOptions::default(), || false);
        assert!(failures.is_empty(), "{failures:?}");
        for (key, row) in &dest {
            match inv[key].kind {
                PathKind::Dir => assert!(row.desti_path.is_dir()),
                _ => assert_eq!(fs::read(&row.desti_path).unwrap(), fs::read(key).unwrap()),
            }
        }
    }

    #[test]
    fn missing_destination_row_is_isolated() {
        let (src, store) = scenario();
        let inv = inventory(src.path()).unwrap();
        let mut dest = plan(&inv, store.path(), ChecksumAlgorithm::Md5).unwrap();
        let a = inv.keys().find(|k| k.ends_with("a.txt")).unwrap().clone();
        dest.remove(&a);

        let failures = execute_with(&inv, &dest, CopyOptions::default(), || false);
        assert_eq!(failures.len(), 1);
        assert!(failures[&a].is_validation());
        let c = dest.iter().find(|(k, _)| k.ends_with("c.txt")).unwrap().1;
        assert_eq!(fs::read_to_string(&c.desti_path).unwrap(), "yo");
    }

    #[test]
    fn nonexistent_kind_has_no_copy_strategy() {
        let (src, store) = scenario();
        let mut inv = inventory(src.path()).unwrap();
        let ghost = src.path().join("ghost");
        inv.insert(
            ghost.clone(),
            PathRecord {
                source_path: ghost.clone(),
                exists: false,
                kind: PathKind::Nonexistent,
                checksum: crate::fs_ops::FILE_NOT_FOUND.into(),
            },
        );
        let dest = plan(&inv, store.path(), ChecksumAlgorithm::Md5).unwrap();

        let failures = execute_with(&inv, &dest, CopyOptions::default(), || false);
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[&ghost], HoloError::UnimplementedKind(PathKind::Nonexistent)));
    }

    #[test]
    fn cancellation_marks_remaining_rows() {
        let (src, store) = scenario();
        let inv = inventory(src.path()).unwrap();
        let dest = plan(&inv, store.path(), ChecksumAlgorithm::Md5).unwrap();

        let polls = Cell::new(0);
        let failures = execute_with(&inv, &dest, CopyOptions::default(), || {
            polls.set(polls.get() + 1);
            polls.get() > 1
        });
        assert_eq!(failures.len(), inv.len() - 1);
        assert!(failures.values().all(|e| matches!(e, HoloError::Interrupted)));
    }
}

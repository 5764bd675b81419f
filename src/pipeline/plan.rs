//! Destination planning: rebase every source row under the storage root and
//! snapshot what is already there. The snapshot is taken once, before any
//! copy, and is never refreshed.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::table::{DestinationRecord, DestinationTable, InventoryTable};
use crate::errors::{HoloError, Result};
use crate::fs_ops::{classify, probe_checksum, resolve, strip_root, ChecksumAlgorithm};

/// Destination for `source_path`: the full canonical path, minus its root,
/// joined under `desti_root`.
pub fn desti_path_for(desti_root: &Path, source_path: &Path) -> PathBuf {
    desti_root.join(strip_root(source_path))
}

/// Build the destination table for `source`.
///
/// Fails with a validation error if `desti_root` exists and is not a directory.
pub fn plan(source: &InventoryTable, desti_root: &Path, algorithm: ChecksumAlgorithm) -> Result<DestinationTable> {
    let desti_root = resolve(desti_root);
    if desti_root.exists() && !desti_root.is_dir() {
        return Err(HoloError::validation(format!(
            "destination path exists but is NOT a directory: {}",
            desti_root.display()
        )));
    }

    let table: DestinationTable = source
        .keys()
        .map(|source_path| {
            let desti_path = desti_path_for(&desti_root, source_path);
            let record = probe(desti_path, algorithm);
            debug!(
                source = %source_path.display(),
                dest = %record.desti_path.display(),
                exists = record.exists,
                kind = %record.kind,
                "planned"
            );
            (source_path.clone(), record)
        })
        .collect();

    let occupied = table.values().filter(|r| r.exists).count();
    info!(desti_root = %desti_root.display(), rows = table.len(), occupied, "destination plan complete");
    Ok(table)
}

fn probe(desti_path: PathBuf, algorithm: ChecksumAlgorithm) -> DestinationRecord {
    DestinationRecord {
        exists: desti_path.exists(),
        kind: classify(&desti_path),
        checksum: probe_checksum(&desti_path, algorithm),
        desti_path,
    }
}

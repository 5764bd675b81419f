//! Verification: re-checksum each destination and compare it with the checksum
//! captured at inventory time. The source is not re-read.

use tracing::{debug, info, warn};

use super::table::{CopyRecord, CopyTable, DestinationTable, InventoryTable};
use crate::fs_ops::{is_sentinel, probe_checksum, ChecksumAlgorithm, PathKind};

/// Produce the final copy table.
///
/// - Directories verify when the destination is now a directory.
/// - Nonexistent sources never verify; nothing was there to copy.
/// - Everything else verifies iff the digests are equal. A sentinel never
///   counts as a digest, so two unreadable or special paths don't match.
///
/// Source rows without a planned destination are skipped with a warning.
pub fn verify(source: &InventoryTable, desti: &DestinationTable, algorithm: ChecksumAlgorithm) -> CopyTable {
    let mut copies = CopyTable::new();

    for (key, row) in source {
        let Some(target) = desti.get(key) else {
            warn!(path = %key.display(), "no destination row; skipping verification");
            continue;
        };

        let post_copy_checksum = probe_checksum(&target.desti_path, algorithm);
        let copy_success = match row.kind {
            PathKind::Dir => target.desti_path.is_dir(),
            PathKind::Nonexistent => false,
            _ => !is_sentinel(&row.checksum) && post_copy_checksum == row.checksum,
        };

        if copy_success {
            debug!(path = %key.display(), checksum = %post_copy_checksum, "verified");
        } else {
            warn!(
                path = %key.display(),
                expected = %row.checksum,
                found = %post_copy_checksum,
                "checksum mismatch"
            );
        }

        copies.insert(
            key.clone(),
            CopyRecord {
                desti_path: target.desti_path.clone(),
                kind: row.kind,
                post_copy_checksum,
                copy_success,
            },
        );
    }

    let failed = copies.values().filter(|r| !r.copy_success).count();
    info!(rows = copies.len(), failed, "verification complete");
    copies
}

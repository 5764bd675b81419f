//! Source inventory: one record per entry under the source root.
//!
//! The walk itself is sequential and does not follow symlinks; the per-entry
//! work (resolve, classify, checksum) runs on the rayon pool. Results go into a
//! sorted map, so completion order doesn't leak into the table.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::table::{InventoryTable, PathRecord};
use crate::errors::{io_err, HoloError, Result};
use crate::fs_ops::{checksum_chunked, classify, resolve, ChecksumAlgorithm, DEFAULT_CHUNK_SIZE};

#[derive(Debug, Clone, Copy)]
pub struct InventoryOptions {
    pub algorithm: ChecksumAlgorithm,
    /// Give a directory root its own row.
    pub include_root: bool,
    pub chunk_size: usize,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            algorithm: ChecksumAlgorithm::default(),
            include_root: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Inventory `root` with default options.
pub fn inventory(root: &Path) -> Result<InventoryTable> {
    inventory_with(root, &InventoryOptions::default())
}

/// Build the inventory table for `root`.
///
/// A file root yields exactly one row. A directory root yields one row per
/// descendant at every depth, plus the root when `include_root` is set.
/// Unreadable subdirectories fail the whole inventory: a partial table would
/// let a later decoy step drop entries nobody copied.
pub fn inventory_with(root: &Path, opts: &InventoryOptions) -> Result<InventoryTable> {
    let paths: Vec<PathBuf> = if root.is_file() {
        vec![root.to_path_buf()]
    } else if root.is_dir() {
        let min_depth = if opts.include_root { 0 } else { 1 };
        WalkDir::new(root)
            .min_depth(min_depth)
            .follow_links(false)
            .into_iter()
            .map(|entry| {
                entry.map(walkdir::DirEntry::into_path).map_err(|e| {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    match e.into_io_error() {
                        Some(ioe) => io_err("walk source tree", path)(ioe),
                        None => HoloError::validation(format!(
                            "filesystem loop while walking {}",
                            path.display()
                        )),
                    }
                })
            })
            .collect::<Result<_>>()?
    } else {
        return Err(HoloError::validation(format!(
            "source root does not exist or is not a file or directory: {}",
            root.display()
        )));
    };

    let rows = paths
        .par_iter()
        .map(|p| path_record(p, opts))
        .collect::<Result<Vec<_>>>()?;

    let table: InventoryTable = rows.into_iter().map(|r| (r.source_path.clone(), r)).collect();
    info!(root = %root.display(), rows = table.len(), algorithm = %opts.algorithm, "inventory complete");
    Ok(table)
}

fn path_record(path: &Path, opts: &InventoryOptions) -> Result<PathRecord> {
    let source_path = resolve(path);
    let exists = source_path.exists();
    let kind = classify(&source_path);
    let checksum = checksum_chunked(&source_path, opts.algorithm, opts.chunk_size)?;
    debug!(path = %source_path.display(), %kind, %checksum, "inventoried");
    Ok(PathRecord {
        source_path,
        exists,
        kind,
        checksum,
    })
}

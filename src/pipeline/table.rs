//! Per-path records and the ordered tables that hold them.
//!
//! Every table is keyed by canonical source path in a `BTreeMap`, so iteration
//! order is the sorted key order no matter how rows were produced. Rows are
//! created once and never updated.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::errors::HoloError;
use crate::fs_ops::PathKind;

/// One entry found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    pub source_path: PathBuf,
    pub exists: bool,
    pub kind: PathKind,
    /// Hex digest for files, a sentinel otherwise.
    pub checksum: String,
}

/// Pre-copy state of the destination for one source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRecord {
    pub desti_path: PathBuf,
    pub exists: bool,
    pub kind: PathKind,
    pub checksum: String,
}

/// Outcome of verifying one row after the copy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRecord {
    pub desti_path: PathBuf,
    /// Source kind the copy was dispatched on.
    pub kind: PathKind,
    pub post_copy_checksum: String,
    pub copy_success: bool,
}

pub type InventoryTable = BTreeMap<PathBuf, PathRecord>;
pub type DestinationTable = BTreeMap<PathBuf, DestinationRecord>;
pub type CopyTable = BTreeMap<PathBuf, CopyRecord>;
/// Rows whose copy attempt failed, with the reason.
pub type ExecutionLog = BTreeMap<PathBuf, HoloError>;

/// True when every row verified. An empty table counts as success.
pub fn all_succeeded(copies: &CopyTable) -> bool {
    copies.values().all(|r| r.copy_success)
}

/// Source paths whose destination did not verify.
pub fn mismatches(copies: &CopyTable) -> Vec<&PathBuf> {
    copies
        .iter()
        .filter(|(_, r)| !r.copy_success)
        .map(|(k, _)| k)
        .collect()
}

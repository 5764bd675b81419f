//! Copy-and-verify pipeline.
//!
//! root → inventory → plan → execute → verify. Each stage reads the previous
//! stage's table and returns a new one; nothing is updated in place.

mod execute;
mod inventory;
mod plan;
mod report;
mod table;
mod verify;

pub use execute::{execute, execute_with};
pub use inventory::{inventory, inventory_with, InventoryOptions};
pub use plan::{desti_path_for, plan};
pub use report::{render_copy_table, render_plan};
pub use table::{
    all_succeeded, mismatches, CopyRecord, CopyTable, DestinationRecord, DestinationTable, ExecutionLog,
    InventoryTable, PathRecord,
};
pub use verify::verify;

use std::path::Path;
use tracing::info;

use crate::errors::{HoloError, Result};
use crate::fs_ops::{resolve, ChecksumAlgorithm, CopyOptions, DurabilityMode, DEFAULT_CHUNK_SIZE};
use crate::shutdown;

/// Inputs the pipeline takes from the calling layer.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub algorithm: ChecksumAlgorithm,
    pub clobber: bool,
    pub include_root: bool,
    pub preserve_metadata: bool,
    pub chunk_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            algorithm: ChecksumAlgorithm::Md5,
            clobber: false,
            include_root: false,
            preserve_metadata: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl PipelineOptions {
    fn inventory_options(&self) -> InventoryOptions {
        InventoryOptions {
            algorithm: self.algorithm,
            include_root: self.include_root,
            chunk_size: self.chunk_size,
        }
    }

    fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            clobber: self.clobber,
            preserve_metadata: self.preserve_metadata,
            durability: DurabilityMode::Full,
        }
    }
}

/// Everything one run produced, keyed by canonical source path.
#[derive(Debug)]
pub struct Report {
    pub inventory: InventoryTable,
    pub destinations: DestinationTable,
    pub copies: CopyTable,
    pub failures: ExecutionLog,
}

impl Report {
    /// Every row verified and no copy attempt failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && all_succeeded(&self.copies)
    }
}

/// Inventory and plan only; nothing is written.
pub fn plan_only(root: &Path, desti_root: &Path, opts: &PipelineOptions) -> Result<(InventoryTable, DestinationTable)> {
    ensure_disjoint(root, desti_root)?;
    let inventory = inventory_with(root, &opts.inventory_options())?;
    let destinations = plan(&inventory, desti_root, opts.algorithm)?;
    Ok((inventory, destinations))
}

/// Run the whole pipeline.
///
/// Errors here are whole-operation failures (bad root, destination collision).
/// Per-row failures land in `Report::failures` and the affected rows still get
/// a verification result.
pub fn run(root: &Path, desti_root: &Path, opts: &PipelineOptions) -> Result<Report> {
    run_with(root, desti_root, opts, shutdown::is_requested)
}

/// [`run`] with an explicit cancellation check.
pub fn run_with<F>(root: &Path, desti_root: &Path, opts: &PipelineOptions, cancelled: F) -> Result<Report>
where
    F: Fn() -> bool,
{
    let (inventory, destinations) = plan_only(root, desti_root, opts)?;
    let failures = execute_with(&inventory, &destinations, opts.copy_options(), cancelled);
    let copies = verify(&inventory, &destinations, opts.algorithm);

    info!(
        root = %root.display(),
        desti_root = %desti_root.display(),
        rows = copies.len(),
        failed = failures.len(),
        verified = copies.values().filter(|r| r.copy_success).count(),
        "pipeline finished"
    );
    Ok(Report {
        inventory,
        destinations,
        copies,
        failures,
    })
}

/// Source and storage root must be disjoint: neither may contain the other.
fn ensure_disjoint(root: &Path, desti_root: &Path) -> Result<()> {
    let root_real = resolve(root);
    let desti_real = resolve(desti_root);
    if desti_real.starts_with(&root_real) {
        return Err(HoloError::validation(format!(
            "storage root '{}' must not be inside the source '{}'",
            desti_real.display(),
            root_real.display()
        )));
    }
    if root_real.starts_with(&desti_real) {
        return Err(HoloError::validation(format!(
            "source '{}' is already inside storage root '{}'",
            root_real.display(),
            desti_real.display()
        )));
    }
    Ok(())
}

//! Plain-text rendering of the tables for the CLI.

use std::fmt::Write as _;

use super::table::{CopyTable, DestinationTable, ExecutionLog, InventoryTable};
use crate::fs_ops::PathKind;

/// One line per row: status, kind, source → destination, and the failure if any.
pub fn render_copy_table(copies: &CopyTable, failures: &ExecutionLog) -> String {
    let mut out = String::new();
    for (source, row) in copies {
        let status = if row.copy_success { "OK  " } else { "FAIL" };
        let _ = write!(
            out,
            "{status} {:<7} {} -> {}",
            row.kind.as_str(),
            source.display(),
            row.desti_path.display()
        );
        if let Some(err) = failures.get(source) {
            let _ = write!(out, "  ({err})");
        } else if !row.copy_success {
            let _ = write!(out, "  (checksum {})", row.post_copy_checksum);
        }
        out.push('\n');
    }
    let ok = copies.values().filter(|r| r.copy_success).count();
    let _ = writeln!(out, "{ok}/{} verified, {} copy failures", copies.len(), failures.len());
    out
}

/// Dry-run view: what would be written where, and what is already there.
pub fn render_plan(inventory: &InventoryTable, destinations: &DestinationTable, clobber: bool) -> String {
    let mut out = String::new();
    for (source, row) in inventory {
        let Some(dest) = destinations.get(source) else {
            continue;
        };
        let note = if !dest.exists {
            "new"
        } else if row.kind == PathKind::Dir {
            "exists"
        } else if clobber {
            "overwrite"
        } else {
            "refused (exists)"
        };
        let _ = writeln!(
            out,
            "{:<7} {} -> {}  [{note}]",
            row.kind.as_str(),
            source.display(),
            dest.desti_path.display()
        );
    }
    let _ = writeln!(out, "{} entries planned", inventory.len());
    out
}

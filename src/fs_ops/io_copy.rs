//! Streaming copy with durability.
//!
//! - Writes to a newly created destination file (O_EXCL semantics; never clobbers).
//! - Buffered I/O with 1 MiB buffers.
//! - Full mode fsyncs the destination before returning.
//!
//! The source is read once from start to EOF; bytes appended concurrently may
//! or may not be included. Verification afterwards catches either case.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Durability mode controlling post-write flush behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurabilityMode {
    /// Flush to the OS page cache only.
    Data,
    /// Force data and metadata to stable storage (`sync_all`).
    Full,
}

/// Copy `src` -> `dst`, creating `dst` exclusively. Returns bytes written.
/// On failure after `dst` was created, the partial file is removed.
pub(crate) fn copy_streaming(src: &Path, dst: &Path, mode: DurabilityMode) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let result = (|| {
        let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
        let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
        let bytes = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        if mode == DurabilityMode::Full {
            writer.get_ref().sync_all()?;
        }
        Ok(bytes)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(dst);
    }
    result
}

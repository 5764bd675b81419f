//! Filesystem primitives used by the pipeline: resolution, classification,
//! checksums and the single-file copy.

mod atomic;
mod checksum;
mod classify;
mod copy;
mod helpers;
mod io_copy;
mod metadata;
mod resolve;
pub(crate) mod util;

pub use checksum::{
    checksum, checksum_chunked, checksum_named, is_sentinel, ChecksumAlgorithm, DEFAULT_CHUNK_SIZE,
    FILE_NOT_FOUND, IS_A_DIRECTORY, NOT_A_REGULAR_FILE, READ_ERROR,
};
pub(crate) use checksum::probe_checksum;
pub use classify::{classify, PathKind};
pub use copy::{copy_file, copy_file_with, CopyOptions};
pub use helpers::describe_io_error;
pub use io_copy::DurabilityMode;
pub use metadata::preserve_metadata;
pub use resolve::{normalize_lexically, resolve};
pub(crate) use resolve::strip_root;

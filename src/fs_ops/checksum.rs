//! Chunked content digests with sentinel values.
//!
//! Directories and missing paths are expected inside a batch, so they come
//! back as fixed strings instead of errors. Those strings sit in the same
//! column as real digests and compare like any other value.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::errors::{io_err, HoloError, Result};

/// Checksum recorded for a directory.
pub const IS_A_DIRECTORY: &str = "IsADirectoryError";
/// Checksum recorded for a path that does not exist.
pub const FILE_NOT_FOUND: &str = "FileNotFoundError";
/// Checksum recorded for anything that exists but is neither a directory nor a
/// regular file (fifo, socket, device). Such paths are never opened.
pub const NOT_A_REGULAR_FILE: &str = "NotARegularFileError";
/// Checksum recorded by destination probes when the file exists but cannot be read.
pub const READ_ERROR: &str = "ReadError";

/// Read size per chunk; bounds memory independent of file size.
pub const DEFAULT_CHUNK_SIZE: usize = 1_024_000;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumAlgorithm {
    #[default]
    Md5,
    Sha256,
    Blake3,
}

impl ChecksumAlgorithm {
    pub const SUPPORTED: [&'static str; 3] = ["md5", "sha256", "blake3"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = HoloError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(ChecksumAlgorithm::Md5),
            "sha256" => Ok(ChecksumAlgorithm::Sha256),
            "blake3" => Ok(ChecksumAlgorithm::Blake3),
            _ => Err(HoloError::validation(format!(
                "unsupported checksum kind: '{}'. Choose from {:?}",
                s,
                Self::SUPPORTED
            ))),
        }
    }
}

enum Hasher {
    Md5(Md5),
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Md5 => Hasher::Md5(Md5::new()),
            ChecksumAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
            ChecksumAlgorithm::Blake3 => Hasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Md5(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Hasher::Md5(h) => to_hex(&h.finalize()),
            Hasher::Sha256(h) => to_hex(&h.finalize()),
            Hasher::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Checksum of `path` with the default chunk size.
pub fn checksum(path: &Path, algorithm: ChecksumAlgorithm) -> Result<String> {
    checksum_chunked(path, algorithm, DEFAULT_CHUNK_SIZE)
}

/// Checksum using an algorithm given by name; unknown names are a validation error.
pub fn checksum_named(path: &Path, algorithm: &str) -> Result<String> {
    checksum(path, algorithm.parse()?)
}

/// Stream `path` through the hasher `chunk_size` bytes at a time.
///
/// Returns the lowercase hex digest for files, `IS_A_DIRECTORY` for
/// directories, `FILE_NOT_FOUND` for missing paths (including broken
/// symlinks) and `NOT_A_REGULAR_FILE` for special files, which are not opened
/// since opening a fifo blocks until a writer shows up. Other I/O failures are
/// returned as errors.
pub fn checksum_chunked(path: &Path, algorithm: ChecksumAlgorithm, chunk_size: usize) -> Result<String> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(IS_A_DIRECTORY.to_string()),
        Ok(meta) if !meta.is_file() => return Ok(NOT_A_REGULAR_FILE.to_string()),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FILE_NOT_FOUND.to_string()),
        Err(e) => return Err(io_err("stat for checksum", path)(e)),
    }

    let mut file = match File::open(path) {
        Ok(f) => f,
        // Vanished between stat and open.
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FILE_NOT_FOUND.to_string()),
        Err(e) => return Err(io_err("open for checksum", path)(e)),
    };

    let mut hasher = Hasher::new(algorithm);
    let mut buffer = vec![0u8; chunk_size.max(1)];
    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_err("read for checksum", path)(e)),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize_hex())
}

/// Checksum for table probes: unreadable files become `READ_ERROR` instead of
/// aborting the table.
pub(crate) fn probe_checksum(path: &Path, algorithm: ChecksumAlgorithm) -> String {
    checksum(path, algorithm).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "checksum probe failed");
        READ_ERROR.to_string()
    })
}

/// True for the fixed strings that stand in for a digest.
pub fn is_sentinel(value: &str) -> bool {
    matches!(value, IS_A_DIRECTORY | FILE_NOT_FOUND | NOT_A_REGULAR_FILE | READ_ERROR)
}

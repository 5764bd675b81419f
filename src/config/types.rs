//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::paths;
use crate::fs_ops::{ChecksumAlgorithm, DEFAULT_CHUNK_SIZE};
use crate::pipeline::PipelineOptions;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for a stash run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where relocated trees are stored (source paths are rebased under it)
    pub storage_root: PathBuf,
    /// Overwrite existing destination files
    pub clobber: bool,
    /// Digest used for inventory and verification
    pub checksum: ChecksumAlgorithm,
    /// Include the source directory itself as a table row
    pub include_root: bool,
    /// Carry permissions and timestamps onto copies
    pub preserve_metadata: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Inventory and plan only; nothing is written
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: paths::default_storage_root(),
            clobber: false,
            checksum: ChecksumAlgorithm::Md5,
            include_root: false,
            preserve_metadata: true,
            log_level: LogLevel::Normal,
            log_file: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Construct a Config with an explicit storage root; other fields use defaults.
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Default::default()
        }
    }

    /// Options handed to the pipeline.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            algorithm: self.checksum,
            clobber: self.clobber,
            include_root: self.include_root,
            preserve_metadata: self.preserve_metadata,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

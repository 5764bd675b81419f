//! Core library for `holographer`.
//!
//! Copies a file or directory tree into a storage root, verifies every entry
//! by checksum, and can replace the original with a decoy symlink pointing at
//! the stored copy.
//!
//! The pipeline runs in four stages, each producing a table keyed by the
//! canonical source path: inventory → plan → execute → verify. See
//! [`pipeline::run`].

pub mod cli;
pub mod config;
pub mod decoy;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod shutdown;

pub use config::{
    create_template_config, default_config_path, default_log_path, default_storage_root, describe_config,
    generate_config, load_config, load_config_from_xml_path, path_has_symlink_ancestor, Config, LogLevel,
};
pub use decoy::plant_decoy;
pub use errors::{HoloError, Result};
pub use fs_ops::{checksum, classify, copy_file, resolve, ChecksumAlgorithm, PathKind};
pub use pipeline::{execute, inventory, plan, run, verify, PipelineOptions, Report};

//! Config module.
//! Provides configuration types, default paths, XML loading/generation, and validation.
//! Factory defaults live here and reach the pipeline as plain `PipelineOptions`.

mod manage;
pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use manage::{backup_path_for, describe_config, generate_config};
pub use paths::{
    config_path_from_env, default_config_path, default_log_path, default_storage_root,
    path_has_symlink_ancestor,
};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config, load_config_from_xml_path, render_template};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "HOLOGRAPHER_CONFIG";
/// Directory name used under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "holographer";
/// File name of the user config.
pub const CONFIG_FILE_NAME: &str = "config.xml";

//! CLI definition and parsing.
//! Defines Args (global flags + subcommands) and provides parse().
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug and wins over it.
//! - Flags only ever switch settings on; absent flags keep the config file value.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::errors::Result;
use crate::fs_ops::ChecksumAlgorithm;

/// Copy a file or tree into storage, verify every entry by checksum, and
/// optionally leave a decoy symlink where the original was.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(name = "holo", author, version, about)]
pub struct Args {
    /// Config file to use instead of HOLOGRAPHER_CONFIG / the platform default.
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (shorthand for --log-level debug).
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy SOURCE into storage and verify every entry.
    Stash(StashArgs),
    /// Manage configuration values and files.
    Configs(ConfigsArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StashArgs {
    /// File or directory to relocate.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::AnyPath)]
    pub source: PathBuf,

    /// Storage root (overrides config).
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub storage: Option<PathBuf>,

    /// Overwrite files that already exist in storage.
    #[arg(long)]
    pub clobber: bool,

    /// Checksum algorithm: md5, sha256, blake3.
    #[arg(long, value_name = "ALGO")]
    pub checksum: Option<String>,

    /// List the source directory itself as a row.
    #[arg(long)]
    pub include_root: bool,

    /// Inventory and plan only; print what would happen.
    #[arg(long)]
    pub dry_run: bool,

    /// After a fully verified copy, replace SOURCE with a symlink into storage.
    #[arg(long)]
    pub decoy: bool,
}

#[derive(ClapArgs, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ConfigsArgs {
    /// Print the configuration values that will be used and exit.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Write the factory-default config file, backing up any existing one.
    #[arg(short = 'g', long = "generate-config")]
    pub generate_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply global CLI overrides to a loaded Config (in-place).
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
    }
}

impl StashArgs {
    /// Apply stash flags to a loaded Config (in-place). Fails only on an unknown checksum name.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<()> {
        if let Some(root) = &self.storage {
            cfg.storage_root = root.clone();
        }
        if let Some(name) = &self.checksum {
            cfg.checksum = name.parse::<ChecksumAlgorithm>()?;
        }
        if self.clobber {
            cfg.clobber = true;
        }
        if self.include_root {
            cfg.include_root = true;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stash_flags_override_config() {
        let args = Args::try_parse_from([
            "holo", "-d", "stash", "/data", "--storage", "/store", "--clobber", "--checksum", "sha256",
        ])
        .unwrap();
        let mut cfg = Config::new("/elsewhere");
        args.apply_overrides(&mut cfg);
        let Command::Stash(stash) = &args.command else {
            panic!("expected stash");
        };
        stash.apply_overrides(&mut cfg).unwrap();

        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.storage_root, PathBuf::from("/store"));
        assert!(cfg.clobber);
        assert_eq!(cfg.checksum, ChecksumAlgorithm::Sha256);
        assert!(!cfg.dry_run);
    }

    #[test]
    fn unknown_checksum_is_a_validation_error() {
        let args = Args::try_parse_from(["holo", "stash", "/data", "--checksum", "crc"]).unwrap();
        let Command::Stash(stash) = &args.command else {
            panic!("expected stash");
        };
        let err = stash.apply_overrides(&mut Config::new("/s")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn configs_requires_exactly_one_action() {
        assert!(Args::try_parse_from(["holo", "configs"]).is_err());
        assert!(Args::try_parse_from(["holo", "configs", "--list", "--generate-config"]).is_err());
        assert!(Args::try_parse_from(["holo", "configs", "--list"]).is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from(["holo", "configs", "--list", "--log-level", "quiet"]).unwrap();
        assert_eq!(args.effective_log_level(), Some(LogLevel::Quiet));
    }
}

//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the Ctrl-C handler, and
//! dispatches to `stash` or `configs`.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use holographer::cli::{Args, Command, ConfigsArgs, StashArgs};
use holographer::output as out;
use holographer::pipeline::{self, render_copy_table, render_plan};
use holographer::{
    default_config_path, describe_config, generate_config, load_config, plant_decoy, shutdown, Config, HoloError,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Build config (may read XML). CLI args override config values.
    // Regenerating must work even when the current file is missing or broken.
    let regenerate = matches!(&args.command, Command::Configs(c) if c.generate_config);
    let (mut cfg, cfg_source) = if regenerate {
        (Config::default(), None)
    } else {
        load_config(args.config.as_deref())?
    };
    args.apply_overrides(&mut cfg);
    if let Command::Stash(stash) = &args.command {
        stash.apply_overrides(&mut cfg)?;
    }

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current entry and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install Ctrl-C handler")?;
    }

    debug!("Starting holographer: {:?}", args);

    let result = match &args.command {
        Command::Stash(stash) => run_stash(&cfg, stash),
        Command::Configs(configs) => run_configs(&cfg, cfg_source.as_deref(), args.config.as_deref(), configs),
    };

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn run_stash(cfg: &Config, stash: &StashArgs) -> Result<()> {
    let source = &stash.source;
    let opts = cfg.pipeline_options();

    if cfg.dry_run {
        let (inventory, destinations) =
            pipeline::plan_only(source, &cfg.storage_root, &opts).inspect_err(log_failure)?;
        out::print_user(&render_plan(&inventory, &destinations, cfg.clobber));
        out::print_info("Dry-run: nothing was written");
        if stash.decoy {
            out::print_info("Dry-run: decoy would be planted after a fully verified copy");
        }
        return Ok(());
    }

    cfg.validate()?;

    let report = pipeline::run(source, &cfg.storage_root, &opts).inspect_err(log_failure)?;
    out::print_user(&render_copy_table(&report.copies, &report.failures));

    for err in report.failures.values() {
        log_failure(err);
    }
    shutdown::check()?;
    if !report.is_success() {
        let failed = report.copies.values().filter(|r| !r.copy_success).count();
        bail!(
            "{failed} of {} entries did not verify; the original at '{}' was left untouched",
            report.copies.len(),
            source.display()
        );
    }

    out::print_success(&format!(
        "{} entries stored and verified under {}",
        report.copies.len(),
        cfg.storage_root.display()
    ));

    if stash.decoy {
        let target = plant_decoy(source, &cfg.storage_root, &report.copies).inspect_err(log_failure)?;
        out::print_success(&format!("decoy planted: {} -> {}", source.display(), target.display()));
    }
    Ok(())
}

fn run_configs(cfg: &Config, loaded_from: Option<&Path>, explicit: Option<&Path>, configs: &ConfigsArgs) -> Result<()> {
    if configs.list {
        out::print_user(&describe_config(cfg, loaded_from));
        return Ok(());
    }

    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if let Some(backup) = generate_config(&path)? {
        out::print_info(&format!("Existing config backed up to {}", backup.display()));
    }
    out::print_success(&format!("Factory-default config written to {}", path.display()));
    info!(path = %path.display(), "config generated");
    Ok(())
}

fn log_failure(err: &HoloError) {
    let code = err.code();
    match err {
        HoloError::Validation(msg) => error!(code, kind = "validation", %msg, "stash failed"),
        HoloError::UnimplementedKind(kind) => error!(code, kind = "unimplemented_kind", path_kind = %kind, "stash failed"),
        HoloError::Io { op, path, .. } => {
            error!(code, kind = "io", op = *op, path = %path.display(), error = %err, "stash failed")
        }
        HoloError::Interrupted => error!(code, kind = "interrupted", "stash aborted by user"),
    }
}
